//! `health` and `cache-stats`

use crate::context::{print_json, Context, Silent};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use sunpath_cli::output::{format_duration, Status};
use sunpath_core::error::exit_codes;
use sunpath_core::i18n::t;

pub async fn run(ctx: &Context, detailed: bool) -> Result<()> {
    let client = ctx.client()?;
    let (healthy, elapsed) = client.health().check_timed().await;

    if ctx.is_json() {
        print_json(&json!({
            "healthy": healthy,
            "base_url": client.base_url(),
            "elapsed_ms": elapsed.as_millis() as u64,
        }))?;
    } else {
        let timing = if detailed {
            format!(" ({})", format_duration(elapsed))
        } else {
            String::new()
        };
        let l = ctx.locale;
        if healthy {
            println!("{} {}{}", "✓".green(), t(l, "header.apiConnected"), timing.dimmed());
        } else {
            println!("{} {}{}", "✗".red(), t(l, "header.apiDisconnected"), timing.dimmed());
        }
        if detailed {
            Status::field("Backend", client.base_url());
        }
    }

    if healthy {
        Ok(())
    } else {
        Err(Silent(exit_codes::NETWORK_ERROR).into())
    }
}

pub async fn cache_stats(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let Some(stats) = client.cache().stats().await else {
        if ctx.is_json() {
            println!("null");
        } else {
            Status::warning("Cache statistics unavailable");
        }
        return Err(Silent(exit_codes::NETWORK_ERROR).into());
    };

    if ctx.is_json() {
        return print_json(&stats);
    }

    Status::header("Cache");
    match stats.as_object() {
        Some(fields) => {
            for (key, value) in fields {
                let shown = value.as_str().map_or_else(|| value.to_string(), str::to_string);
                Status::field(key, &shown);
            }
        }
        None => println!("  {stats}"),
    }
    Ok(())
}
