//! `locale`

use crate::context::{print_json, Context};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use sunpath_core::i18n::{Locale, LOCALES};

pub fn list(ctx: &Context) -> Result<()> {
    if ctx.is_json() {
        let locales: Vec<_> = LOCALES
            .iter()
            .map(|l| json!({ "code": l.code(), "name": l.display_name(), "active": *l == ctx.locale }))
            .collect();
        return print_json(&locales);
    }

    for locale in LOCALES {
        if locale == ctx.locale {
            println!("{} {} {}", "*".green(), locale.code().bold(), locale.display_name());
        } else {
            println!("  {} {}", locale.code(), locale.display_name());
        }
    }
    Ok(())
}

/// Where the active locale came from, in resolution order
fn source(explicit: Option<&str>, stored: Option<&str>) -> &'static str {
    let parses = |v: Option<&str>| v.is_some_and(|v| v.parse::<Locale>().is_ok());
    if parses(explicit) {
        "--locale"
    } else if parses(std::env::var("SUNPATH_LOCALE").ok().as_deref()) {
        "SUNPATH_LOCALE"
    } else if parses(stored) {
        "config"
    } else if std::env::var("LC_ALL")
        .ok()
        .or_else(|| std::env::var("LANG").ok())
        .as_deref()
        .and_then(Locale::from_language_tag)
        .is_some()
    {
        "system"
    } else {
        "default"
    }
}

pub fn show(ctx: &Context, explicit: Option<&str>) -> Result<()> {
    let from = source(explicit, ctx.config.schema.app.locale.as_deref());

    if ctx.is_json() {
        return print_json(&json!({
            "code": ctx.locale.code(),
            "name": ctx.locale.display_name(),
            "source": from,
        }));
    }
    println!("{} {} ({})", ctx.locale.code().bold(), ctx.locale.display_name(), from.dimmed());
    Ok(())
}
