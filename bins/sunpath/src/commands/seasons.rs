//! `seasons`

use super::clock;
use crate::context::{print_json, Context};
use anyhow::Result;
use owo_colors::OwoColorize;
use sunpath_cli::output::{format_degrees, format_hours, Status};
use sunpath_cli::progress;
use sunpath_core::i18n::t;
use sunpath_core::model::Coordinates;
use sunpath_simulation::insights::{pair_seasons, season_requests};

pub async fn run(ctx: &Context, lat: f64, lon: f64, year: i32, height: Option<f64>) -> Result<()> {
    Coordinates::new(lat, lon).validate()?;
    let requests = season_requests(lat, lon, year, ctx.object_height(height));

    let client = ctx.client()?;
    let spinner = progress::spinner("Calculating 4 seasons", ctx.quiet());
    let response = client.integrated().batch(requests, true).await;
    progress::finish(&spinner);

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Season comparison failed");
            return Err(anyhow::Error::new(e).context(t(ctx.locale, "seasons.failed")));
        }
    };
    let rows = pair_seasons(&response, year);

    if ctx.is_json() {
        return print_json(&rows);
    }

    let l = ctx.locale;
    Status::banner(t(l, "seasons.title"));
    let top = rows.iter().map(|r| r.max_altitude).fold(f64::NEG_INFINITY, f64::max);

    for row in &rows {
        let share = if top > 0.0 { (row.max_altitude / top).clamp(0.0, 1.0) } else { 0.0 };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bar = "█".repeat((share * 30.0).round() as usize);
        println!(
            "  {:<6} {}  {:>7}  {}  {} → {}",
            row.season.label(l).bold(),
            row.date.dimmed(),
            format_degrees(row.max_altitude),
            bar.yellow(),
            clock(&row.sunrise),
            clock(&row.sunset)
        );
        println!("         {}", format_hours(row.day_length).dimmed());
    }

    if rows.len() < 4 {
        Status::warning(&format!("{}: {}/4", t(l, "seasons.failed"), 4 - rows.len()));
    }
    Ok(())
}
