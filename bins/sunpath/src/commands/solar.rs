//! `sunrise` and `shadow`

use super::{today, ScenarioArgs};
use crate::context::{print_json, Context};
use anyhow::Result;
use owo_colors::OwoColorize;
use sunpath_cli::output::{format_degrees, format_meters, Status};
use sunpath_cli::progress;
use sunpath_core::i18n::t;
use sunpath_core::model::Coordinates;

pub async fn sunrise(ctx: &Context, lat: f64, lon: f64, date: Option<&str>) -> Result<()> {
    Coordinates::new(lat, lon).validate()?;
    let date = date.map_or_else(today, str::to_string);

    let client = ctx.client()?;
    let spinner = progress::spinner("Fetching sunrise and sunset", ctx.quiet());
    let times = client.solar().sunrise_sunset(lat, lon, &date).await;
    progress::finish(&spinner);
    let times = times?;

    if ctx.is_json() {
        return print_json(&times);
    }

    let l = ctx.locale;
    Status::header(&format!("{} · {date}", t(l, "optimization.sunriseSunset")));
    Status::field(t(l, "summary.sunrise"), &times.sunrise);
    Status::field(t(l, "summary.sunset"), &times.sunset);
    for (key, value) in &times.extra {
        let shown = value.as_str().map_or_else(|| value.to_string(), str::to_string);
        Status::field(key, &shown);
    }
    Ok(())
}

pub async fn shadow(ctx: &Context, scenario: &ScenarioArgs, time: &str) -> Result<()> {
    let scenario = scenario.resolve(ctx)?;
    let client = ctx.client()?;

    let spinner = progress::spinner("Calculating shadow", ctx.quiet());
    let result = client
        .shadow()
        .calculate(scenario.location.lat, scenario.location.lon, &scenario.date, time, scenario.height)
        .await;
    progress::finish(&spinner);
    let shadow = result?;

    if ctx.is_json() {
        return print_json(&shadow);
    }

    let l = ctx.locale;
    Status::header(&format!("{} {time}", scenario.date));
    match shadow.length {
        Some(length) => Status::field(t(l, "map.shadowLength"), &format_meters(length)),
        None => Status::field(t(l, "map.shadowLength"), &"-".dimmed().to_string()),
    }
    if let Some(direction) = shadow.direction {
        Status::field(t(l, "chart.shadowDirection"), &format_degrees(direction));
    }
    if let Some(coords) = &shadow.coordinates {
        for [lon, lat] in coords {
            println!("    {}", format!("{lat:.6}, {lon:.6}").dimmed());
        }
    }
    Ok(())
}
