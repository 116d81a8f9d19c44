//! `calculate` and `optimize`

use super::{clock, fetch, ScenarioArgs, SourceArgs};
use crate::context::{print_json, Context};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use sunpath_cli::output::{format_degrees, format_hours, format_irradiance, format_meters, Status};
use sunpath_cli::progress;
use sunpath_core::i18n::{t, Locale};
use sunpath_core::model::{Period, SolarCalculationResponse};
use sunpath_simulation::insights::series_peaks;
use sunpath_simulation::ExportFormat;

pub async fn run(
    ctx: &Context,
    scenario: &ScenarioArgs,
    interval: Option<u32>,
    output: Option<&Path>,
) -> Result<()> {
    let scenario = scenario.resolve(ctx)?;
    let mut request = scenario.request();
    if interval.is_some() {
        request.datetime.interval = interval;
    }

    let client = ctx.client()?;
    let data = fetch(ctx, &client, &request).await?;

    if let Some(path) = output {
        ExportFormat::Json.write(&data, ctx.locale, path)?;
    }

    if ctx.is_json() {
        return print_json(&data);
    }

    let l = ctx.locale;
    Status::banner(t(l, "header.title"));
    Status::field(
        t(l, "sidebar.location"),
        &format!("{:.4}, {:.4}", scenario.location.lat, scenario.location.lon),
    );
    Status::field(t(l, "sidebar.date"), &scenario.date);
    Status::field(t(l, "sidebar.objectHeight"), &format_meters(scenario.height));
    print_summary(&data, l);

    if ctx.verbose {
        print_series(&data);
    }
    if let Some(path) = output {
        Status::success(&format!("Saved {}", path.display()));
    }
    Ok(())
}

fn print_summary(data: &SolarCalculationResponse, l: Locale) {
    let s = &data.summary;
    println!();
    Status::field(t(l, "summary.sunrise"), &clock(&s.sunrise));
    Status::field(t(l, "summary.sunset"), &clock(&s.sunset));
    Status::field(t(l, "summary.solarNoon"), &clock(&s.solar_noon));
    Status::field(t(l, "summary.dayLength"), &format_hours(s.day_length));
    Status::field(t(l, "summary.maxAltitude"), &format_degrees(s.max_altitude));
    Status::field(
        t(l, "summary.totalIrradiance"),
        &s.total_irradiance
            .map_or_else(|| "N/A".to_string(), |v| format!("{v:.2} kWh/m²")),
    );

    let peaks = series_peaks(&data.series);
    println!();
    println!("  {}", t(l, "summary.derived").bold());
    if let Some(p) = &peaks.max_altitude {
        Status::field(t(l, "summary.maxAltitudeTime"), &format!("{} ({})", clock(&p.timestamp), format_degrees(p.value)));
    }
    if let Some(p) = &peaks.max_ghi {
        Status::field(t(l, "summary.maxGhiTime"), &format!("{} ({})", clock(&p.timestamp), format_irradiance(p.value)));
    }
    if let Some(p) = &peaks.min_shadow {
        Status::field(t(l, "summary.minShadowTime"), &format!("{} ({})", clock(&p.timestamp), format_meters(p.value)));
    }
    println!();
    println!(
        "  {}",
        format!("{}{}", data.series.len(), t(l, "sidebar.dataPoints")).dimmed()
    );
}

fn print_series(data: &SolarCalculationResponse) {
    println!();
    println!(
        "  {:<6} {:>9} {:>9} {:>10} {:>10} {:>9}",
        "time", "altitude", "azimuth", "GHI", "shadow", "direction"
    );
    for point in &data.series {
        let ghi = point.irradiance.map_or_else(|| "-".to_string(), |i| format_irradiance(i.ghi));
        let shadow = point.shadow.as_ref();
        let length = shadow
            .and_then(|s| s.length)
            .map_or_else(|| "-".to_string(), format_meters);
        let direction = shadow
            .and_then(|s| s.direction)
            .map_or_else(|| "-".to_string(), format_degrees);
        println!(
            "  {:<6} {:>9} {:>9} {:>10} {:>10} {:>9}",
            clock(&point.timestamp),
            format_degrees(point.sun.altitude),
            format_degrees(point.sun.azimuth),
            ghi,
            length,
            direction
        );
    }
}

pub async fn optimize(ctx: &Context, source: &SourceArgs) -> Result<()> {
    let (data, _) = source.load(ctx).await?;
    let client = ctx.client()?;

    let spinner = progress::spinner("Optimizing", ctx.quiet());
    let result = client.integrated().optimize(&data).await;
    progress::finish(&spinner);
    let result = result?;

    if ctx.is_json() {
        return print_json(&result);
    }

    let l = ctx.locale;
    let o = &result.optimization;
    Status::banner(t(l, "optimization.optimalSunHours"));

    if let Some(p) = &o.max_irradiance_period {
        Status::field(
            t(l, "optimization.maxIrradiance"),
            &format!("{} ({})", clock(&p.time), format_irradiance(p.ghi)),
        );
    }
    if let Some(p) = &o.max_altitude_period {
        Status::field(
            t(l, "optimization.maxSolarAltitude"),
            &format!("{} ({})", clock(&p.time), format_degrees(p.altitude)),
        );
    }
    if let Some(p) = &o.min_shadow_period {
        Status::field(
            t(l, "optimization.minShadow"),
            &format!("{} ({})", clock(&p.time), format_meters(p.shadow_length)),
        );
    }

    print_periods(t(l, "optimization.optimalSunHours"), &o.optimal_solar_collection_periods);
    print_periods(t(l, "optimization.shadowInterference"), &o.shadow_interference_periods);
    Ok(())
}

fn print_periods(title: &str, periods: &[Period]) {
    if periods.is_empty() {
        return;
    }
    Status::header(title);
    for p in periods {
        println!(
            "  {} - {}  {}  {}",
            clock(&p.start),
            clock(&p.end),
            format_hours(p.duration_hours).dimmed(),
            format_irradiance(p.average_ghi)
        );
    }
}
