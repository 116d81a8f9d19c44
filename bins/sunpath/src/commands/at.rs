//! `at`: the sun and shadow at any minute of a calculated day

use super::SourceArgs;
use crate::context::{print_json, Context};
use anyhow::Result;
use owo_colors::OwoColorize;
use sunpath_cli::output::{format_degrees, format_irradiance, format_meters, Status};
use sunpath_core::i18n::{t, Locale};
use sunpath_core::model::{Coordinates, SolarCalculationResponse, SolarDataPoint};
use sunpath_core::Error;
use sunpath_simulation::{interpolate_at, target_instant};

/// Interpolate the sample at `HH:MM` on the day of `data`.
///
/// Without a known location the shadow keeps its length and direction but
/// loses its ground coordinates.
pub fn sample_at(
    data: &SolarCalculationResponse,
    location: Option<Coordinates>,
    time: &str,
) -> Result<SolarDataPoint> {
    let date = data
        .first_date()
        .ok_or_else(|| Error::validation("The calculation has no dated samples"))?;
    let target = target_instant(date, time, &data.series)?;
    let mut point = interpolate_at(&data.series, target, location.unwrap_or(Coordinates::new(0.0, 0.0)))
        .ok_or_else(|| Error::validation("The calculation has no usable samples"))?;
    if location.is_none() {
        if let Some(shadow) = point.shadow.as_mut() {
            shadow.coordinates = None;
        }
    }
    Ok(point)
}

pub async fn run(ctx: &Context, source: &SourceArgs, time: &str) -> Result<()> {
    let (data, location) = source.load(ctx).await?;
    let point = sample_at(&data, location, time)?;

    if ctx.is_json() {
        return print_json(&point);
    }
    print_point(&point, ctx.locale);
    Ok(())
}

pub fn print_point(point: &SolarDataPoint, l: Locale) {
    Status::header(&format!("{} {}", t(l, "sidebar.time"), point.timestamp));
    Status::field(t(l, "map.solarAltitude"), &format_degrees(point.sun.altitude));
    Status::field(t(l, "chart.azimuth"), &format_degrees(point.sun.azimuth));
    if let Some(irradiance) = point.irradiance {
        Status::field(
            t(l, "map.irradiance"),
            &format!(
                "GHI {}  DNI {}  DHI {}",
                format_irradiance(irradiance.ghi),
                format_irradiance(irradiance.dni),
                format_irradiance(irradiance.dhi)
            ),
        );
    }
    match point.shadow.as_ref().and_then(|s| s.length) {
        Some(length) => Status::field(t(l, "map.shadowLength"), &format_meters(length)),
        None => Status::field(t(l, "map.shadowLength"), &"-".dimmed().to_string()),
    }
    if let Some(direction) = point.shadow.as_ref().and_then(|s| s.direction) {
        Status::field(t(l, "chart.shadowDirection"), &format_degrees(direction));
    }
}
