//! CLI command implementations

pub mod animate;
pub mod at;
pub mod batch;
pub mod calculate;
pub mod export;
pub mod geocode;
pub mod health;
pub mod locale;
pub mod preset;
pub mod seasons;
pub mod serve;
pub mod solar;

use crate::context::Context;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use sunpath_api_client::SunpathClient;
use sunpath_cli::progress;
use sunpath_core::model::{parse_date, Coordinates, SolarCalculationRequest, SolarCalculationResponse};
use sunpath_core::{Error, ResultExt};
use sunpath_simulation::parse_timestamp;
use sunpath_telemetry::Timer;

/// Location, date and object height, given directly or through a preset
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    pub date: Option<String>,

    /// Object height in meters
    #[arg(long)]
    pub height: Option<f64>,

    /// Take location, date and height from a saved preset
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub preset: Option<String>,
}

/// A fully resolved scenario
#[derive(Debug, Clone)]
pub struct Scenario {
    pub location: Coordinates,
    pub date: String,
    pub height: f64,
}

impl Scenario {
    pub fn request(&self) -> SolarCalculationRequest {
        SolarCalculationRequest::for_day(self.location.lat, self.location.lon, &self.date, self.height)
    }
}

impl ScenarioArgs {
    /// Preset values first, then flags, then defaults
    pub fn resolve(&self, ctx: &Context) -> Result<Scenario> {
        if let Some(id) = &self.preset {
            let store = ctx.presets()?;
            let preset = store.get(id).ok_or_else(|| Error::preset_not_found(id))?;
            return Ok(Scenario {
                location: preset.location,
                date: self.date.clone().unwrap_or_else(|| preset.date.clone()),
                height: self.height.unwrap_or(preset.object_height),
            });
        }

        let location = self.location().ok_or_else(|| {
            Error::validation("A location is required").with_suggestion("Pass --lat and --lon, or --preset <id>")
        })?;
        location.validate()?;
        let date = self.date.clone().unwrap_or_else(today);
        parse_date(&date)?;

        Ok(Scenario {
            location,
            date,
            height: ctx.object_height(self.height),
        })
    }

    pub fn location(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

/// Where a calculated day comes from: a saved response or a fresh calculation
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Saved calculation response (JSON)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

impl SourceArgs {
    /// Read or calculate the day, plus the location when one is known
    pub async fn load(&self, ctx: &Context) -> Result<(SolarCalculationResponse, Option<Coordinates>)> {
        if let Some(path) = &self.input {
            let content = std::fs::read_to_string(path)
                .map_err(Error::from)
                .context(path.display().to_string())?;
            let data: SolarCalculationResponse = serde_json::from_str(&content)
                .map_err(Error::from)
                .context(path.display().to_string())?;
            let location = match &self.scenario.preset {
                Some(_) => Some(self.scenario.resolve(ctx)?.location),
                None => self.scenario.location(),
            };
            return Ok((data, location));
        }

        let scenario = self.scenario.resolve(ctx)?;
        let client = ctx.client()?;
        let data = fetch(ctx, &client, &scenario.request()).await?;
        Ok((data, Some(scenario.location)))
    }
}

/// Calculate with a spinner
pub async fn fetch(
    ctx: &Context,
    client: &SunpathClient,
    request: &SolarCalculationRequest,
) -> Result<SolarCalculationResponse> {
    let spinner = progress::spinner(
        &format!("Calculating {} ({:.4}, {:.4})", request.datetime.date, request.location.lat, request.location.lon),
        ctx.quiet(),
    );
    let timer = Timer::start("calculate");
    let result = client.integrated().calculate(request).await;
    timer.stop();
    progress::finish(&spinner);
    Ok(result?)
}

/// Today's date in UTC
pub fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// `HH:MM` of a backend timestamp, or the raw text when it does not parse
pub fn clock(timestamp: &str) -> String {
    parse_timestamp(timestamp).map_or_else(|| timestamp.to_string(), |t| t.format("%H:%M").to_string())
}
