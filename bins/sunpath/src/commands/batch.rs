//! `batch`

use super::clock;
use crate::context::{print_json, Context};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Deserialize;
use std::path::Path;
use sunpath_cli::output::{format_degrees, format_hours, Status};
use sunpath_cli::progress;
use sunpath_core::model::{BatchCalculationRequest, SolarCalculationRequest};
use sunpath_core::Error;

/// Accepted batch file shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchFile {
    Wrapped(BatchCalculationRequest),
    List(Vec<SolarCalculationRequest>),
}

fn read_batch(path: &Path) -> Result<(Vec<SolarCalculationRequest>, bool)> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::from(e).with_context(path.display().to_string()))?;
    let parsed: BatchFile = serde_json::from_str(&content).map_err(|e| {
        Error::invalid_format("batch file", &path.display().to_string(), "a JSON array of requests or {\"requests\": [...]}")
            .with_source(e)
    })?;
    Ok(match parsed {
        BatchFile::Wrapped(b) => (b.requests, b.parallel),
        BatchFile::List(requests) => (requests, true),
    })
}

pub async fn run(ctx: &Context, file: &Path, sequential: bool) -> Result<()> {
    let (requests, parallel) = read_batch(file)?;
    let parallel = parallel && !sequential;
    let labels: Vec<String> = requests
        .iter()
        .map(|r| format!("{} ({:.4}, {:.4})", r.datetime.date, r.location.lat, r.location.lon))
        .collect();

    let client = ctx.client()?;
    let spinner = progress::spinner(&format!("Calculating {} scenarios", requests.len()), ctx.quiet());
    let response = client.integrated().batch(requests, parallel).await;
    progress::finish(&spinner);
    let response = response?;

    if ctx.is_json() {
        return print_json(&response);
    }

    Status::header(&format!(
        "{}/{} succeeded in {:.0} ms",
        response.successful, response.total_requests, response.processing_time_ms
    ));

    let mut items: Vec<_> = response.results.iter().collect();
    items.sort_by_key(|item| item.index);
    for item in items {
        let label = labels.get(item.index).map_or("?", String::as_str);
        match (&item.result, item.success) {
            (Some(result), true) => println!(
                "  {} #{:<3} {}  {} → {}  {}  {}",
                "✓".green(),
                item.index,
                label,
                clock(&result.summary.sunrise),
                clock(&result.summary.sunset),
                format_hours(result.summary.day_length),
                format_degrees(result.summary.max_altitude)
            ),
            _ => println!(
                "  {} #{:<3} {}  {}",
                "✗".red(),
                item.index,
                label,
                item.error.as_deref().unwrap_or("failed").dimmed()
            ),
        }
    }
    Ok(())
}
