//! `export`

use super::SourceArgs;
use crate::context::{print_json, Context};
use anyhow::Result;
use serde_json::json;
use std::path::{Path, PathBuf};
use sunpath_cli::output::Status;
use sunpath_simulation::ExportFormat;
use sunpath_telemetry::Event;

pub async fn run(
    ctx: &Context,
    source: &SourceArgs,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let (data, _) = source.load(ctx).await?;
    let path = output.map_or_else(|| PathBuf::from(format.default_filename(&data)), Path::to_path_buf);

    format.write(&data, ctx.locale, &path)?;
    Event::new(
        "export",
        json!({ "format": format.to_string(), "points": data.series.len() }),
    )
    .log();

    if ctx.is_json() {
        return print_json(&json!({
            "format": format.to_string(),
            "path": path.display().to_string(),
            "points": data.series.len(),
        }));
    }
    Status::success(&format!("{} → {}", format, path.display()));
    Ok(())
}
