//! `animate`: minute-by-minute playback in the terminal

use super::at::sample_at;
use super::SourceArgs;
use crate::context::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use sunpath_cli::output::{format_degrees, format_irradiance, format_meters, Status};
use sunpath_core::i18n::t;
use sunpath_core::model::{Coordinates, SolarCalculationResponse};
use sunpath_simulation::{Animator, PlaySpeed, TimeOfDay, Timeline};
use tracing::debug;

pub async fn run(
    ctx: &Context,
    source: &SourceArgs,
    from: Option<&str>,
    until: Option<&str>,
    speed: PlaySpeed,
) -> Result<()> {
    let (data, location) = source.load(ctx).await?;

    let window = ctx.timeline();
    let end = until.map_or(window.end, TimeOfDay::parse_lenient);
    let current = from.map_or(window.start, TimeOfDay::parse_lenient);
    let mut timeline = Timeline::new(window.start, end).at(current);
    timeline.set_speed(speed);

    if !ctx.is_json() {
        Status::info(&format!(
            "{} {} → {} ({speed})",
            t(ctx.locale, "timeline.play"),
            timeline.current,
            timeline.end
        ));
    }

    let (handle, task) = Animator::spawn(timeline);
    let mut updates = handle.subscribe();
    handle.play().await?;

    let mut last_shown = None;
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if last_shown != Some(state.current) {
                    frame(ctx, &data, location, state.current)?;
                    last_shown = Some(state.current);
                }
                if !state.playing {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Playback interrupted");
                break;
            }
        }
    }

    let _ = handle.stop().await;
    let final_state = task.await?;
    if !ctx.is_json() {
        Status::success(&format!("{} ({})", t(ctx.locale, "timeline.finished"), final_state.current));
    }
    Ok(())
}

fn frame(
    ctx: &Context,
    data: &SolarCalculationResponse,
    location: Option<Coordinates>,
    minute: TimeOfDay,
) -> Result<()> {
    let point = sample_at(data, location, &minute.to_string())?;

    if ctx.is_json() {
        println!("{}", serde_json::to_string(&point)?);
        return Ok(());
    }

    let ghi = point.irradiance.map_or_else(|| "-".to_string(), |i| format_irradiance(i.ghi));
    let shadow = point
        .shadow
        .as_ref()
        .and_then(|s| s.length)
        .map_or_else(|| "-".to_string(), format_meters);
    println!(
        "  {}  {:>7} {:>7}  {:>9}  {}",
        minute.to_string().bold(),
        format_degrees(point.sun.altitude),
        format_degrees(point.sun.azimuth),
        ghi,
        shadow.dimmed()
    );
    Ok(())
}
