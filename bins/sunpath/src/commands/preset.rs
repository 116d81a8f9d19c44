//! `preset`: saved scenarios

use super::{calculate, today, ScenarioArgs};
use crate::context::{print_json, Context};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use sunpath_cli::output::{format_meters, Status};
use sunpath_core::i18n::t;
use sunpath_core::model::Coordinates;
use sunpath_core::presets::Preset;
use sunpath_core::Error;

pub fn save(
    ctx: &Context,
    name: &str,
    lat: f64,
    lon: f64,
    date: Option<&str>,
    height: Option<f64>,
) -> Result<()> {
    let mut store = ctx.presets()?;
    let date = date.map_or_else(today, str::to_string);
    let preset = store.save(name, Coordinates::new(lat, lon), &date, ctx.object_height(height))?;

    if ctx.is_json() {
        return print_json(preset);
    }
    Status::success(&format!("{}: {} ({})", t(ctx.locale, "presetManager.saved"), preset.name, preset.id));
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let store = ctx.presets()?;
    let presets = store.list();

    if ctx.is_json() {
        return print_json(&presets);
    }
    if presets.is_empty() {
        Status::info(t(ctx.locale, "presetManager.empty"));
        return Ok(());
    }

    let (favorites, others): (Vec<&Preset>, Vec<&Preset>) = presets.into_iter().partition(|p| p.favorite());
    for (heading, group) in [
        ("presetManager.favorites", favorites),
        ("presetManager.others", others),
    ] {
        if group.is_empty() {
            continue;
        }
        Status::header(t(ctx.locale, heading));
        for preset in group {
            print_line(preset);
        }
    }
    Ok(())
}

fn print_line(preset: &Preset) {
    let star = if preset.favorite() { "★" } else { " " };
    println!(
        "  {} {:<24} {:>9.4}, {:>9.4}  {}  {}  {}",
        star.yellow(),
        preset.name.bold(),
        preset.location.lat,
        preset.location.lon,
        preset.date,
        format_meters(preset.object_height),
        preset.id.dimmed()
    );
}

pub async fn load(ctx: &Context, id: &str, run: bool) -> Result<()> {
    if run {
        let scenario = ScenarioArgs {
            lat: None,
            lon: None,
            date: None,
            height: None,
            preset: Some(id.to_string()),
        };
        return calculate::run(ctx, &scenario, None, None).await;
    }

    let store = ctx.presets()?;
    let preset = store.get(id).ok_or_else(|| Error::preset_not_found(id))?;

    if ctx.is_json() {
        return print_json(preset);
    }
    let l = ctx.locale;
    Status::header(&preset.name);
    Status::field(t(l, "sidebar.latitude"), &format!("{:.4}", preset.location.lat));
    Status::field(t(l, "sidebar.longitude"), &format!("{:.4}", preset.location.lon));
    Status::field(t(l, "sidebar.date"), &preset.date);
    Status::field(t(l, "sidebar.objectHeight"), &format_meters(preset.object_height));
    Status::field("ID", &preset.id);
    Ok(())
}

pub fn delete(ctx: &Context, id: &str) -> Result<()> {
    let mut store = ctx.presets()?;
    let removed = store.delete(id)?;

    if ctx.is_json() {
        return print_json(&removed);
    }
    Status::success(&format!("{}: {}", t(ctx.locale, "presetManager.deleted"), removed.name));
    Ok(())
}

pub fn favorite(ctx: &Context, id: &str) -> Result<()> {
    let mut store = ctx.presets()?;
    let favorite = store.toggle_favorite(id)?;

    if ctx.is_json() {
        return print_json(&json!({ "id": id, "isFavorite": favorite }));
    }
    let name = store.get(id).map_or(id, |p| p.name.as_str());
    if favorite {
        Status::success(&format!("★ {name}"));
    } else {
        Status::info(&format!("☆ {name}"));
    }
    Ok(())
}
