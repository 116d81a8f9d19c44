//! `geocode`

use crate::context::{print_json, Context};
use anyhow::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use sunpath_cli::output::{format_count, Status};

pub async fn search(ctx: &Context, query: &str) -> Result<()> {
    let client = ctx.client()?;
    let results = client.geocoding().search(query).await?;

    if ctx.is_json() {
        return print_json(&results);
    }
    if results.is_empty() {
        Status::warning(&format!("No places found for '{query}'"));
        return Ok(());
    }

    Status::header(&format_count(results.len(), "place", "places"));
    for place in &results {
        println!(
            "  {:>9.4}, {:>9.4}  {}",
            place.lat,
            place.lon,
            place.display_name.bold()
        );
    }
    Ok(())
}

pub async fn reverse(ctx: &Context, lat: f64, lon: f64) -> Result<()> {
    let client = ctx.client()?;
    let name = client.geocoding().reverse(lat, lon).await?;

    if ctx.is_json() {
        return print_json(&json!({ "lat": lat, "lon": lon, "name": name }));
    }
    match name {
        Some(name) => println!("{name}"),
        None => println!("{}", "N/A".dimmed()),
    }
    Ok(())
}
