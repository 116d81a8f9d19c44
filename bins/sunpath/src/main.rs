//! SunPath terminal client
//!
//! Calculates a day of sun positions, irradiance and shadows through the
//! backend, then plays, interpolates, compares and exports the result.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use sunpath_api_client::ApiError;
use sunpath_core::error::exit_codes;
use sunpath_cli::output::Status;
use sunpath_core::i18n::Locale;
use sunpath_simulation::{ExportFormat, PlaySpeed};
use sunpath_telemetry::TelemetryConfig;

mod commands;
mod context;

use commands::{
    animate, at, batch, calculate, export, geocode, health, locale, preset, seasons, serve, solar,
    ScenarioArgs, SourceArgs,
};
use context::{Context, OutputFormat, Silent};

/// Solar path, irradiance and shadow simulator
#[derive(Parser)]
#[command(name = "sunpath")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Message language (ko, en)
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a full day for a location
    Calculate {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Minutes between samples
        #[arg(long)]
        interval: Option<u32>,

        /// Save the raw response as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find the best collection periods for a calculated day
    Optimize {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Send several requests in one round trip
    Batch {
        /// JSON file with an array of requests or a {requests, parallel} object
        file: PathBuf,

        /// Ask the backend to process requests one after another
        #[arg(long)]
        sequential: bool,
    },

    /// Compare the equinoxes and solstices of a year
    Seasons {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        #[arg(long, default_value_t = sunpath_simulation::insights::SEASON_YEAR)]
        year: i32,

        /// Object height in meters
        #[arg(long)]
        height: Option<f64>,
    },

    /// Sunrise and sunset for a day
    Sunrise {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<String>,
    },

    /// Shadow of an object at one moment
    Shadow {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// HH:MM
        #[arg(long)]
        time: String,
    },

    /// Check that the backend is reachable
    Health {
        /// Include response time
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show the backend's cache statistics
    CacheStats,

    /// Sun and shadow at any minute of a calculated day
    At {
        #[command(flatten)]
        source: SourceArgs,

        /// HH:MM
        time: String,
    },

    /// Play a calculated day minute by minute
    Animate {
        #[command(flatten)]
        source: SourceArgs,

        /// Start of playback (HH:MM)
        #[arg(long)]
        from: Option<String>,

        /// End of the playback window (HH:MM)
        #[arg(long)]
        until: Option<String>,

        /// Playback speed: 0.5, 1, 2 or 5
        #[arg(long, default_value = "1")]
        speed: PlaySpeed,
    },

    /// Write a calculated day as CSV, JSON, a text summary or a PDF report
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// csv, json, summary or pdf
        #[arg(long = "as", default_value = "csv")]
        kind: ExportFormat,

        /// Output file (default: sunpath_<date>.<ext> in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage saved scenarios
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Address search
    Geocode {
        #[command(subcommand)]
        action: GeocodeAction,
    },

    /// Message languages
    Locale {
        #[command(subcommand)]
        action: LocaleAction,
    },

    /// Run the passthrough proxy
    Serve {
        /// Listen address (overrides proxy.bind)
        #[arg(long)]
        bind: Option<String>,

        /// Backend URL (overrides proxy.backend_url)
        #[arg(long)]
        backend: Option<String>,

        /// Emit JSON log lines
        #[arg(long)]
        json_logs: bool,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// Save a scenario
    Save {
        /// Preset name
        name: String,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<String>,

        /// Object height in meters
        #[arg(long)]
        height: Option<f64>,
    },

    /// List saved scenarios, favorites first
    List,

    /// Show a scenario, optionally calculating it
    Load {
        id: String,

        /// Calculate the scenario right away
        #[arg(long)]
        run: bool,
    },

    /// Delete a scenario
    Delete { id: String },

    /// Star or unstar a scenario
    Favorite { id: String },
}

#[derive(Subcommand)]
enum GeocodeAction {
    /// Find places by address or name
    Search { query: String },

    /// Name the place at a coordinate
    Reverse {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

#[derive(Subcommand)]
enum LocaleAction {
    /// Supported languages
    List,
    /// The language in use and where it came from
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = match Context::load(cli.config.as_deref(), cli.locale.as_deref(), cli.format, cli.verbose) {
        Ok(ctx) => ctx,
        Err(e) => return report(&e, Locale::resolve(cli.locale.as_deref(), None), false),
    };

    let telemetry = match &cli.command {
        Commands::Serve { json_logs, .. } => {
            TelemetryConfig::for_server(if cli.verbose { "debug" } else { "info" }, *json_logs)
        }
        _ => TelemetryConfig::for_cli(cli.verbose, &ctx.config.schema.app.log_level),
    };
    if let Err(e) = sunpath_telemetry::init_with_config(telemetry) {
        if cli.verbose {
            Status::warning(&format!("Logging disabled: {e:#}"));
        }
    }

    let result = match cli.command {
        Commands::Calculate { scenario, interval, output } => {
            calculate::run(&ctx, &scenario, interval, output.as_deref()).await
        }
        Commands::Optimize { source } => calculate::optimize(&ctx, &source).await,
        Commands::Batch { file, sequential } => batch::run(&ctx, &file, sequential).await,
        Commands::Seasons { lat, lon, year, height } => {
            seasons::run(&ctx, lat, lon, year, height).await
        }
        Commands::Sunrise { lat, lon, date } => solar::sunrise(&ctx, lat, lon, date.as_deref()).await,
        Commands::Shadow { scenario, time } => solar::shadow(&ctx, &scenario, &time).await,
        Commands::Health { detailed } => health::run(&ctx, detailed).await,
        Commands::CacheStats => health::cache_stats(&ctx).await,
        Commands::At { source, time } => at::run(&ctx, &source, &time).await,
        Commands::Animate { source, from, until, speed } => {
            animate::run(&ctx, &source, from.as_deref(), until.as_deref(), speed).await
        }
        Commands::Export { source, kind, output } => {
            export::run(&ctx, &source, kind, output.as_deref()).await
        }
        Commands::Preset { action } => match action {
            PresetAction::Save { name, lat, lon, date, height } => {
                preset::save(&ctx, &name, lat, lon, date.as_deref(), height)
            }
            PresetAction::List => preset::list(&ctx),
            PresetAction::Load { id, run } => preset::load(&ctx, &id, run).await,
            PresetAction::Delete { id } => preset::delete(&ctx, &id),
            PresetAction::Favorite { id } => preset::favorite(&ctx, &id),
        },
        Commands::Geocode { action } => match action {
            GeocodeAction::Search { query } => geocode::search(&ctx, &query).await,
            GeocodeAction::Reverse { lat, lon } => geocode::reverse(&ctx, lat, lon).await,
        },
        Commands::Locale { action } => match action {
            LocaleAction::List => locale::list(&ctx),
            LocaleAction::Show => locale::show(&ctx, cli.locale.as_deref()),
        },
        Commands::Serve { bind, backend, .. } => {
            serve::run(&ctx, bind.as_deref(), backend.as_deref()).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e, ctx.locale, ctx.is_json()),
    }
}

/// Print the failure (unless already reported) and pick the exit code
fn report(err: &anyhow::Error, locale: Locale, json: bool) -> ExitCode {
    let code = if let Some(Silent(code)) = err.downcast_ref::<Silent>() {
        *code
    } else if let Some(api) = err.downcast_ref::<ApiError>() {
        Status::error(&api.user_message(locale));
        api.exit_code()
    } else if let Some(core) = err.downcast_ref::<sunpath_core::Error>() {
        if json {
            if let Ok(report) = serde_json::to_string_pretty(&core.to_report()) {
                println!("{report}");
            }
        }
        Status::error(&core.to_string());
        match core.code.category() {
            "Validation" => exit_codes::VALIDATION_ERROR,
            "Configuration" => exit_codes::CONFIG_ERROR,
            _ => exit_codes::FAILURE,
        }
    } else {
        Status::error(&format!("{err:#}"));
        exit_codes::FAILURE
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
