//! CSV, JSON, plain-text and PDF exports of a calculation

use crate::insights::{series_peaks, Peak};
use crate::interpolate::parse_timestamp;
use crate::report;
use chrono::Utc;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use sunpath_core::i18n::{t, Locale};
use sunpath_core::model::{SolarCalculationResponse, SolarDataPoint};
use sunpath_core::{Error, Result};
use tracing::debug;

/// Byte-order mark so spreadsheet apps detect UTF-8
pub const BOM: char = '\u{feff}';

pub const CSV_HEADER: &str = "Timestamp,Date,Time,Sun Altitude (°),Sun Azimuth (°),Sun Zenith (°),GHI (W/m²),DNI (W/m²),DHI (W/m²),PAR (W/m²),Shadow Length (m),Shadow Direction (°)";

const NOT_AVAILABLE: &str = "N/A";

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Summary,
    /// Printable report, see [`crate::report`]
    Pdf,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Summary => "txt",
            Self::Pdf => "pdf",
        }
    }

    /// `sunpath_<date>.csv`, `sunpath_<date>.json`, `sunpath_summary_<date>.txt`
    /// or `sunpath_report_<date>.pdf`
    #[must_use]
    pub fn default_filename(self, data: &SolarCalculationResponse) -> String {
        let date = file_date(data);
        match self {
            Self::Summary => format!("sunpath_summary_{date}.txt"),
            Self::Pdf => format!("sunpath_report_{date}.pdf"),
            other => format!("sunpath_{date}.{}", other.extension()),
        }
    }

    /// Render the whole document. The PDF report is English only.
    pub fn render(self, data: &SolarCalculationResponse, locale: Locale) -> Result<Vec<u8>> {
        match self {
            Self::Csv => Ok(to_csv(data).into_bytes()),
            Self::Json => to_json(data).map(String::into_bytes),
            Self::Summary => Ok(summary_text(data, locale).into_bytes()),
            Self::Pdf => {
                let generated = Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
                report::to_pdf(data, &generated)
            }
        }
    }

    /// Render and write to `path`
    pub fn write(self, data: &SolarCalculationResponse, locale: Locale, path: &Path) -> Result<()> {
        let content = self.render(data, locale)?;
        fs::write(path, content).map_err(|e| {
            Error::export(format!("Failed to write {}: {e}", path.display())).with_source(e)
        })?;
        debug!(path = %path.display(), format = %self, "Exported calculation");
        Ok(())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Summary => "summary",
            Self::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "summary" | "txt" | "text" => Ok(Self::Summary),
            "pdf" | "report" => Ok(Self::Pdf),
            _ => Err(Error::invalid_format("format", s, "csv, json, summary or pdf")),
        }
    }
}

/// Calendar date of the first sample in its own offset, or `data`
fn file_date(data: &SolarCalculationResponse) -> String {
    data.series
        .first()
        .and_then(|p| parse_timestamp(&p.timestamp))
        .map_or_else(|| "data".to_string(), |ts| ts.format("%Y-%m-%d").to_string())
}

fn fixed(value: Option<f64>, digits: usize) -> String {
    match value {
        None => String::new(),
        Some(v) if !v.is_finite() => "Infinite".to_string(),
        Some(v) => format!("{v:.digits$}"),
    }
}

fn csv_row(point: &SolarDataPoint) -> String {
    let (date, time) = parse_timestamp(&point.timestamp).map_or_else(
        || (String::new(), String::new()),
        |ts| (ts.format("%Y-%m-%d").to_string(), ts.format("%H:%M").to_string()),
    );
    let irradiance = point.irradiance;
    let shadow = point.shadow.as_ref();

    [
        point.timestamp.clone(),
        date,
        time,
        fixed(Some(point.sun.altitude), 4),
        fixed(Some(point.sun.azimuth), 4),
        fixed(Some(point.sun.zenith), 4),
        fixed(irradiance.map(|i| i.ghi), 2),
        fixed(irradiance.map(|i| i.dni), 2),
        fixed(irradiance.map(|i| i.dhi), 2),
        fixed(irradiance.and_then(|i| i.par), 2),
        fixed(shadow.and_then(|s| s.length), 2),
        fixed(shadow.and_then(|s| s.direction), 2),
    ]
    .join(",")
}

/// BOM, header, then one row per sample joined by `\n`
#[must_use]
pub fn to_csv(data: &SolarCalculationResponse) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(CSV_HEADER);
    for point in &data.series {
        out.push('\n');
        out.push_str(&csv_row(point));
    }
    out
}

/// Pretty-printed response
pub fn to_json(data: &SolarCalculationResponse) -> Result<String> {
    serde_json::to_string_pretty(data)
        .map_err(|e| Error::export(format!("Failed to serialize calculation: {e}")).with_source(e))
}

fn date_time(value: &str) -> String {
    parse_timestamp(value).map_or_else(
        || NOT_AVAILABLE.to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

fn clock(peak: Option<&Peak>) -> String {
    peak.and_then(|p| parse_timestamp(&p.timestamp))
        .map_or_else(|| NOT_AVAILABLE.to_string(), |ts| ts.format("%H:%M").to_string())
}

fn peak_value(peak: Option<&Peak>, digits: usize) -> String {
    peak.map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{:.digits$}", p.value))
}

/// Human-readable report of the summary and the series extremes
#[must_use]
pub fn summary_text(data: &SolarCalculationResponse, locale: Locale) -> String {
    let s = &data.summary;
    let m = &data.metadata;
    let peaks = series_peaks(&data.series);
    let tr = |key| t(locale, key);

    let total = s
        .total_irradiance
        .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"));
    let shadow = peaks.min_shadow.as_ref().map_or_else(
        || NOT_AVAILABLE.to_string(),
        |p| {
            if p.value.is_infinite() {
                tr("summary.infinite").to_string()
            } else {
                format!("{:.2} m", p.value)
            }
        },
    );

    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", tr("summary.heading"));
    let _ = writeln!(out, "=======================================");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}: {}", tr("summary.sunrise"), date_time(&s.sunrise));
    let _ = writeln!(out, "{}: {}", tr("summary.sunset"), date_time(&s.sunset));
    let _ = writeln!(out, "{}: {}", tr("summary.solarNoon"), date_time(&s.solar_noon));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}: {:.2}{}", tr("summary.dayLength"), s.day_length, tr("summary.hours"));
    let _ = writeln!(out, "{}: {:.2}°", tr("summary.maxAltitude"), s.max_altitude);
    let _ = writeln!(out, "{}: {total} kWh/m²", tr("summary.totalIrradiance"));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", tr("summary.derived"));
    let _ = writeln!(
        out,
        "- {}: {} ({} {}°)",
        tr("summary.maxAltitudeTime"),
        clock(peaks.max_altitude.as_ref()),
        tr("summary.altitude"),
        peak_value(peaks.max_altitude.as_ref(), 2)
    );
    let _ = writeln!(
        out,
        "- {}: {} (GHI {} W/m²)",
        tr("summary.maxGhiTime"),
        clock(peaks.max_ghi.as_ref()),
        peak_value(peaks.max_ghi.as_ref(), 0)
    );
    let _ = writeln!(
        out,
        "- {}: {} ({} {shadow})",
        tr("summary.minShadowTime"),
        clock(peaks.min_shadow.as_ref()),
        tr("summary.length")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}: {}{}", tr("summary.dataPoints"), data.series.len(), tr("summary.count"));
    let _ = writeln!(out, "{}: {}", tr("summary.calculatedAt"), m.timestamp);
    let _ = writeln!(
        out,
        "{}: ±{}° ({}), ±{}% ({})",
        tr("summary.accuracy"),
        m.accuracy.position,
        tr("summary.position"),
        m.accuracy.irradiance,
        tr("summary.irradiance")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "===================================");
    let _ = write!(out, "{} v{}", tr("summary.generatedBy"), m.version);
    out
}
