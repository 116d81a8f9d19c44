//! Series peaks and the four-season comparison

use serde::Serialize;
use std::fmt;
use sunpath_core::i18n::{t, Locale};
use sunpath_core::model::{BatchCalculationResponse, SolarCalculationRequest, SolarDataPoint};

/// Default year for the season dates
pub const SEASON_YEAR: i32 = 2025;

/// One extreme value and when it happened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peak {
    pub value: f64,
    pub timestamp: String,
}

/// Extremes found in a series
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesPeaks {
    pub max_altitude: Option<Peak>,
    pub max_ghi: Option<Peak>,
    pub min_shadow: Option<Peak>,
}

/// Scan a series for its highest sun, strongest GHI and shortest shadow.
///
/// Non-finite and missing values are skipped. On ties the earliest sample wins.
#[must_use]
pub fn series_peaks(series: &[SolarDataPoint]) -> SeriesPeaks {
    let altitude = series.iter().map(|p| Some(p.sun.altitude));
    let ghi = series.iter().map(|p| p.irradiance.map(|i| i.ghi));
    let shadow = series
        .iter()
        .map(|p| p.shadow.as_ref().and_then(|s| s.length));

    SeriesPeaks {
        max_altitude: extreme(series, altitude, |v, best| v > best),
        max_ghi: extreme(series, ghi, |v, best| v > best),
        min_shadow: extreme(series, shadow, |v, best| v < best),
    }
}

fn extreme(
    series: &[SolarDataPoint],
    values: impl Iterator<Item = Option<f64>>,
    better: impl Fn(f64, f64) -> bool,
) -> Option<Peak> {
    let mut best: Option<(f64, &str)> = None;
    for (point, value) in series.iter().zip(values) {
        let Some(v) = value.filter(|v| v.is_finite()) else {
            continue;
        };
        if best.map_or(true, |(b, _)| better(v, b)) {
            best = Some((v, point.timestamp.as_str()));
        }
    }
    best.map(|(value, timestamp)| Peak {
        value,
        timestamp: timestamp.to_string(),
    })
}

/// Equinoxes and solstices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// `MM-DD` of the equinox or solstice
    #[must_use]
    pub fn month_day(self) -> &'static str {
        match self {
            Self::Spring => "03-20",
            Self::Summer => "06-21",
            Self::Autumn => "09-23",
            Self::Winter => "12-21",
        }
    }

    #[must_use]
    pub fn date(self, year: i32) -> String {
        format!("{year:04}-{}", self.month_day())
    }

    fn key(self) -> &'static str {
        match self {
            Self::Spring => "seasons.spring",
            Self::Summer => "seasons.summer",
            Self::Autumn => "seasons.autumn",
            Self::Winter => "seasons.winter",
        }
    }

    /// Localized name
    #[must_use]
    pub fn label(self, locale: Locale) -> &'static str {
        t(locale, self.key())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        };
        f.write_str(name)
    }
}

/// One full-day request per season, in [`Season::ALL`] order
#[must_use]
pub fn season_requests(lat: f64, lon: f64, year: i32, object_height: f64) -> Vec<SolarCalculationRequest> {
    Season::ALL
        .iter()
        .map(|s| SolarCalculationRequest::for_day(lat, lon, &s.date(year), object_height))
        .collect()
}

/// A season's headline numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonRow {
    pub season: Season,
    pub date: String,
    pub max_altitude: f64,
    /// Hours
    pub day_length: f64,
    pub sunrise: String,
    pub sunset: String,
    pub total_irradiance: Option<f64>,
}

/// Match batch results to seasons by their `index`.
///
/// Failed entries and indexes outside the four seasons are skipped, so the
/// remaining rows keep their own season even when an earlier one failed.
/// A result without a dated sample falls back to the season's date in `year`.
#[must_use]
pub fn pair_seasons(response: &BatchCalculationResponse, year: i32) -> Vec<SeasonRow> {
    let mut rows: Vec<SeasonRow> = response
        .results
        .iter()
        .filter(|item| item.success)
        .filter_map(|item| {
            let season = *Season::ALL.get(item.index)?;
            let result = item.result.as_ref()?;
            let max_altitude = series_peaks(&result.series)
                .max_altitude
                .map_or(result.summary.max_altitude, |p| p.value);
            Some(SeasonRow {
                season,
                date: result
                    .first_date()
                    .map_or_else(|| season.date(year), str::to_string),
                max_altitude,
                day_length: result.summary.day_length,
                sunrise: result.summary.sunrise.clone(),
                sunset: result.summary.sunset.clone(),
                total_irradiance: result.summary.total_irradiance,
            })
        })
        .collect();
    rows.sort_by_key(|r| r.season as u8);
    rows
}
