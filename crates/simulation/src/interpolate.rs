//! Sun and shadow at an arbitrary instant between calculated samples

use crate::geometry::{lerp, lerp_angle, shadow_endpoint};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use sunpath_core::model::{Coordinates, Irradiance, Shadow, SolarDataPoint, SunPosition};
use sunpath_core::{Error, Result};

/// Parse a sample timestamp. Naive timestamps are taken as UTC.
#[must_use]
pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(timestamp).ok().or_else(|| {
        NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Utc.fix().from_utc_datetime(&naive))
    })
}

/// Resolve a wall-clock `HH:MM` on `date` in the offset of the series'
/// first timestamp (UTC when it has none).
pub fn target_instant(
    date: &str,
    time: &str,
    series: &[SolarDataPoint],
) -> Result<DateTime<FixedOffset>> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| Error::invalid_format("date", date, "YYYY-MM-DD"))?;
    let clock = sunpath_core::model::parse_hhmm("time", time)?;

    let offset = series
        .first()
        .and_then(|p| parse_timestamp(&p.timestamp))
        .map_or_else(|| Utc.fix(), |t| *t.offset());

    offset
        .from_local_datetime(&day.and_time(clock))
        .single()
        .ok_or_else(|| Error::validation(format!("{date} {time} does not exist in offset {offset}")))
}

/// Estimate the sample at `target`.
///
/// Neighbors are the first adjacent pair bracketing `target`, or the first
/// and last samples when none does. Returns `None` for a series with no
/// parseable timestamps.
#[must_use]
pub fn interpolate_at(
    series: &[SolarDataPoint],
    target: DateTime<FixedOffset>,
    location: Coordinates,
) -> Option<SolarDataPoint> {
    let timed: Vec<(DateTime<FixedOffset>, &SolarDataPoint)> = series
        .iter()
        .filter_map(|p| parse_timestamp(&p.timestamp).map(|t| (t, p)))
        .collect();

    let (first, last) = (timed.first()?, timed.last()?);
    let (prev, next) = timed
        .windows(2)
        .find(|w| w[0].0 <= target && target <= w[1].0)
        .map_or((first, last), |w| (&w[0], &w[1]));

    let span = (next.0 - prev.0).num_milliseconds();
    if span <= 0 {
        return Some(prev.1.clone());
    }

    #[allow(clippy::cast_precision_loss)]
    let ratio = ((target - prev.0).num_milliseconds() as f64 / span as f64).clamp(0.0, 1.0);
    let (a, b) = (prev.1, next.1);

    Some(SolarDataPoint {
        timestamp: target.to_rfc3339(),
        sun: blend_sun(&a.sun, &b.sun, ratio),
        irradiance: match (&a.irradiance, &b.irradiance) {
            (Some(x), Some(y)) => Some(blend_irradiance(x, y, ratio)),
            _ => None,
        },
        shadow: match (&a.shadow, &b.shadow) {
            (Some(x), Some(y)) => Some(blend_shadow(x, y, ratio, location)),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        },
    })
}

fn blend_sun(a: &SunPosition, b: &SunPosition, ratio: f64) -> SunPosition {
    SunPosition {
        altitude: lerp(a.altitude, b.altitude, ratio),
        azimuth: lerp_angle(a.azimuth, b.azimuth, ratio),
        zenith: lerp(a.zenith, b.zenith, ratio),
        hour_angle: match (a.hour_angle, b.hour_angle) {
            (Some(x), Some(y)) => Some(lerp(x, y, ratio)),
            _ => None,
        },
    }
}

fn blend_irradiance(a: &Irradiance, b: &Irradiance, ratio: f64) -> Irradiance {
    Irradiance {
        ghi: lerp(a.ghi, b.ghi, ratio),
        dni: lerp(a.dni, b.dni, ratio),
        dhi: lerp(a.dhi, b.dhi, ratio),
        par: match (a.par, b.par) {
            (Some(x), Some(y)) => Some(lerp(x, y, ratio)),
            _ => None,
        },
    }
}

fn blend_shadow(a: &Shadow, b: &Shadow, ratio: f64, location: Coordinates) -> Shadow {
    let length = match (a.length, b.length) {
        (Some(x), Some(y)) => Some(lerp(x, y, ratio)),
        _ => None,
    };
    let direction = match (a.direction, b.direction) {
        (Some(x), Some(y)) => Some(lerp_angle(x, y, ratio)),
        _ => None,
    };
    let coordinates = length
        .zip(direction)
        .and_then(|(l, d)| shadow_endpoint(location.lat, location.lon, l, d))
        .map(|segment| segment.to_vec());

    Shadow {
        length,
        direction,
        coordinates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SEOUL: Coordinates = Coordinates {
        lat: 37.5665,
        lon: 126.978,
    };

    fn point(ts: &str, alt: f64, az: f64, ghi: Option<f64>, shadow: Option<(f64, f64)>) -> SolarDataPoint {
        SolarDataPoint {
            timestamp: ts.to_string(),
            sun: SunPosition {
                altitude: alt,
                azimuth: az,
                zenith: 90.0 - alt,
                hour_angle: Some(0.0),
            },
            irradiance: ghi.map(|g| Irradiance {
                ghi: g,
                dni: g * 0.8,
                dhi: g * 0.2,
                par: Some(g * 2.0),
            }),
            shadow: shadow.map(|(length, direction)| Shadow {
                length: Some(length),
                direction: Some(direction),
                coordinates: None,
            }),
        }
    }

    fn at(ts: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(ts).unwrap()
    }

    fn hourly() -> Vec<SolarDataPoint> {
        vec![
            point("2025-06-21T11:00:00+09:00", 70.0, 150.0, Some(800.0), Some((3.6, 330.0))),
            point("2025-06-21T12:00:00+09:00", 74.0, 170.0, Some(900.0), Some((2.8, 350.0))),
            point("2025-06-21T13:00:00+09:00", 74.5, 200.0, Some(880.0), Some((2.7, 20.0))),
        ]
    }

    #[test]
    fn test_midpoint() {
        let p = interpolate_at(&hourly(), at("2025-06-21T12:30:00+09:00"), SEOUL).unwrap();
        assert_eq!(p.timestamp, "2025-06-21T12:30:00+09:00");
        assert!((p.sun.altitude - 74.25).abs() < 1e-9);
        assert!((p.sun.azimuth - 185.0).abs() < 1e-9);
        assert!((p.irradiance.as_ref().unwrap().ghi - 890.0).abs() < 1e-9);

        let shadow = p.shadow.unwrap();
        assert!((shadow.length.unwrap() - 2.75).abs() < 1e-9);
        // 350° → 20° crosses north
        assert!((shadow.direction.unwrap() - 5.0).abs() < 1e-9);
        let coords = shadow.coordinates.unwrap();
        assert_eq!(coords[0], [SEOUL.lon, SEOUL.lat]);
        assert!(coords[1][1] > SEOUL.lat);
    }

    #[test]
    fn test_exact_sample_is_reproduced() {
        let p = interpolate_at(&hourly(), at("2025-06-21T12:00:00+09:00"), SEOUL).unwrap();
        assert!((p.sun.altitude - 74.0).abs() < 1e-9);
        assert!((p.sun.azimuth - 170.0).abs() < 1e-9);
    }

    #[test]
    fn test_outside_range_clamps_to_ends() {
        let series = hourly();
        let before = interpolate_at(&series, at("2025-06-21T09:00:00+09:00"), SEOUL).unwrap();
        assert!((before.sun.altitude - 70.0).abs() < 1e-9);
        assert_eq!(before.timestamp, "2025-06-21T09:00:00+09:00");

        let after = interpolate_at(&series, at("2025-06-21T18:00:00+09:00"), SEOUL).unwrap();
        assert!((after.sun.altitude - 74.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_unparseable_series() {
        assert!(interpolate_at(&[], at("2025-06-21T12:00:00+09:00"), SEOUL).is_none());
        let junk = vec![point("noon-ish", 70.0, 180.0, None, None)];
        assert!(interpolate_at(&junk, at("2025-06-21T12:00:00+09:00"), SEOUL).is_none());
    }

    #[test]
    fn test_single_sample_returned_unchanged() {
        let series = vec![hourly().remove(1)];
        let p = interpolate_at(&series, at("2025-06-21T15:00:00+09:00"), SEOUL).unwrap();
        assert_eq!(p, series[0]);
    }

    #[test]
    fn test_partial_irradiance_and_shadow() {
        let series = vec![
            point("2025-06-21T05:00:00+09:00", -2.4, 57.7, None, None),
            point("2025-06-21T06:00:00+09:00", 8.1, 66.6, Some(120.0), Some((70.0, 246.6))),
        ];
        let p = interpolate_at(&series, at("2025-06-21T05:30:00+09:00"), SEOUL).unwrap();
        assert!(p.irradiance.is_none());
        assert_eq!(p.shadow, series[1].shadow);
    }

    #[test]
    fn test_missing_par_or_hour_angle() {
        let mut series = hourly();
        series[0].irradiance.as_mut().unwrap().par = None;
        series[1].sun.hour_angle = None;
        let p = interpolate_at(&series, at("2025-06-21T11:30:00+09:00"), SEOUL).unwrap();
        assert!(p.irradiance.unwrap().par.is_none());
        assert!(p.sun.hour_angle.is_none());
    }

    #[test]
    fn test_night_shadow_has_no_coordinates() {
        let mut series = hourly();
        for p in &mut series {
            p.shadow = Some(Shadow::default());
        }
        let shadow = interpolate_at(&series, at("2025-06-21T11:30:00+09:00"), SEOUL)
            .unwrap()
            .shadow
            .unwrap();
        assert!(shadow.length.is_none());
        assert!(shadow.coordinates.is_none());
    }

    #[test]
    fn test_target_instant_uses_series_offset() {
        let target = target_instant("2025-06-21", "12:30", &hourly()).unwrap();
        assert_eq!(target.to_rfc3339(), "2025-06-21T12:30:00+09:00");

        let utc = target_instant("2025-06-21", "12:30", &[]).unwrap();
        assert_eq!(utc.to_rfc3339(), "2025-06-21T12:30:00+00:00");

        assert!(target_instant("2025-06-21", "noon", &[]).is_err());
    }

    #[test]
    fn test_naive_timestamps_read_as_utc() {
        let t = parse_timestamp("2025-06-21T03:00:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2025-06-21T03:00:00+00:00");
        assert!(parse_timestamp("yesterday").is_none());
    }

    proptest! {
        #[test]
        fn altitude_stays_between_neighbors(minute in 0i64..=60) {
            let series = hourly();
            let target = at("2025-06-21T11:00:00+09:00") + chrono::Duration::minutes(minute);
            let p = interpolate_at(&series, target, SEOUL).unwrap();
            prop_assert!(p.sun.altitude >= 70.0 - 1e-9 && p.sun.altitude <= 74.0 + 1e-9);
            prop_assert!((0.0..360.0).contains(&p.sun.azimuth));
        }
    }
}
