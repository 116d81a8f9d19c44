//! End-to-end checks over a recorded Seoul summer solstice calculation

use sunpath_core::i18n::Locale;
use sunpath_core::model::{Coordinates, SolarCalculationResponse};
use sunpath_simulation::insights::series_peaks;
use sunpath_simulation::timeline::Tick;
use sunpath_simulation::{interpolate_at, target_instant, ExportFormat, TimeOfDay, Timeline};

fn seoul_solstice() -> SolarCalculationResponse {
    serde_json::from_str(include_str!("fixtures/seoul_2025-06-21.json")).unwrap()
}

#[test]
fn timeline_positions_resolve_to_interpolated_samples() {
    let data = seoul_solstice();
    let seoul = Coordinates::new(37.5665, 126.978);
    let mut timeline = Timeline::default().at(TimeOfDay::parse_lenient("12:30"));

    let target = target_instant("2025-06-21", &timeline.current.to_string(), &data.series).unwrap();
    let noon = interpolate_at(&data.series, target, seoul).unwrap();
    assert!(noon.sun.altitude > 74.2 && noon.sun.altitude < 74.7);
    assert_eq!(noon.timestamp, "2025-06-21T12:30:00+09:00");

    timeline.toggle_play();
    assert!(matches!(timeline.tick(), Tick::Advanced(_)));
    let target = target_instant("2025-06-21", &timeline.current.to_string(), &data.series).unwrap();
    let later = interpolate_at(&data.series, target, seoul).unwrap();
    assert_ne!(later.sun.azimuth, noon.sun.azimuth);
}

#[test]
fn exports_agree_with_series_peaks() {
    let data = seoul_solstice();
    let peaks = series_peaks(&data.series);
    let ghi = peaks.max_ghi.unwrap();

    let csv = String::from_utf8(ExportFormat::Csv.render(&data, Locale::En).unwrap()).unwrap();
    let row = csv.lines().find(|l| l.starts_with(&ghi.timestamp)).unwrap();
    assert!(row.contains(&format!("{:.2}", ghi.value)));

    let summary = String::from_utf8(ExportFormat::Summary.render(&data, Locale::En).unwrap()).unwrap();
    assert!(summary.contains(&format!("GHI {:.0} W/m²", ghi.value)));
}
