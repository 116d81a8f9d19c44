//! Korean and English message dictionaries
//!
//! Messages are looked up by dotted key (`errors.backendError`). Korean is
//! the default locale; a key missing from a locale falls back to Korean and
//! then to the key itself.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Supported UI locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// 한국어
    #[default]
    Ko,
    /// English
    En,
}

/// All supported locales, default first
pub const LOCALES: [Locale; 2] = [Locale::Ko, Locale::En];

impl Locale {
    /// Two-letter code
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Ko => "ko",
            Self::En => "en",
        }
    }

    /// Name of the language in itself
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ko => "한국어",
            Self::En => "English",
        }
    }

    /// Map a system language tag (`ko_KR.UTF-8`, `en-US`) to a locale
    #[must_use]
    pub fn from_language_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();
        if tag.starts_with("ko") {
            Some(Self::Ko)
        } else if tag.starts_with("en") {
            Some(Self::En)
        } else {
            None
        }
    }

    /// Pick a locale: explicit choice, `SUNPATH_LOCALE`, stored setting,
    /// then the system language (`LC_ALL`, `LANG`).
    #[must_use]
    pub fn resolve(explicit: Option<&str>, stored: Option<&str>) -> Self {
        let env_locale = std::env::var("SUNPATH_LOCALE").ok();
        let system = std::env::var("LC_ALL")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| std::env::var("LANG").ok());
        Self::resolve_from(explicit, env_locale.as_deref(), stored, system.as_deref())
    }

    /// [`Locale::resolve`] with every input passed in
    #[must_use]
    pub fn resolve_from(
        explicit: Option<&str>,
        env_locale: Option<&str>,
        stored: Option<&str>,
        system: Option<&str>,
    ) -> Self {
        [explicit, env_locale, stored]
            .into_iter()
            .flatten()
            .find_map(|code| code.parse().ok())
            .or_else(|| system.and_then(Self::from_language_tag))
            .unwrap_or_default()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ko" => Ok(Self::Ko),
            "en" => Ok(Self::En),
            other => Err(format!("unsupported locale '{other}' (expected ko or en)")),
        }
    }
}

const KO: &[(&str, &str)] = &[
    ("header.title", "SunPath & Shadow Simulator"),
    ("header.subtitle", "태양 경로 · 일조량 · 그림자 시뮬레이터"),
    ("header.apiConnected", "API 연결됨"),
    ("header.apiDisconnected", "API 연결 안 됨"),
    ("sidebar.location", "위치"),
    ("sidebar.latitude", "위도 (Latitude)"),
    ("sidebar.longitude", "경도 (Longitude)"),
    ("sidebar.date", "날짜"),
    ("sidebar.objectHeight", "물체 높이"),
    ("sidebar.time", "시각"),
    ("sidebar.dataPoints", "개 데이터 포인트"),
    ("sidebar.exportTitle", "데이터 내보내기"),
    ("map.solarAltitude", "태양 고도"),
    ("map.shadowLength", "그림자 길이"),
    ("map.irradiance", "일사량"),
    ("chart.azimuth", "방위각"),
    ("chart.shadowDirection", "그림자 방향"),
    ("optimization.optimalSunHours", "최적 일조 시간"),
    ("optimization.maxSolarAltitude", "최대 태양 고도"),
    ("optimization.dailyTotalIrradiance", "일일 총 일사량"),
    ("optimization.sunriseSunset", "일출/일몰"),
    ("optimization.maxIrradiance", "최대 일사량 시각"),
    ("optimization.minShadow", "최소 그림자 시각"),
    ("optimization.shadowInterference", "그림자 간섭 구간"),
    ("timeline.play", "재생"),
    ("timeline.pause", "일시정지"),
    ("timeline.finished", "타임라인 끝에 도달했습니다"),
    ("presetManager.saved", "프리셋을 저장했습니다"),
    ("presetManager.deleted", "프리셋을 삭제했습니다"),
    ("presetManager.empty", "저장된 프리셋이 없습니다"),
    ("presetManager.favorites", "즐겨찾기"),
    ("presetManager.others", "프리셋"),
    ("seasons.title", "계절 비교"),
    ("seasons.spring", "봄"),
    ("seasons.summer", "여름"),
    ("seasons.autumn", "가을"),
    ("seasons.winter", "겨울"),
    ("seasons.failed", "계절 비교 실패"),
    ("summary.heading", "SunPath & Shadow Simulator - 계산 결과"),
    ("summary.sunrise", "일출"),
    ("summary.sunset", "일몰"),
    ("summary.solarNoon", "정오"),
    ("summary.dayLength", "일조 시간"),
    ("summary.hours", "시간"),
    ("summary.maxAltitude", "최대 태양 고도"),
    ("summary.totalIrradiance", "총 일사량"),
    ("summary.derived", "[실데이터 기반 요약]"),
    ("summary.maxAltitudeTime", "최댓 고도 시각"),
    ("summary.altitude", "고도"),
    ("summary.maxGhiTime", "최댓 GHI 시각"),
    ("summary.minShadowTime", "최소 그림자 길이 시각"),
    ("summary.length", "길이"),
    ("summary.infinite", "무한대"),
    ("summary.dataPoints", "데이터 포인트"),
    ("summary.count", "개"),
    ("summary.calculatedAt", "계산 시각"),
    ("summary.accuracy", "정확도"),
    ("summary.position", "위치"),
    ("summary.irradiance", "일사량"),
    ("summary.generatedBy", "Generated by SunPath & Shadow Simulator"),
    ("errors.invalidLocation", "잘못된 위치 값입니다. 다시 시도해주세요."),
    ("errors.invalidLocationRange", "위치 범위가 올바르지 않습니다."),
    ("errors.loadDataError", "데이터를 불러오는 중 오류가 발생했습니다"),
    ("errors.requestTimeout", "요청이 타임아웃되었습니다. 백엔드 서버 응답이 너무 오래 걸립니다."),
    ("errors.clientTimeout", "요청이 {secs}초 내에 완료되지 않았습니다."),
    ("errors.backendError", "백엔드 서버 오류가 발생했습니다. 잠시 후 다시 시도해주세요."),
    ("errors.notFound", "요청한 리소스를 찾을 수 없습니다."),
    ("errors.serverError", "서버 오류 ({status})"),
    ("errors.statusFallback", "Server returned status {status}"),
    ("proxy.timeout", "백엔드 서버 응답이 너무 오래 걸립니다. 잠시 후 다시 시도해주세요."),
    ("proxy.timeoutDetail", "요청이 {secs}초 내에 완료되지 않았습니다."),
    ("proxy.network", "백엔드 서버에 연결할 수 없습니다. 서버가 실행 중인지 확인해주세요."),
    ("proxy.readError", "백엔드 서버 응답을 읽을 수 없습니다."),
    ("proxy.gatewayTimeout", "백엔드 서버가 응답하는 데 시간이 너무 오래 걸립니다. 잠시 후 다시 시도해주세요."),
    ("proxy.gatewayTimeoutDetail", "백엔드 서버의 타임아웃 제한에 걸렸을 수 있습니다."),
    ("proxy.backendError", "백엔드 서버에서 오류가 발생했습니다."),
    ("proxy.unexpected", "프록시 요청 중 예기치 않은 오류가 발생했습니다."),
];

const EN: &[(&str, &str)] = &[
    ("header.title", "SunPath & Shadow Simulator"),
    ("header.subtitle", "Solar Path · Irradiance · Shadow Simulator"),
    ("header.apiConnected", "API Connected"),
    ("header.apiDisconnected", "API Unreachable"),
    ("sidebar.location", "Location"),
    ("sidebar.latitude", "Latitude"),
    ("sidebar.longitude", "Longitude"),
    ("sidebar.date", "Date"),
    ("sidebar.objectHeight", "Object Height"),
    ("sidebar.time", "Time"),
    ("sidebar.dataPoints", " data points"),
    ("sidebar.exportTitle", "Export Data"),
    ("map.solarAltitude", "Solar Altitude"),
    ("map.shadowLength", "Shadow Length"),
    ("map.irradiance", "Irradiance"),
    ("chart.azimuth", "Azimuth"),
    ("chart.shadowDirection", "Shadow Direction"),
    ("optimization.optimalSunHours", "Optimal Sunlight Hours"),
    ("optimization.maxSolarAltitude", "Maximum Solar Altitude"),
    ("optimization.dailyTotalIrradiance", "Daily Total Irradiance"),
    ("optimization.sunriseSunset", "Sunrise/Sunset"),
    ("optimization.maxIrradiance", "Peak Irradiance"),
    ("optimization.minShadow", "Shortest Shadow"),
    ("optimization.shadowInterference", "Shadow Interference"),
    ("timeline.play", "Play"),
    ("timeline.pause", "Pause"),
    ("timeline.finished", "Reached the end of the timeline"),
    ("presetManager.saved", "Preset saved"),
    ("presetManager.deleted", "Preset deleted"),
    ("presetManager.empty", "No saved presets"),
    ("presetManager.favorites", "Favorites"),
    ("presetManager.others", "Presets"),
    ("seasons.title", "Season Comparison"),
    ("seasons.spring", "Spring"),
    ("seasons.summer", "Summer"),
    ("seasons.autumn", "Autumn"),
    ("seasons.winter", "Winter"),
    ("seasons.failed", "Season comparison failed"),
    ("summary.heading", "SunPath & Shadow Simulator - Calculation Results"),
    ("summary.sunrise", "Sunrise"),
    ("summary.sunset", "Sunset"),
    ("summary.solarNoon", "Solar noon"),
    ("summary.dayLength", "Day length"),
    ("summary.hours", " hours"),
    ("summary.maxAltitude", "Maximum solar altitude"),
    ("summary.totalIrradiance", "Total irradiance"),
    ("summary.derived", "[Derived from series]"),
    ("summary.maxAltitudeTime", "Highest sun at"),
    ("summary.altitude", "altitude"),
    ("summary.maxGhiTime", "Peak GHI at"),
    ("summary.minShadowTime", "Shortest shadow at"),
    ("summary.length", "length"),
    ("summary.infinite", "infinite"),
    ("summary.dataPoints", "Data points"),
    ("summary.count", ""),
    ("summary.calculatedAt", "Calculated at"),
    ("summary.accuracy", "Accuracy"),
    ("summary.position", "position"),
    ("summary.irradiance", "irradiance"),
    ("summary.generatedBy", "Generated by SunPath & Shadow Simulator"),
    ("errors.invalidLocation", "Invalid location value. Please try again."),
    ("errors.invalidLocationRange", "Invalid location range."),
    ("errors.loadDataError", "Error loading data"),
    ("errors.requestTimeout", "The request timed out. The backend server is taking too long to respond."),
    ("errors.clientTimeout", "The request did not complete within {secs} seconds."),
    ("errors.backendError", "The backend server reported an error. Please try again shortly."),
    ("errors.notFound", "The requested resource was not found."),
    ("errors.serverError", "Server error ({status})"),
    ("errors.statusFallback", "Server returned status {status}"),
    ("proxy.timeout", "The backend server is taking too long to respond. Please try again shortly."),
    ("proxy.timeoutDetail", "The request did not complete within {secs} seconds."),
    ("proxy.network", "Cannot reach the backend server. Check that it is running."),
    ("proxy.readError", "Could not read the backend server response."),
    ("proxy.gatewayTimeout", "The backend server took too long to respond. Please try again shortly."),
    ("proxy.gatewayTimeoutDetail", "The backend server may have hit its own timeout limit."),
    ("proxy.backendError", "The backend server reported an error."),
    ("proxy.unexpected", "The proxy request failed unexpectedly."),
];

static DICTIONARIES: Lazy<HashMap<Locale, HashMap<&'static str, &'static str>>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(Locale::Ko, KO.iter().copied().collect());
    map.insert(Locale::En, EN.iter().copied().collect());
    map
});

/// Look up a message, falling back to the default locale and then the key
#[must_use]
pub fn t(locale: Locale, key: &'static str) -> &'static str {
    DICTIONARIES
        .get(&locale)
        .and_then(|d| d.get(key))
        .or_else(|| DICTIONARIES.get(&Locale::default()).and_then(|d| d.get(key)))
        .copied()
        .unwrap_or(key)
}

/// Look up a message and substitute `{name}` placeholders
#[must_use]
pub fn tf(locale: Locale, key: &'static str, args: &[(&str, &str)]) -> String {
    args.iter()
        .fold(t(locale, key).to_string(), |msg, (name, value)| {
            msg.replace(&format!("{{{name}}}"), value)
        })
}
