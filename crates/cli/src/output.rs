//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;

const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a banner framed by heavy rules
    pub fn banner(message: &str) {
        println!();
        println!("{}", RULE.blue());
        println!("  {}", message.blue().bold());
        println!("{}", RULE.blue());
        println!();
    }

    /// Print an aligned `label: value` row
    pub fn field(label: &str, value: &str) {
        println!("  {:<18} {}", format!("{label}:").dimmed(), value);
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{mins}m {remaining_secs:.0}s")
    }
}

/// Angle with one decimal and a degree sign
pub fn format_degrees(value: f64) -> String {
    format!("{value:.1}°")
}

/// Irradiance in W/m², no decimals
pub fn format_irradiance(value: f64) -> String {
    format!("{value:.0} W/m²")
}

/// Length in meters; non-finite lengths read as infinite
pub fn format_meters(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1} m")
    } else {
        "∞".to_string()
    }
}

/// Fractional hours as `Hh Mm`
pub fn format_hours(hours: f64) -> String {
    let total = (hours * 60.0).round().max(0.0) as u64;
    format!("{}h {:02}m", total / 60, total % 60)
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration(Duration::from_secs_f32(5.5)), "5.5s");
    }

    #[test]
    fn test_format_duration_mins() {
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn test_format_solar_quantities() {
        assert_eq!(format_degrees(76.04), "76.0°");
        assert_eq!(format_irradiance(912.6), "913 W/m²");
        assert_eq!(format_meters(3.14159), "3.1 m");
        assert_eq!(format_meters(f64::INFINITY), "∞");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(14.5), "14h 30m");
        assert_eq!(format_hours(9.99), "9h 59m");
        assert_eq!(format_hours(0.0), "0h 00m");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "point", "points"), "1 point");
        assert_eq!(format_count(5, "point", "points"), "5 points");
    }
}
