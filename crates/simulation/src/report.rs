//! Printable A4 report of a calculation
//!
//! Layout and rendering are separate steps: [`layout`] places every line on
//! a page, [`to_pdf`] draws the pages with `printpdf`. The report uses the
//! PDF base-14 Helvetica font, so its text is kept to ASCII and English.

use crate::interpolate::parse_timestamp;
use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rgb};
use sunpath_core::model::SolarCalculationResponse;
use sunpath_core::{Error, Result};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
/// Lines below this offset from the top move to the next page
const PAGE_BOTTOM: f32 = 270.0;
/// Rows of the series table; the rest is summarized in one line
pub const TABLE_ROWS: usize = 20;

/// How a line is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Title,
    Muted,
    Heading,
    Body,
    Table,
    Footer,
}

impl Style {
    fn size(self) -> f32 {
        match self {
            Self::Title => 18.0,
            Self::Heading => 14.0,
            Self::Body | Self::Muted => 10.0,
            Self::Table | Self::Footer => 8.0,
        }
    }

    fn color(self) -> Color {
        let gray = Color::Rgb(Rgb::new(0.5, 0.5, 0.5, None));
        match self {
            Self::Title => Color::Rgb(Rgb::new(0.2, 0.4, 0.8, None)),
            Self::Muted | Self::Footer => gray,
            _ => Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
        }
    }
}

/// One positioned line; `y` is millimetres from the top of the page
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub style: Style,
    pub x: f32,
    pub y: f32,
}

/// Lines of one page
pub type Page = Vec<Line>;

struct Cursor {
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: 20.0,
        }
    }

    fn push(&mut self, text: impl Into<String>, style: Style, x: f32, advance: f32) {
        if self.y > PAGE_BOTTOM {
            self.pages.push(Vec::new());
            self.y = MARGIN;
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(Line {
                text: text.into(),
                style,
                x,
                y: self.y,
            });
        }
        self.y += advance;
    }

    fn skip(&mut self, mm: f32) {
        self.y += mm;
    }
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

/// Place the title, summary, series table and page footers.
///
/// `generated` is printed under the title as the report time.
#[must_use]
pub fn layout(data: &SolarCalculationResponse, generated: &str) -> Vec<Page> {
    let s = &data.summary;
    let mut cursor = Cursor::new();

    cursor.push("SunPath & Shadow Simulator Report", Style::Title, MARGIN, 10.0);
    cursor.push(format!("Generated: {generated}"), Style::Muted, MARGIN, 15.0);

    cursor.push("Summary", Style::Heading, MARGIN, 8.0);
    let summary = [
        format!("Sunrise: {}", s.sunrise),
        format!("Sunset: {}", s.sunset),
        format!("Solar Noon: {}", s.solar_noon),
        format!("Day Length: {:.2} hours", s.day_length),
        format!("Max Altitude: {:.1} deg", s.max_altitude),
        format!(
            "Total Irradiance: {} kWh/m2",
            or_na(s.total_irradiance.map(|v| format!("{v:.2}")))
        ),
        format!("Data Points: {}", data.series.len()),
    ];
    for line in summary {
        cursor.push(format!("- {line}"), Style::Body, MARGIN + 5.0, 6.0);
    }
    cursor.skip(10.0);

    cursor.push("Detailed Data", Style::Heading, MARGIN, 8.0);
    cursor.push("Time  | Altitude | Azimuth | GHI", Style::Table, MARGIN, 5.0);
    for point in data.series.iter().take(TABLE_ROWS) {
        let time = or_na(parse_timestamp(&point.timestamp).map(|t| t.format("%H:%M").to_string()));
        let ghi = or_na(point.irradiance.map(|i| format!("{:.0} W/m2", i.ghi)));
        cursor.push(
            format!(
                "{time} | {:.1} deg | {:.1} deg | {ghi}",
                point.sun.altitude, point.sun.azimuth
            ),
            Style::Table,
            MARGIN,
            5.0,
        );
    }
    if data.series.len() > TABLE_ROWS {
        cursor.skip(5.0);
        cursor.push(
            format!("... and {} more data points", data.series.len() - TABLE_ROWS),
            Style::Table,
            MARGIN,
            5.0,
        );
    }

    let mut pages = cursor.pages;
    let count = pages.len();
    for (i, page) in pages.iter_mut().enumerate() {
        page.push(Line {
            text: format!("Page {} of {count}", i + 1),
            style: Style::Footer,
            x: PAGE_WIDTH / 2.0 - 8.0,
            y: PAGE_HEIGHT - 10.0,
        });
    }
    pages
}

/// Render the report as PDF bytes
pub fn to_pdf(data: &SolarCalculationResponse, generated: &str) -> Result<Vec<u8>> {
    let pdf_error = |e: printpdf::Error| Error::export(format!("Failed to build PDF report: {e}"));

    let pages = layout(data, generated);
    let (doc, first_page, first_layer) =
        PdfDocument::new("SunPath report", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

    for (i, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for line in page {
            let font = match line.style {
                Style::Title | Style::Heading => &bold,
                _ => &regular,
            };
            layer.set_fill_color(line.style.color());
            layer.use_text(
                line.text.as_str(),
                line.style.size(),
                Mm(line.x),
                Mm(PAGE_HEIGHT - line.y),
                font,
            );
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> SolarCalculationResponse {
        serde_json::from_str(include_str!("../tests/fixtures/seoul_2025-06-21.json")).unwrap()
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_layout_summary_and_table() {
        let data = fixture();
        let pages = layout(&data, "2025-06-21 09:00");
        let first = texts(&pages[0]);

        assert_eq!(first[0], "SunPath & Shadow Simulator Report");
        assert_eq!(first[1], "Generated: 2025-06-21 09:00");
        assert!(first.contains(&"- Day Length: 14.75 hours"));
        assert!(first.contains(&"- Max Altitude: 74.7 deg"));
        assert!(first.contains(&format!("- Data Points: {}", data.series.len()).as_str()));

        let rows = pages
            .iter()
            .flatten()
            .filter(|l| l.style == Style::Table && l.text.contains(" deg | "))
            .count();
        assert_eq!(rows, TABLE_ROWS.min(data.series.len()));
    }

    #[test]
    fn test_long_series_is_summarized() {
        let mut data = fixture();
        let sample = data.series[12].clone();
        data.series = vec![sample; 60];

        let pages = layout(&data, "now");
        let all: Vec<&str> = pages.iter().flat_map(texts).collect();
        assert!(all.contains(&"... and 40 more data points"));

        for page in &pages {
            assert!(page.iter().filter(|l| l.style != Style::Footer).all(|l| l.y <= PAGE_BOTTOM));
        }
        let footer = pages[0].last().unwrap();
        assert_eq!(footer.text, format!("Page 1 of {}", pages.len()));
    }

    #[test]
    fn test_text_stays_ascii() {
        let pages = layout(&fixture(), "2025-06-21 09:00");
        assert!(pages.iter().flatten().all(|l| l.text.is_ascii()));
    }

    #[test]
    fn test_pdf_bytes() {
        let bytes = to_pdf(&fixture(), "2025-06-21 09:00").unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(16)..]).into_owned();
        assert!(tail.contains("%%EOF"));
    }
}
