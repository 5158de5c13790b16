//! Page composition for the shopping list document.
//!
//! Everything here works in PDF points with the origin at the bottom-left
//! corner of the page. The output is a plain description of what to paint;
//! turning it into bytes is the job of [`crate::adapters::pdf`].

use crate::core::{FontMetrics, IngredientLine};

/// US letter in points.
pub const LETTER: (f32, f32) = (612.0, 792.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl From<(f32, f32, f32)> for Rgb {
    fn from((r, g, b): (f32, f32, f32)) -> Self {
        Self::new(r, g, b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    pub page_width: f32,
    pub page_height: f32,
    pub background: Rgb,

    pub header_prefix: String,
    pub header_font_size: f32,
    pub header_color: Rgb,
    pub header_origin: (f32, f32),

    pub body_font_size: f32,
    pub min_body_font_size: f32,
    pub body_origin: (f32, f32),
    pub line_height: f32,
    pub max_line_width: f32,

    pub footer_font_size: f32,
    pub footer_lines: Vec<String>,
    pub footer_origin: (f32, f32),
    pub footer_line_spacing: f32,

    pub rule_width: f32,
    pub rule_span: (f32, f32),
    pub header_rule_y: f32,
    pub footer_rule_y: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            page_width: LETTER.0,
            page_height: LETTER.1,
            background: Rgb::new(209.0 / 255.0, 230.0 / 255.0, 250.0 / 255.0),

            header_prefix: "Shopping list for".to_string(),
            header_font_size: 30.0,
            header_color: Rgb::new(0.0, 127.0 / 255.0, 1.0),
            header_origin: (40.0, 760.0),

            body_font_size: 14.0,
            min_body_font_size: 4.0,
            body_origin: (20.0, 720.0),
            line_height: 20.0,
            max_line_width: 400.0,

            footer_font_size: 10.0,
            footer_lines: vec!["Project: Foodgram".to_string(), "Version: v1.0".to_string()],
            footer_origin: (40.0, 40.0),
            footer_line_spacing: 20.0,

            rule_width: 3.0,
            rule_span: (-10.0, 720.0),
            header_rule_y: 750.0,
            footer_rule_y: 55.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Body,
    Footer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub section: Section,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    pub background: Rgb,
    pub texts: Vec<TextRun>,
    pub rules: Vec<Rule>,
}

impl PageLayout {
    pub fn section(&self, section: Section) -> impl Iterator<Item = &TextRun> {
        self.texts.iter().filter(move |run| run.section == section)
    }

    pub fn body_lines(&self) -> Vec<&str> {
        self.section(Section::Body).map(|run| run.text.as_str()).collect()
    }
}

pub fn format_line(index: usize, line: &IngredientLine) -> String {
    format!("{}. {} - {} {}", index, line.name, line.amount, line.unit)
}

/// Lays out the single page: background, header, body, footer and the two rules.
pub fn compose(
    settings: &LayoutSettings,
    metrics: &dyn FontMetrics,
    display_name: &str,
    lines: &[IngredientLine],
) -> PageLayout {
    let mut texts = Vec::with_capacity(lines.len() + 1 + settings.footer_lines.len());

    texts.push(TextRun {
        section: Section::Header,
        text: format!("{} {}", settings.header_prefix, display_name),
        x: settings.header_origin.0,
        y: settings.header_origin.1,
        font_size: settings.header_font_size,
        color: settings.header_color,
    });

    texts.extend(compose_body(settings, metrics, lines));

    let (footer_x, footer_y) = settings.footer_origin;
    for (offset, text) in settings.footer_lines.iter().enumerate() {
        texts.push(TextRun {
            section: Section::Footer,
            text: text.clone(),
            x: footer_x,
            y: footer_y - offset as f32 * settings.footer_line_spacing,
            font_size: settings.footer_font_size,
            color: Rgb::BLACK,
        });
    }

    let rule = |y| Rule {
        x1: settings.rule_span.0,
        x2: settings.rule_span.1,
        y,
        width: settings.rule_width,
    };

    PageLayout {
        width: settings.page_width,
        height: settings.page_height,
        background: settings.background,
        texts,
        rules: vec![rule(settings.header_rule_y), rule(settings.footer_rule_y)],
    }
}

fn compose_body(
    settings: &LayoutSettings,
    metrics: &dyn FontMetrics,
    lines: &[IngredientLine],
) -> Vec<TextRun> {
    let (x, mut y) = settings.body_origin;
    // Once shrunk, the size stays shrunk for the remaining lines.
    let mut font_size = settings.body_font_size;
    let mut runs = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        let text = format_line(i + 1, line);

        while metrics.string_width(&text, font_size) > settings.max_line_width {
            let next = font_size - 1.0;
            if next < settings.min_body_font_size {
                tracing::debug!(
                    "Line {} still overflows at {}pt, drawing it as is",
                    i + 1,
                    font_size
                );
                break;
            }
            font_size = next;
        }

        runs.push(TextRun {
            section: Section::Body,
            text,
            x,
            y,
            font_size,
            color: Rgb::BLACK,
        });
        y -= settings.line_height;
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every glyph is 0.6 em wide, like Courier.
    struct Monospace;

    impl FontMetrics for Monospace {
        fn string_width(&self, text: &str, font_size: f32) -> f32 {
            text.chars().count() as f32 * 0.6 * font_size
        }
    }

    fn long_name(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn test_single_line_text() {
        let settings = LayoutSettings::default();
        let lines = vec![IngredientLine::new("Flour", "g", 200)];

        let layout = compose(&settings, &Monospace, "Alice", &lines);

        assert_eq!(layout.body_lines(), vec!["1. Flour - 200 g"]);
        let header: Vec<_> = layout.section(Section::Header).collect();
        assert_eq!(header.len(), 1);
        assert!(header[0].text.contains("Alice"));
        assert_eq!(header[0].font_size, 30.0);
    }

    #[test]
    fn test_empty_list_has_header_and_footer_only() {
        let settings = LayoutSettings::default();

        let layout = compose(&settings, &Monospace, "Alice", &[]);

        assert!(layout.body_lines().is_empty());
        assert_eq!(layout.section(Section::Header).count(), 1);
        let footer: Vec<&str> = layout
            .section(Section::Footer)
            .map(|run| run.text.as_str())
            .collect();
        assert_eq!(footer, vec!["Project: Foodgram", "Version: v1.0"]);
        assert_eq!(layout.rules.len(), 2);
        assert_eq!((layout.width, layout.height), LETTER);
    }

    #[test]
    fn test_cursor_moves_down_by_line_height() {
        let settings = LayoutSettings::default();
        let lines = vec![
            IngredientLine::new("Eggs", "pcs", 3),
            IngredientLine::new("Flour", "g", 200),
            IngredientLine::new("Sugar", "g", 50),
        ];

        let layout = compose(&settings, &Monospace, "Alice", &lines);

        let ys: Vec<f32> = layout.section(Section::Body).map(|run| run.y).collect();
        assert_eq!(ys, vec![720.0, 700.0, 680.0]);
        assert!(layout.section(Section::Body).all(|run| run.x == 20.0));
        assert_eq!(
            layout.body_lines(),
            vec!["1. Eggs - 3 pcs", "2. Flour - 200 g", "3. Sugar - 50 g"]
        );
    }

    #[test]
    fn test_long_line_shrinks_font_for_rest_of_body() {
        let settings = LayoutSettings::default();
        // "1. " + 52 chars + " - 1 g" = 61 chars -> 61 * 0.6 * 14 = 512.4 > 400
        let lines = vec![
            IngredientLine::new("Salt", "g", 5),
            IngredientLine::new(long_name(52), "g", 1),
            IngredientLine::new("Sugar", "g", 50),
        ];

        let layout = compose(&settings, &Monospace, "Alice", &lines);

        let sizes: Vec<f32> = layout
            .section(Section::Body)
            .map(|run| run.font_size)
            .collect();
        assert_eq!(sizes[0], 14.0);
        // 61 * 0.6 * 10 = 366 fits, 61 * 0.6 * 11 = 402.6 does not
        assert_eq!(sizes[1], 10.0);
        assert_eq!(sizes[2], 10.0);
        assert!(sizes[1] < settings.body_font_size);
    }

    #[test]
    fn test_shrink_stops_at_minimum_size() {
        let settings = LayoutSettings::default();
        let lines = vec![IngredientLine::new(long_name(500), "g", 1)];

        let layout = compose(&settings, &Monospace, "Alice", &lines);

        let run = layout.section(Section::Body).next().unwrap();
        assert_eq!(run.font_size, settings.min_body_font_size);
        assert!(Monospace.string_width(&run.text, run.font_size) > settings.max_line_width);
    }

    #[test]
    fn test_rules_span_page() {
        let settings = LayoutSettings::default();

        let layout = compose(&settings, &Monospace, "Alice", &[]);

        assert_eq!(layout.rules[0].y, 750.0);
        assert_eq!(layout.rules[1].y, 55.0);
        assert!(layout.rules.iter().all(|rule| rule.x1 <= 0.0 && rule.x2 >= layout.width));
        assert!(layout.rules.iter().all(|rule| rule.width == 3.0));
    }
}
