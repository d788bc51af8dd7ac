//! Flows a rendered `Document` onto fixed-size pages.
//!
//! The document is first flattened into groups of flow items (headings,
//! wrapped paragraphs, rules, meters). Groups marked `keep_together` move to a
//! fresh page instead of splitting, unless they are taller than a whole page.
//! Coordinates are millimetres measured from the top-left page corner.

use crate::error::ExportError;
use crate::pipeline::metrics::Tone;
use crate::pipeline::render::{Document, display_date};

pub const PT_TO_MM: f32 = 25.4 / 72.0;

const MARKER_INDENT_MM: f32 = 8.0;
const RULE_HEIGHT_MM: f32 = 3.0;
const METER_HEIGHT_MM: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageGeometry {
    /// US Letter, portrait, one-inch margins.
    pub const LETTER_PORTRAIT: PageGeometry = PageGeometry {
        width_mm: 215.9,
        height_mm: 279.4,
        margin_mm: 25.4,
    };

    pub fn content_width(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn content_height(&self) -> f32 {
        self.height_mm - 2.0 * self.margin_mm
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Subtitle,
    Heading,
    Strong,
    Body,
    Caption,
    Badge,
    Figure,
}

impl TextStyle {
    pub fn size_pt(self) -> f32 {
        match self {
            TextStyle::Title => 20.0,
            TextStyle::Subtitle => 14.0,
            TextStyle::Heading => 13.0,
            TextStyle::Strong => 10.5,
            TextStyle::Body => 10.0,
            TextStyle::Caption => 9.0,
            TextStyle::Badge => 9.0,
            TextStyle::Figure => 18.0,
        }
    }

    pub fn bold(self) -> bool {
        matches!(
            self,
            TextStyle::Title
                | TextStyle::Heading
                | TextStyle::Strong
                | TextStyle::Badge
                | TextStyle::Figure
        )
    }

    fn line_height_mm(self) -> f32 {
        self.size_pt() * 1.4 * PT_TO_MM
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Text,
    Muted,
    Primary,
    Success,
    Warning,
    Destructive,
}

impl From<Tone> for Ink {
    fn from(tone: Tone) -> Self {
        match tone {
            Tone::Success => Ink::Success,
            Tone::Warning => Ink::Warning,
            Tone::Destructive => Ink::Destructive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Text {
        text: String,
        style: TextStyle,
        ink: Ink,
        align: Align,
        /// Printed in the left gutter of the first line, e.g. "1."
        marker: Option<String>,
    },
    Gap(f32),
    Rule,
    Meter(f32),
}

impl Flow {
    fn text(text: impl Into<String>, style: TextStyle, ink: Ink) -> Self {
        Flow::Text {
            text: text.into(),
            style,
            ink,
            align: Align::Left,
            marker: None,
        }
    }

    fn centered(text: impl Into<String>, style: TextStyle, ink: Ink) -> Self {
        Flow::Text {
            text: text.into(),
            style,
            ink,
            align: Align::Center,
            marker: None,
        }
    }

    fn numbered(number: usize, text: impl Into<String>) -> Self {
        Flow::Text {
            text: text.into(),
            style: TextStyle::Body,
            ink: Ink::Text,
            align: Align::Left,
            marker: Some(format!("{number}.")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub items: Vec<Flow>,
    pub keep_together: bool,
}

impl Group {
    fn kept(items: Vec<Flow>) -> Self {
        Self {
            items,
            keep_together: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        text: String,
        style: TextStyle,
        ink: Ink,
        x_mm: f32,
        baseline_mm: f32,
    },
    Rule {
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
    },
    Meter {
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        fraction: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub marks: Vec<Mark>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagedDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl PagedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text on all pages, in placement order.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|page| {
            page.marks.iter().filter_map(|mark| match mark {
                Mark::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
        })
    }
}

/// Breaks the document into flow groups in reading order.
pub fn flatten(document: &Document) -> Vec<Group> {
    let mut groups = Vec::new();
    let title = &document.title;

    groups.push(Group::kept(vec![
        Flow::centered(&title.heading, TextStyle::Title, Ink::Text),
        Flow::Gap(1.5),
        Flow::centered(&title.organization_name, TextStyle::Subtitle, Ink::Text),
        Flow::Gap(1.0),
        Flow::centered(
            format!(
                "{} organizations near {} - Generated on {}",
                title.focus_area,
                title.zip_code,
                display_date(title.generated_on)
            ),
            TextStyle::Caption,
            Ink::Muted,
        ),
        Flow::Gap(2.0),
        Flow::Rule,
        Flow::Gap(4.0),
    ]));

    groups.push(Group::kept(vec![
        Flow::text(&document.insight.heading, TextStyle::Heading, Ink::Primary),
        Flow::Gap(1.0),
        Flow::text(&document.insight.body, TextStyle::Body, Ink::Text),
        Flow::Gap(5.0),
    ]));

    let density = &document.panels.density;
    groups.push(Group::kept(vec![
        Flow::text(&density.heading, TextStyle::Heading, Ink::Text),
        Flow::text(
            format!("{}: {}", density.count_label, density.count),
            TextStyle::Body,
            Ink::Text,
        ),
        Flow::Gap(1.0),
        Flow::Meter(f32::from(density.saturation_percent.min(100)) / 100.0),
        Flow::text(&density.caption, TextStyle::Caption, Ink::Muted),
        Flow::Gap(4.0),
    ]));

    let funding = &document.panels.funding;
    groups.push(Group::kept(vec![
        Flow::text(&funding.heading, TextStyle::Heading, Ink::Text),
        Flow::text(&funding.badge, TextStyle::Badge, Ink::from(funding.tone)),
        Flow::text(&funding.caption, TextStyle::Caption, Ink::Muted),
        Flow::Gap(4.0),
    ]));

    let reach = &document.panels.reach;
    groups.push(Group::kept(vec![
        Flow::text(&reach.heading, TextStyle::Heading, Ink::Text),
        Flow::text(&reach.value, TextStyle::Figure, Ink::Primary),
        Flow::text(&reach.caption, TextStyle::Caption, Ink::Muted),
        Flow::Gap(5.0),
    ]));

    let section = &document.comparators;
    groups.push(Group::kept(vec![
        Flow::text(&section.heading, TextStyle::Heading, Ink::Text),
        Flow::text(&section.description, TextStyle::Caption, Ink::Muted),
        Flow::Gap(3.0),
    ]));
    for card in &section.cards {
        groups.push(Group::kept(vec![
            Flow::text(&card.name, TextStyle::Strong, Ink::Text),
            Flow::text(
                format!("{} | {}", card.distance_badge, card.similarity),
                TextStyle::Badge,
                Ink::Primary,
            ),
            Flow::text(&card.mission, TextStyle::Caption, Ink::Muted),
            Flow::text(format!("Budget: {}", card.budget), TextStyle::Body, Ink::Text),
            Flow::text(format!("Serves: {}", card.serves), TextStyle::Body, Ink::Text),
            Flow::Gap(1.5),
            Flow::Rule,
            Flow::Gap(1.5),
        ]));
    }

    let opportunities = &document.opportunities;
    groups.push(Group::kept(vec![
        Flow::Gap(3.0),
        Flow::text(&opportunities.heading, TextStyle::Heading, Ink::Text),
        Flow::text(&opportunities.description, TextStyle::Caption, Ink::Muted),
        Flow::Gap(3.0),
    ]));
    for item in &opportunities.items {
        groups.push(Group::kept(vec![
            Flow::numbered(item.number, &item.text),
            Flow::Gap(2.0),
        ]));
    }

    groups
}

/// Approximate Helvetica advance widths, in em.
fn glyph_width_em(c: char) -> f32 {
    match c {
        '\'' => 0.191,
        'i' | 'j' | 'l' => 0.222,
        ' ' | '.' | ',' | ':' | ';' | '!' | 'I' | 'f' | 't' | '/' => 0.278,
        '|' => 0.26,
        'r' | '-' | '(' | ')' => 0.333,
        'm' | 'M' => 0.833,
        'w' => 0.722,
        'W' => 0.944,
        '%' => 0.889,
        '@' => 1.015,
        'A'..='Z' => 0.667,
        _ => 0.556,
    }
}

pub fn text_width_mm(text: &str, style: TextStyle) -> f32 {
    let em: f32 = text.chars().map(glyph_width_em).sum();
    let weight = if style.bold() { 1.05 } else { 1.0 };
    em * weight * style.size_pt() * PT_TO_MM
}

/// Greedy word wrap. Words wider than the line are split between characters.
pub fn wrap(text: &str, style: TextStyle, max_width_mm: f32) -> Result<Vec<String>, ExportError> {
    if text_width_mm("@", style) > max_width_mm {
        return Err(ExportError::Layout(format!(
            "line width {max_width_mm:.1}mm cannot hold a single character"
        )));
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width_mm(&candidate, style) <= max_width_mm {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width_mm(word, style) <= max_width_mm {
            current = word.to_string();
            continue;
        }
        for c in word.chars() {
            current.push(c);
            if text_width_mm(&current, style) > max_width_mm {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

enum RowKind {
    Blank,
    Text(Vec<(f32, String)>, TextStyle, Ink),
    Rule,
    Meter(f32),
}

struct Row {
    height_mm: f32,
    kind: RowKind,
}

fn rows_for(flow: &Flow, geometry: &PageGeometry) -> Result<Vec<Row>, ExportError> {
    let width = geometry.content_width();
    let rows = match flow {
        Flow::Gap(height) => vec![Row {
            height_mm: *height,
            kind: RowKind::Blank,
        }],
        Flow::Rule => vec![Row {
            height_mm: RULE_HEIGHT_MM,
            kind: RowKind::Rule,
        }],
        Flow::Meter(fraction) => vec![Row {
            height_mm: METER_HEIGHT_MM,
            kind: RowKind::Meter(fraction.clamp(0.0, 1.0)),
        }],
        Flow::Text {
            text,
            style,
            ink,
            align,
            marker,
        } => {
            let indent = if marker.is_some() { MARKER_INDENT_MM } else { 0.0 };
            let lines = wrap(text, *style, width - indent)?;
            lines
                .into_iter()
                .enumerate()
                .map(|(index, line)| {
                    let x = match align {
                        Align::Left => indent,
                        Align::Center => ((width - text_width_mm(&line, *style)) / 2.0).max(0.0),
                    };
                    let mut spans = Vec::with_capacity(2);
                    if index == 0
                        && let Some(marker) = marker
                    {
                        spans.push((0.0, marker.clone()));
                    }
                    spans.push((x, line));
                    Row {
                        height_mm: style.line_height_mm(),
                        kind: RowKind::Text(spans, *style, *ink),
                    }
                })
                .collect()
        }
    };
    Ok(rows)
}

struct Cursor<'a> {
    geometry: &'a PageGeometry,
    finished: Vec<Page>,
    current: Page,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            finished: Vec::new(),
            current: Page {
                number: 1,
                marks: Vec::new(),
            },
            y: 0.0,
        }
    }

    fn remaining(&self) -> f32 {
        self.geometry.content_height() - self.y
    }

    fn at_page_top(&self) -> bool {
        self.y == 0.0
    }

    fn break_page(&mut self) {
        let next = Page {
            number: self.current.number + 1,
            marks: Vec::new(),
        };
        self.finished.push(std::mem::replace(&mut self.current, next));
        self.y = 0.0;
    }

    fn place(&mut self, row: Row) {
        if matches!(row.kind, RowKind::Blank) {
            if !self.at_page_top() {
                self.y = (self.y + row.height_mm).min(self.geometry.content_height());
            }
            return;
        }
        if row.height_mm > self.remaining() && !self.at_page_top() {
            self.break_page();
        }

        let left = self.geometry.margin_mm;
        let top = self.geometry.margin_mm + self.y;
        let width = self.geometry.content_width();
        let marks = &mut self.current.marks;

        match row.kind {
            RowKind::Text(spans, style, ink) => {
                let baseline = top + row.height_mm * 0.75;
                marks.extend(spans.into_iter().map(|(x, text)| Mark::Text {
                    text,
                    style,
                    ink,
                    x_mm: left + x,
                    baseline_mm: baseline,
                }));
            }
            RowKind::Rule => marks.push(Mark::Rule {
                x_mm: left,
                y_mm: top + row.height_mm / 2.0,
                width_mm: width,
            }),
            RowKind::Meter(fraction) => marks.push(Mark::Meter {
                x_mm: left,
                y_mm: top + row.height_mm / 2.0,
                width_mm: width,
                fraction,
            }),
            RowKind::Blank => {}
        }
        self.y += row.height_mm;
    }

    fn into_pages(mut self) -> Vec<Page> {
        self.finished.push(self.current);
        self.finished
    }
}

#[tracing::instrument(
    name = "export_stage layout",
    skip_all,
    fields(export.stage = "layout", export.groups = groups.len(), export.pages)
)]
pub fn paginate(groups: &[Group], geometry: PageGeometry) -> Result<PagedDocument, ExportError> {
    if geometry.content_width() <= 0.0 || geometry.content_height() <= 0.0 {
        return Err(ExportError::Layout(format!(
            "margins of {}mm leave no content area on a {}x{}mm page",
            geometry.margin_mm, geometry.width_mm, geometry.height_mm
        )));
    }

    let mut cursor = Cursor::new(&geometry);
    for group in groups {
        let mut rows = Vec::new();
        for item in &group.items {
            rows.extend(rows_for(item, &geometry)?);
        }

        let height: f32 = rows.iter().map(|row| row.height_mm).sum();
        if group.keep_together
            && height > cursor.remaining()
            && height <= geometry.content_height()
            && !cursor.at_page_top()
        {
            cursor.break_page();
        }
        for row in rows {
            cursor.place(row);
        }
    }

    let pages = cursor.into_pages();
    tracing::Span::current().record("export.pages", pages.len());
    Ok(PagedDocument { geometry, pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::form::tests::filled_form;
    use crate::landscape::static_data::{advice_for, comparator_set};
    use crate::pipeline::metrics::compute_metrics;
    use crate::pipeline::render::render;
    use chrono::NaiveDate;

    fn static_document() -> Document {
        let profile = filled_form().submit().unwrap();
        let comparators = comparator_set();
        let metrics = compute_metrics(&comparators, advice_for(profile.focus_area()));
        render(
            &profile,
            &comparators,
            &metrics,
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        )
    }

    fn text_marks(page: &Page) -> Vec<(&str, f32, f32)> {
        page.marks
            .iter()
            .filter_map(|mark| match mark {
                Mark::Text {
                    text,
                    x_mm,
                    baseline_mm,
                    ..
                } => Some((text.as_str(), *x_mm, *baseline_mm)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "Focus on measurable outcomes and data-driven impact reporting to stand out to funders who value accountability.";
        let lines = wrap(text, TextStyle::Body, 60.0).unwrap();
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, TextStyle::Body) <= 60.0, "{line:?} too wide");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let word = "a".repeat(200);
        let lines = wrap(&word, TextStyle::Body, 30.0).unwrap();
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_empty_text_has_no_lines() {
        assert!(wrap("   ", TextStyle::Body, 50.0).unwrap().is_empty());
    }

    #[test]
    fn test_wrap_rejects_too_narrow_line() {
        let err = wrap("text", TextStyle::Title, 1.0).unwrap_err();
        assert!(matches!(err, ExportError::Layout(_)));
    }

    #[test]
    fn test_static_report_layout() {
        let groups = flatten(&static_document());
        let paged = paginate(&groups, PageGeometry::LETTER_PORTRAIT).unwrap();

        assert!(paged.page_count() >= 1);
        let numbers: Vec<usize> = paged.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, (1..=paged.page_count()).collect::<Vec<_>>());

        let text: Vec<&str> = paged.text_lines().collect();
        assert_eq!(text[0], "Competitive Analysis Report");
        assert!(text.contains(&"Hope & Healing, Inc."));
        assert!(text.contains(&"Family First Foundation"));
        assert!(text.contains(&"5."));
        assert!(text.contains(&"High Competition"));
    }

    #[test]
    fn test_marks_stay_inside_content_area() {
        let geometry = PageGeometry::LETTER_PORTRAIT;
        let paged = paginate(&flatten(&static_document()), geometry).unwrap();
        let bottom = geometry.height_mm - geometry.margin_mm;

        for page in &paged.pages {
            for (text, x, baseline) in text_marks(page) {
                assert!(x >= geometry.margin_mm, "{text:?} starts in the margin");
                assert!(baseline <= bottom, "{text:?} runs past the bottom margin");
            }
        }
    }

    #[test]
    fn test_small_page_breaks_without_splitting_cards() {
        let geometry = PageGeometry {
            width_mm: 150.0,
            height_mm: 120.0,
            margin_mm: 15.0,
        };
        let paged = paginate(&flatten(&static_document()), geometry).unwrap();
        assert!(paged.page_count() > 2);

        // A card's name and its "Serves" line land on the same page.
        for page in &paged.pages {
            let lines: Vec<&str> = text_marks(page).into_iter().map(|(t, _, _)| t).collect();
            let names = lines
                .iter()
                .filter(|l| ["Community Health Alliance", "Family First Foundation"].contains(l))
                .count();
            let serves_lines = lines.iter().filter(|l| l.starts_with("Serves:")).count();
            if names > 0 {
                assert!(serves_lines >= names);
            }
        }
    }

    #[test]
    fn test_numbered_items_hang_text_after_marker() {
        let paged = paginate(&flatten(&static_document()), PageGeometry::LETTER_PORTRAIT).unwrap();
        let all: Vec<(&str, f32, f32)> = paged.pages.iter().flat_map(text_marks).collect();
        let marker = all.iter().position(|(t, _, _)| *t == "1.").unwrap();
        let (_, marker_x, marker_baseline) = all[marker];
        let (_, text_x, text_baseline) = all[marker + 1];
        assert_eq!(marker_baseline, text_baseline);
        assert!((text_x - marker_x - MARKER_INDENT_MM).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_page_without_content_area() {
        let geometry = PageGeometry {
            width_mm: 40.0,
            height_mm: 40.0,
            margin_mm: 25.4,
        };
        let err = paginate(&flatten(&static_document()), geometry).unwrap_err();
        assert!(matches!(err, ExportError::Layout(_)));
    }
}
