//! Plain-text rendering of the session screens for the terminal front end.

use crate::domain::OrganizationProfile;
use crate::pipeline::render::Document;

const RULE: &str =
    "------------------------------------------------------------------------";
const METER_CELLS: usize = 40;

/// Headline figures shown on the landing screen: (figure, caption).
pub const HEADLINE_FIGURES: [(&str, &str); 3] = [
    ("500K+", "Nonprofits in US"),
    ("$471B", "Annual giving"),
    ("3%", "Growth rate"),
];

pub fn landing_banner() -> String {
    let figures = HEADLINE_FIGURES
        .iter()
        .map(|(figure, caption)| format!("{figure} {caption}"))
        .collect::<Vec<_>>()
        .join("   |   ");

    [
        RULE.to_string(),
        "Nonprofit Competitive Analysis".to_string(),
        String::new(),
        "Understand your local nonprofit landscape. Discover who you're competing with \
         for funding and find opportunities to differentiate your organization."
            .to_string(),
        String::new(),
        figures,
        String::new(),
        "With increasing competition for limited funding, strategic differentiation \
         isn't just helpful - it's essential for sustainability."
            .to_string(),
        RULE.to_string(),
    ]
    .join("\n")
}

pub fn form_intro() -> String {
    [
        "Tell us about your organization",
        "We'll analyze your local nonprofit landscape to help you understand your \
         competitive position and identify opportunities for differentiation.",
    ]
    .join("\n")
}

pub fn reporting_header(profile: &OrganizationProfile) -> String {
    [
        format!("Competitive Analysis for {}", profile.name()),
        format!(
            "Based on {} organizations near {}",
            profile.focus_area(),
            profile.service_zip()
        ),
        "<- Analyze a different organization (type `start-over`)".to_string(),
    ]
    .join("\n")
}

fn meter(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * METER_CELLS / 100;
    format!(
        "[{}{}] {percent}%",
        "#".repeat(filled),
        ".".repeat(METER_CELLS - filled)
    )
}

pub fn report_text(document: &Document) -> String {
    let mut lines = Vec::new();
    let title = &document.title;
    lines.push(title.heading.clone());
    lines.push(title.organization_name.clone());
    lines.push(title.subtitle());
    lines.push(RULE.to_string());

    lines.push(document.insight.heading.clone());
    lines.push(document.insight.body.clone());
    lines.push(String::new());

    let panels = &document.panels;
    lines.push(panels.density.heading.clone());
    lines.push(format!(
        "  {}: {}",
        panels.density.count_label, panels.density.count
    ));
    lines.push(format!("  {}", meter(panels.density.saturation_percent)));
    lines.push(format!("  {}", panels.density.caption));
    lines.push(String::new());

    lines.push(panels.funding.heading.clone());
    lines.push(format!("  [{}]", panels.funding.badge));
    lines.push(format!("  {}", panels.funding.caption));
    lines.push(String::new());

    lines.push(panels.reach.heading.clone());
    lines.push(format!("  {}", panels.reach.value));
    lines.push(format!("  {}", panels.reach.caption));
    lines.push(RULE.to_string());

    let section = &document.comparators;
    lines.push(section.heading.clone());
    lines.push(section.description.clone());
    for card in &section.cards {
        lines.push(String::new());
        lines.push(format!(
            "  {}  ({} | {})",
            card.name, card.distance_badge, card.similarity
        ));
        lines.push(format!("    {}", card.mission));
        lines.push(format!("    Budget: {}", card.budget));
        lines.push(format!("    Serves: {}", card.serves));
    }
    lines.push(RULE.to_string());

    let opportunities = &document.opportunities;
    lines.push(opportunities.heading.clone());
    lines.push(opportunities.description.clone());
    for item in &opportunities.items {
        lines.push(format!("  {}. {}", item.number, item.text));
    }

    lines.join("\n")
}

/// `  1) label` per option, numbered from one.
pub fn numbered_options<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    labels
        .into_iter()
        .enumerate()
        .map(|(index, label)| format!("  {}) {label}", index + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub const HELP: &str = "\
Commands:
  export      save this report as a PDF
  start-over  analyze a different organization
  json        print the report as JSON
  help        show this list
  quit        leave the session";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::form::tests::filled_form;
    use crate::landscape::static_data::{advice_for, comparator_set};
    use crate::pipeline::metrics::compute_metrics;
    use crate::pipeline::render::render;
    use chrono::NaiveDate;

    #[test]
    fn test_landing_banner_figures() {
        let banner = landing_banner();
        assert!(banner.contains("Nonprofit Competitive Analysis"));
        assert!(banner.contains("500K+ Nonprofits in US"));
        assert!(banner.contains("$471B Annual giving"));
        assert!(banner.contains("3% Growth rate"));
    }

    #[test]
    fn test_reporting_header() {
        let profile = filled_form().submit().unwrap();
        let header = reporting_header(&profile);
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines[0], "Competitive Analysis for Hope & Healing, Inc.");
        assert_eq!(lines[1], "Based on Mental Health organizations near 02139");
    }

    #[test]
    fn test_report_text_sections_in_order() {
        let profile = filled_form().submit().unwrap();
        let comparators = comparator_set();
        let metrics = compute_metrics(&comparators, advice_for(profile.focus_area()));
        let document = render(
            &profile,
            &comparators,
            &metrics,
            NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
        );

        let text = report_text(&document);
        let position = |needle: &str| {
            text.find(needle)
                .unwrap_or_else(|| panic!("missing {needle:?}"))
        };

        assert!(position("Competitive Analysis Report") < position("Key Insight"));
        assert!(position("Key Insight") < position("Market Density"));
        assert!(position("Geographic Reach") < position("Similar Organizations"));
        assert!(position("Similar Organizations") < position("Differentiation Opportunities"));
        assert!(text.contains("Mental Health organizations near 02139 • Generated on 3/7/2026"));
        assert!(text.contains("[High Competition]"));
        assert!(text.contains("  4 mi"));
        assert!(text.contains("Community Health Alliance  (2.3 miles | 87% similar)"));
        assert!(text.contains("  5. Explore underserved geographic areas"));
    }

    #[test]
    fn test_meter_fill() {
        assert_eq!(meter(0), format!("[{}] 0%", ".".repeat(40)));
        assert_eq!(meter(50), format!("[{}{}] 50%", "#".repeat(20), ".".repeat(20)));
        assert_eq!(meter(100), format!("[{}] 100%", "#".repeat(40)));
    }

    #[test]
    fn test_numbered_options() {
        assert_eq!(numbered_options(["A", "B"]), "  1) A\n  2) B");
    }
}
