use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{ComparatorEntity, OrganizationProfile};

use super::metrics::{CompetitionLevel, ReportMetrics, Tone};

pub const REPORT_TITLE: &str = "Competitive Analysis Report";

/// Comparators shown in the report; the rest still count toward the metrics.
pub const DISPLAY_CAP: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: TitleBlock,
    pub insight: Insight,
    pub panels: SummaryPanels,
    pub comparators: ComparatorSection,
    pub opportunities: OpportunitySection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleBlock {
    pub heading: String,
    pub organization_name: String,
    pub focus_area: String,
    pub zip_code: String,
    pub generated_on: NaiveDate,
}

impl TitleBlock {
    /// "<focus> organizations near <zip> • Generated on <M/D/YYYY>"
    pub fn subtitle(&self) -> String {
        format!(
            "{} organizations near {} • Generated on {}",
            self.focus_area,
            self.zip_code,
            display_date(self.generated_on)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub heading: String,
    pub comparator_count: usize,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPanels {
    pub density: DensityPanel,
    pub funding: FundingPanel,
    pub reach: ReachPanel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityPanel {
    pub heading: String,
    pub count_label: String,
    pub count: usize,
    pub saturation_percent: u8,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingPanel {
    pub heading: String,
    pub level: CompetitionLevel,
    pub badge: String,
    pub tone: Tone,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachPanel {
    pub heading: String,
    pub value: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparatorSection {
    pub heading: String,
    pub description: String,
    pub cards: Vec<ComparatorCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparatorCard {
    pub name: String,
    pub mission: String,
    pub distance_badge: String,
    pub similarity: String,
    pub budget: String,
    pub serves: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunitySection {
    pub heading: String,
    pub description: String,
    pub items: Vec<NumberedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberedItem {
    pub number: usize,
    pub text: String,
}

/// US-style short date, e.g. `3/7/2026`.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

fn comparator_card(comparator: &ComparatorEntity) -> ComparatorCard {
    ComparatorCard {
        name: comparator.name.clone(),
        mission: comparator.mission_summary.clone(),
        distance_badge: format!("{} miles", comparator.distance_miles),
        similarity: format!("{}% similar", comparator.similarity_score),
        budget: comparator.budget_band.clone(),
        serves: comparator.target_population.clone(),
    }
}

#[tracing::instrument(
    name = "pipeline_stage render",
    skip_all,
    fields(
        pipeline.stage = "render",
        render.cards_count,
        render.opportunities_count,
    )
)]
pub fn render(
    profile: &OrganizationProfile,
    comparators: &[ComparatorEntity],
    metrics: &ReportMetrics,
    generated_on: NaiveDate,
) -> Document {
    let focus_area = profile.focus_area().label();
    let level = metrics.funding_competition_level;

    let cards: Vec<ComparatorCard> = comparators
        .iter()
        .take(DISPLAY_CAP)
        .map(comparator_card)
        .collect();

    let items: Vec<NumberedItem> = metrics
        .differentiation_advice
        .iter()
        .enumerate()
        .map(|(index, text)| NumberedItem {
            number: index + 1,
            text: text.clone(),
        })
        .collect();

    let span = tracing::Span::current();
    span.record("render.cards_count", cards.len());
    span.record("render.opportunities_count", items.len());

    Document {
        title: TitleBlock {
            heading: REPORT_TITLE.to_string(),
            organization_name: profile.name().to_string(),
            focus_area: focus_area.to_string(),
            zip_code: profile.service_zip().to_string(),
            generated_on,
        },
        insight: Insight {
            heading: "Key Insight: You're Not Alone".to_string(),
            comparator_count: metrics.comparator_count,
            body: format!(
                "We found {} similar organizations operating in your area. \
                Understanding this landscape is crucial for strategic planning and fundraising success.",
                metrics.comparator_count
            ),
        },
        panels: SummaryPanels {
            density: DensityPanel {
                heading: "Market Density".to_string(),
                count_label: format!("Organizations in {focus_area}"),
                count: metrics.comparator_count,
                saturation_percent: metrics.market_saturation_percent,
                caption: format!(
                    "{}% market saturation in your zip code area",
                    metrics.market_saturation_percent
                ),
            },
            funding: FundingPanel {
                heading: "Funding Competition".to_string(),
                level,
                badge: format!("{} Competition", level.label()),
                tone: level.tone(),
                caption: "Based on similar organizations competing for grants and donations in your focus area."
                    .to_string(),
            },
            reach: ReachPanel {
                heading: "Geographic Reach".to_string(),
                value: format!("{} mi", metrics.average_distance_miles),
                caption: "Average distance to similar organizations".to_string(),
            },
        },
        comparators: ComparatorSection {
            heading: "Similar Organizations in Your Area".to_string(),
            description: "Organizations with similar missions, target populations, or service areas \
                that you may be competing with for funding and recognition."
                .to_string(),
            cards,
        },
        opportunities: OpportunitySection {
            heading: "Differentiation Opportunities".to_string(),
            description: "Strategic recommendations to help you stand out in your local nonprofit landscape."
                .to_string(),
            items,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::form::tests::filled_form;
    use crate::landscape::static_data::{advice_for, comparator_set};
    use crate::pipeline::metrics::compute_metrics;
    use crate::pipeline::metrics::tests::comparator_at;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_render_assembles_all_sections() {
        let profile = filled_form().submit().unwrap();
        let comparators = comparator_set();
        let metrics = compute_metrics(&comparators, advice_for(profile.focus_area()));

        let doc = render(&profile, &comparators, &metrics, date(2026, 3, 7));

        assert_eq!(doc.title.heading, "Competitive Analysis Report");
        assert_eq!(doc.title.organization_name, "Hope & Healing, Inc.");
        assert_eq!(
            doc.title.subtitle(),
            "Mental Health organizations near 02139 • Generated on 3/7/2026"
        );
        assert!(doc.insight.body.starts_with("We found 5 similar organizations"));
        assert_eq!(doc.panels.density.count_label, "Organizations in Mental Health");
        assert_eq!(
            doc.panels.density.caption,
            "73% market saturation in your zip code area"
        );
        assert_eq!(doc.panels.funding.badge, "High Competition");
        assert_eq!(doc.panels.funding.tone, Tone::Destructive);
        assert_eq!(doc.panels.reach.value, "4 mi");

        let first = &doc.comparators.cards[0];
        assert_eq!(first.name, "Community Health Alliance");
        assert_eq!(first.distance_badge, "2.3 miles");
        assert_eq!(first.similarity, "87% similar");
        assert_eq!(first.budget, "$100K - $500K");
        assert_eq!(first.serves, "Low-income families, Uninsured adults");

        let numbers: Vec<usize> = doc.opportunities.items.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert!(doc.opportunities.items[0].text.contains("mental health"));
    }

    #[test]
    fn test_render_caps_displayed_comparators() {
        let profile = filled_form().submit().unwrap();
        let comparators: Vec<_> = (1..=8).map(|d| comparator_at(d as f64)).collect();
        let metrics = compute_metrics(&comparators, vec![]);

        let doc = render(&profile, &comparators, &metrics, date(2026, 1, 1));

        assert_eq!(doc.comparators.cards.len(), DISPLAY_CAP);
        assert_eq!(doc.insight.comparator_count, 8);
        assert_eq!(doc.panels.density.count, 8);
        assert!(doc.opportunities.items.is_empty());
    }

    #[test]
    fn test_whole_mile_distance_badge() {
        let card = comparator_card(&comparator_at(2.0));
        assert_eq!(card.distance_badge, "2 miles");
    }

    #[test]
    fn test_render_is_idempotent_apart_from_date() {
        let profile = filled_form().submit().unwrap();
        let comparators = comparator_set();
        let metrics = compute_metrics(&comparators, advice_for(profile.focus_area()));

        let first = render(&profile, &comparators, &metrics, date(2026, 10, 19));
        let mut second = render(&profile, &comparators, &metrics, date(2027, 2, 1));
        assert_ne!(first, second);

        second.title.generated_on = first.title.generated_on;
        assert_eq!(first, second);
    }

    #[test]
    fn test_display_date_has_no_padding() {
        assert_eq!(display_date(date(2026, 10, 19)), "10/19/2026");
        assert_eq!(display_date(date(2026, 1, 5)), "1/5/2026");
    }
}
