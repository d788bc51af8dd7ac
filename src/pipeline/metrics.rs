use serde::Serialize;

use crate::domain::ComparatorEntity;

/// Share of the zip-code area already served. Not derived from the data yet.
pub const MARKET_SATURATION_PERCENT: u8 = 73;

/// Funding pressure in the focus area. Not derived from the data yet.
pub const FUNDING_COMPETITION_LEVEL: CompetitionLevel = CompetitionLevel::High;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

/// Colour role of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Warning,
    Destructive,
}

impl CompetitionLevel {
    pub fn label(self) -> &'static str {
        match self {
            CompetitionLevel::Low => "Low",
            CompetitionLevel::Medium => "Medium",
            CompetitionLevel::High => "High",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            CompetitionLevel::Low => Tone::Success,
            CompetitionLevel::Medium => Tone::Warning,
            CompetitionLevel::High => Tone::Destructive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetrics {
    pub comparator_count: usize,
    pub average_distance_miles: u32,
    pub market_saturation_percent: u8,
    pub funding_competition_level: CompetitionLevel,
    pub differentiation_advice: Vec<String>,
}

/// Rounded mean distance over every comparator, 0 for an empty set.
pub fn average_distance_miles(comparators: &[ComparatorEntity]) -> u32 {
    if comparators.is_empty() {
        return 0;
    }
    let total: f64 = comparators.iter().map(|c| c.distance_miles).sum();
    (total / comparators.len() as f64).round() as u32
}

#[tracing::instrument(
    name = "pipeline_stage metrics",
    skip(comparators, advice),
    fields(
        pipeline.stage = "metrics",
        metrics.comparators_count = comparators.len(),
        metrics.average_distance_miles,
    )
)]
pub fn compute_metrics(comparators: &[ComparatorEntity], advice: Vec<String>) -> ReportMetrics {
    let average = average_distance_miles(comparators);
    tracing::Span::current().record("metrics.average_distance_miles", average);

    ReportMetrics {
        comparator_count: comparators.len(),
        average_distance_miles: average,
        market_saturation_percent: MARKET_SATURATION_PERCENT,
        funding_competition_level: FUNDING_COMPETITION_LEVEL,
        differentiation_advice: advice,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::landscape::static_data::comparator_set;

    pub(crate) fn comparator_at(distance_miles: f64) -> ComparatorEntity {
        ComparatorEntity {
            name: format!("Org {distance_miles}"),
            mission_summary: "Test mission".to_string(),
            budget_band: "Under $100K".to_string(),
            target_population: "Everyone".to_string(),
            distance_miles,
            similarity_score: 50,
        }
    }

    #[test]
    fn test_average_distance_for_static_set() {
        // (2.3 + 4.1 + 1.8 + 6.2 + 3.7) / 5 = 3.62
        assert_eq!(average_distance_miles(&comparator_set()), 4);
    }

    #[test]
    fn test_average_distance_empty_is_zero() {
        assert_eq!(average_distance_miles(&[]), 0);
    }

    #[test]
    fn test_average_distance_rounds_half_up() {
        let comparators = vec![comparator_at(1.0), comparator_at(2.0)];
        assert_eq!(average_distance_miles(&comparators), 2);
        let comparators = vec![comparator_at(1.0), comparator_at(1.4)];
        assert_eq!(average_distance_miles(&comparators), 1);
    }

    #[test]
    fn test_average_uses_full_collection() {
        let mut comparators: Vec<_> = (0..5).map(|_| comparator_at(1.0)).collect();
        comparators.push(comparator_at(25.0));
        // 30 / 6 = 5 even though only five would be displayed
        assert_eq!(average_distance_miles(&comparators), 5);
    }

    #[test]
    fn test_compute_metrics_constants() {
        let advice = vec!["a".to_string(), "b".to_string()];
        let metrics = compute_metrics(&comparator_set(), advice.clone());
        assert_eq!(metrics.comparator_count, 5);
        assert_eq!(metrics.average_distance_miles, 4);
        assert_eq!(metrics.market_saturation_percent, 73);
        assert_eq!(metrics.funding_competition_level, CompetitionLevel::High);
        assert_eq!(metrics.differentiation_advice, advice);
    }

    #[test]
    fn test_competition_tones() {
        assert_eq!(CompetitionLevel::Low.tone(), Tone::Success);
        assert_eq!(CompetitionLevel::Medium.tone(), Tone::Warning);
        assert_eq!(CompetitionLevel::High.tone(), Tone::Destructive);
    }
}
