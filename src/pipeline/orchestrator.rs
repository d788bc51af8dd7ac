use std::time::Instant;

use chrono::NaiveDate;
use opentelemetry::KeyValue;
use serde::Serialize;

use crate::domain::{ComparatorEntity, OrganizationProfile};
use crate::error::AppError;
use crate::landscape::LandscapeProvider;
use crate::telemetry::metrics::{REPORT_COMPARATORS, REPORT_RENDER_COUNT, REPORT_RENDER_DURATION};

use super::metrics::{self, ReportMetrics};
use super::render::{self, Document};

/// One profile with its comparators, metrics and rendered document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub profile: OrganizationProfile,
    pub comparators: Vec<ComparatorEntity>,
    pub metrics: ReportMetrics,
    pub document: Document,
}

/// Local calendar date shown on the report.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[tracing::instrument(
    name = "pipeline report",
    skip(provider, profile),
    fields(
        report.provider = provider.name(),
        report.focus_area = %profile.focus_area(),
        report.comparators_count,
        report.duration_ms,
    )
)]
pub async fn generate_report(
    provider: &dyn LandscapeProvider,
    profile: OrganizationProfile,
    generated_on: NaiveDate,
) -> Result<Report, AppError> {
    let start = Instant::now();

    // Stage 1: Comparators
    let comparators = provider
        .comparators()
        .await
        .map_err(|e| AppError::Provider(e.to_string()))?;

    // Stage 2: Advice
    let advice = provider
        .advice(profile.focus_area(), profile.mission())
        .await
        .map_err(|e| AppError::Provider(e.to_string()))?;

    // Stage 3: Metrics
    let metrics = metrics::compute_metrics(&comparators, advice);

    // Stage 4: Document
    let document = render::render(&profile, &comparators, &metrics, generated_on);

    let duration = start.elapsed();

    REPORT_RENDER_COUNT.add(
        1,
        &[KeyValue::new(
            "report.focus_area",
            profile.focus_area().label(),
        )],
    );
    REPORT_RENDER_DURATION.record(duration.as_secs_f64(), &[]);
    REPORT_COMPARATORS.record(comparators.len() as f64, &[]);

    let span = tracing::Span::current();
    span.record("report.comparators_count", comparators.len());
    span.record("report.duration_ms", duration.as_millis() as u64);

    tracing::info!(
        organization = %profile.name(),
        comparators = comparators.len(),
        "Report rendered"
    );

    Ok(Report {
        profile,
        comparators,
        metrics,
        document,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::form::tests::filled_form;
    use crate::domain::FocusArea;
    use crate::landscape::StaticLandscape;

    struct BrokenLandscape;

    #[async_trait::async_trait]
    impl LandscapeProvider for BrokenLandscape {
        async fn comparators(&self) -> anyhow::Result<Vec<ComparatorEntity>> {
            Err(anyhow::anyhow!("directory unavailable"))
        }

        async fn advice(&self, _: FocusArea, _: &str) -> anyhow::Result<Vec<String>> {
            Ok(vec![])
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_generate_report_with_static_landscape() {
        let profile = filled_form().submit().unwrap();
        let on = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let report = generate_report(&StaticLandscape::new(), profile.clone(), on)
            .await
            .unwrap();

        assert_eq!(report.profile, profile);
        assert_eq!(report.comparators.len(), 5);
        assert_eq!(report.metrics.average_distance_miles, 4);
        assert_eq!(report.metrics.differentiation_advice.len(), 5);
        assert_eq!(report.document.comparators.cards.len(), 5);
        assert_eq!(report.document.title.generated_on, on);
    }

    #[test]
    fn test_provider_failure_maps_to_app_error() {
        let profile = filled_form().submit().unwrap();
        let on = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let result = tokio_test::block_on(generate_report(&BrokenLandscape, profile, on));

        match result {
            Err(AppError::Provider(msg)) => assert_eq!(msg, "directory unavailable"),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_report_serializes_to_json() {
        let profile = filled_form().submit().unwrap();
        let on = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let report =
            tokio_test::block_on(generate_report(&StaticLandscape::new(), profile, on)).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["profile"]["focus_area"], "Mental Health");
        assert_eq!(json["metrics"]["funding_competition_level"], "High");
        assert_eq!(json["document"]["title"]["generated_on"], "2026-10-19");
    }
}
