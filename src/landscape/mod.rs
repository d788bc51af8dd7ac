pub mod static_data;

pub use static_data::StaticLandscape;

use crate::domain::{ComparatorEntity, FocusArea};

/// Source of the competitive landscape for a report.
///
/// The renderer only sees this trait, so a live data source can replace the
/// static set without touching report composition.
#[async_trait::async_trait]
pub trait LandscapeProvider: Send + Sync {
    async fn comparators(&self) -> anyhow::Result<Vec<ComparatorEntity>>;

    /// Advisory strings for the "Differentiation Opportunities" section.
    async fn advice(&self, focus_area: FocusArea, mission: &str) -> anyhow::Result<Vec<String>>;

    fn name(&self) -> &str;
}
