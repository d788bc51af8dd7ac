use serde::{Deserialize, Serialize};

/// An organization that competes with the submitted one for funding and
/// recognition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparatorEntity {
    pub name: String,
    pub mission_summary: String,
    /// Label of a `BudgetBand`, kept as text as the data source supplies it.
    pub budget_band: String,
    pub target_population: String,
    pub distance_miles: f64,
    /// 0..=100
    pub similarity_score: u8,
}
