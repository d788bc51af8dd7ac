use crate::domain::{BudgetBand, ComparatorEntity, FocusArea};

use super::LandscapeProvider;

struct ComparatorSeed {
    name: &'static str,
    mission: &'static str,
    budget: BudgetBand,
    serves: &'static str,
    distance_miles: f64,
    similarity_score: u8,
}

const COMPARATORS: [ComparatorSeed; 5] = [
    ComparatorSeed {
        name: "Community Health Alliance",
        mission: "Providing healthcare access to underserved communities through mobile clinics and health education programs.",
        budget: BudgetBand::From100KTo500K,
        serves: "Low-income families, Uninsured adults",
        distance_miles: 2.3,
        similarity_score: 87,
    },
    ComparatorSeed {
        name: "Hope & Healing Center",
        mission: "Mental health support and crisis intervention services for youth and families in crisis.",
        budget: BudgetBand::From500KTo1M,
        serves: "Youth ages 12-18, Families in crisis",
        distance_miles: 4.1,
        similarity_score: 72,
    },
    ComparatorSeed {
        name: "Neighborhood Support Network",
        mission: "Connecting families with resources including food assistance, housing support, and job training.",
        budget: BudgetBand::From1MTo5M,
        serves: "Low-income families, Unemployed adults",
        distance_miles: 1.8,
        similarity_score: 65,
    },
    ComparatorSeed {
        name: "United Community Services",
        mission: "Comprehensive social services including childcare, senior programs, and emergency assistance.",
        budget: BudgetBand::From500KTo1M,
        serves: "Seniors, Working families, Emergency cases",
        distance_miles: 6.2,
        similarity_score: 58,
    },
    ComparatorSeed {
        name: "Family First Foundation",
        mission: "Strengthening families through parenting education, childcare support, and financial literacy programs.",
        budget: BudgetBand::From100KTo500K,
        serves: "Parents, Young children, Low-income families",
        distance_miles: 3.7,
        similarity_score: 54,
    },
];

const FIXED_ADVICE: [&str; 4] = [
    "Develop innovative service delivery methods (mobile services, virtual programs, or peer-to-peer models) that competitors aren't using.",
    "Partner with local businesses or government agencies to create unique funding streams and reduce grant competition.",
    "Focus on measurable outcomes and data-driven impact reporting to stand out to funders who value accountability.",
    "Explore underserved geographic areas within your region where similar organizations have limited presence.",
];

pub fn comparator_set() -> Vec<ComparatorEntity> {
    COMPARATORS
        .iter()
        .map(|seed| ComparatorEntity {
            name: seed.name.to_string(),
            mission_summary: seed.mission.to_string(),
            budget_band: seed.budget.label().to_string(),
            target_population: seed.serves.to_string(),
            distance_miles: seed.distance_miles,
            similarity_score: seed.similarity_score,
        })
        .collect()
}

pub fn advice_for(focus_area: FocusArea) -> Vec<String> {
    let mut advice = Vec::with_capacity(FIXED_ADVICE.len() + 1);
    advice.push(format!(
        "Consider specializing in a specific age group or demographic within {} to reduce direct competition.",
        focus_area.label().to_lowercase()
    ));
    advice.extend(FIXED_ADVICE.iter().map(|s| s.to_string()));
    advice
}

/// Built-in comparator set and templated advice.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLandscape;

impl StaticLandscape {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl LandscapeProvider for StaticLandscape {
    async fn comparators(&self) -> anyhow::Result<Vec<ComparatorEntity>> {
        Ok(comparator_set())
    }

    // The mission does not shape the advice yet.
    async fn advice(&self, focus_area: FocusArea, _mission: &str) -> anyhow::Result<Vec<String>> {
        Ok(advice_for(focus_area))
    }

    fn name(&self) -> &str {
        "static"
    }
}
