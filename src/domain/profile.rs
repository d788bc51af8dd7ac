use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Primary focus area of an organization, in the order the form lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusArea {
    Education,
    #[serde(rename = "Health & Medical")]
    HealthMedical,
    #[serde(rename = "Human Services")]
    HumanServices,
    #[serde(rename = "Arts & Culture")]
    ArtsCulture,
    Environment,
    #[serde(rename = "Animal Welfare")]
    AnimalWelfare,
    Religious,
    #[serde(rename = "Community Development")]
    CommunityDevelopment,
    #[serde(rename = "Youth Development")]
    YouthDevelopment,
    #[serde(rename = "Senior Services")]
    SeniorServices,
    #[serde(rename = "Mental Health")]
    MentalHealth,
    #[serde(rename = "Housing & Homelessness")]
    HousingHomelessness,
    #[serde(rename = "Food Security")]
    FoodSecurity,
    Other,
}

impl FocusArea {
    pub const ALL: [FocusArea; 14] = [
        FocusArea::Education,
        FocusArea::HealthMedical,
        FocusArea::HumanServices,
        FocusArea::ArtsCulture,
        FocusArea::Environment,
        FocusArea::AnimalWelfare,
        FocusArea::Religious,
        FocusArea::CommunityDevelopment,
        FocusArea::YouthDevelopment,
        FocusArea::SeniorServices,
        FocusArea::MentalHealth,
        FocusArea::HousingHomelessness,
        FocusArea::FoodSecurity,
        FocusArea::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FocusArea::Education => "Education",
            FocusArea::HealthMedical => "Health & Medical",
            FocusArea::HumanServices => "Human Services",
            FocusArea::ArtsCulture => "Arts & Culture",
            FocusArea::Environment => "Environment",
            FocusArea::AnimalWelfare => "Animal Welfare",
            FocusArea::Religious => "Religious",
            FocusArea::CommunityDevelopment => "Community Development",
            FocusArea::YouthDevelopment => "Youth Development",
            FocusArea::SeniorServices => "Senior Services",
            FocusArea::MentalHealth => "Mental Health",
            FocusArea::HousingHomelessness => "Housing & Homelessness",
            FocusArea::FoodSecurity => "Food Security",
            FocusArea::Other => "Other",
        }
    }
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FocusArea {
    type Err = UnknownOption;

    /// Accepts the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FocusArea::ALL
            .into_iter()
            .find(|area| area.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

/// Annual budget range. Variants are declared smallest first so `Ord` follows
/// the band order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BudgetBand {
    #[serde(rename = "Under $100K")]
    Under100K,
    #[serde(rename = "$100K - $500K")]
    From100KTo500K,
    #[serde(rename = "$500K - $1M")]
    From500KTo1M,
    #[serde(rename = "$1M - $5M")]
    From1MTo5M,
    #[serde(rename = "Over $5M")]
    Over5M,
}

impl BudgetBand {
    pub const ALL: [BudgetBand; 5] = [
        BudgetBand::Under100K,
        BudgetBand::From100KTo500K,
        BudgetBand::From500KTo1M,
        BudgetBand::From1MTo5M,
        BudgetBand::Over5M,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BudgetBand::Under100K => "Under $100K",
            BudgetBand::From100KTo500K => "$100K - $500K",
            BudgetBand::From500KTo1M => "$500K - $1M",
            BudgetBand::From1MTo5M => "$1M - $5M",
            BudgetBand::Over5M => "Over $5M",
        }
    }
}

impl fmt::Display for BudgetBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BudgetBand {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BudgetBand::ALL
            .into_iter()
            .find(|band| band.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown option: {0:?}")]
pub struct UnknownOption(pub String);

/// A submitted organization. Only `OrganizationForm::submit` builds one, so
/// every required field is known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationProfile {
    name: String,
    service_zip: String,
    focus_area: FocusArea,
    mission: String,
    target_population: String,
    annual_budget: Option<BudgetBand>,
}

impl OrganizationProfile {
    pub(crate) fn from_parts(
        name: String,
        service_zip: String,
        focus_area: FocusArea,
        mission: String,
        target_population: String,
        annual_budget: Option<BudgetBand>,
    ) -> Self {
        Self {
            name,
            service_zip,
            focus_area,
            mission,
            target_population,
            annual_budget,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service_zip(&self) -> &str {
        &self.service_zip
    }

    pub fn focus_area(&self) -> FocusArea {
        self.focus_area
    }

    pub fn mission(&self) -> &str {
        &self.mission
    }

    pub fn target_population(&self) -> &str {
        &self.target_population
    }

    pub fn annual_budget(&self) -> Option<BudgetBand> {
        self.annual_budget
    }
}
