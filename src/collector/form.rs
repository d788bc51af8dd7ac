use std::fmt;

use serde::Serialize;

use crate::domain::{BudgetBand, FocusArea, OrganizationProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormField {
    OrganizationName,
    ZipCode,
    FocusArea,
    AnnualBudget,
    Mission,
    TargetPopulation,
}

impl FormField {
    /// Fields in the order the form presents them.
    pub const ALL: [FormField; 6] = [
        FormField::OrganizationName,
        FormField::ZipCode,
        FormField::FocusArea,
        FormField::AnnualBudget,
        FormField::Mission,
        FormField::TargetPopulation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::OrganizationName => "Organization Name",
            FormField::ZipCode => "Primary Service Zip Code",
            FormField::FocusArea => "Primary Focus Area",
            FormField::AnnualBudget => "Annual Budget Range",
            FormField::Mission => "Mission Statement",
            FormField::TargetPopulation => "Target Population",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::OrganizationName => "Enter your organization's name",
            FormField::ZipCode => "12345",
            FormField::FocusArea => "Select your main focus area",
            FormField::AnnualBudget => "Select budget range",
            FormField::Mission => {
                "Briefly describe your organization's mission and primary activities"
            }
            FormField::TargetPopulation => "e.g., Low-income families, Veterans, Youth ages 12-18",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, FormField::AnnualBudget)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueKind {
    Missing,
    MalformedZip,
    UnknownOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: FormField,
    pub kind: IssueKind,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IssueKind::Missing => write!(f, "{} is required", self.field),
            IssueKind::MalformedZip => write!(f, "{} must be exactly 5 digits", self.field),
            IssueKind::UnknownOption => write!(f, "{} is not one of the listed options", self.field),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn render_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// `[0-9]{5}`
pub fn is_valid_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}

/// Raw field values as the user typed or picked them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationForm {
    organization_name: String,
    zip_code: String,
    focus_area: String,
    annual_budget: String,
    mission: String,
    target_population: String,
}

impl OrganizationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::OrganizationName => &self.organization_name,
            FormField::ZipCode => &self.zip_code,
            FormField::FocusArea => &self.focus_area,
            FormField::AnnualBudget => &self.annual_budget,
            FormField::Mission => &self.mission,
            FormField::TargetPopulation => &self.target_population,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::OrganizationName => &mut self.organization_name,
            FormField::ZipCode => &mut self.zip_code,
            FormField::FocusArea => &mut self.focus_area,
            FormField::AnnualBudget => &mut self.annual_budget,
            FormField::Mission => &mut self.mission,
            FormField::TargetPopulation => &mut self.target_population,
        }
    }

    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| field.is_required() && self.value(*field).is_empty())
            .collect()
    }

    /// Problems with a single field, without looking at the others.
    pub fn check_field(&self, field: FormField) -> Option<FieldIssue> {
        let value = self.value(field);
        let kind = if value.is_empty() {
            field.is_required().then_some(IssueKind::Missing)
        } else {
            match field {
                FormField::ZipCode if !is_valid_zip(value) => Some(IssueKind::MalformedZip),
                FormField::FocusArea if value.parse::<FocusArea>().is_err() => {
                    Some(IssueKind::UnknownOption)
                }
                FormField::AnnualBudget if value.parse::<BudgetBand>().is_err() => {
                    Some(IssueKind::UnknownOption)
                }
                _ => None,
            }
        };
        kind.map(|kind| FieldIssue { field, kind })
    }

    pub fn issues(&self) -> Vec<FieldIssue> {
        FormField::ALL
            .into_iter()
            .filter_map(|field| self.check_field(field))
            .collect()
    }

    /// Whether the submit action is available.
    pub fn can_submit(&self) -> bool {
        self.issues().is_empty()
    }

    #[tracing::instrument(name = "form submit", skip(self), fields(form.issues))]
    pub fn submit(&self) -> Result<OrganizationProfile, ValidationError> {
        let issues = self.issues();
        tracing::Span::current().record("form.issues", issues.len());
        if !issues.is_empty() {
            return Err(ValidationError { issues });
        }

        let focus_area = self
            .focus_area
            .parse::<FocusArea>()
            .map_err(|_| ValidationError {
                issues: vec![FieldIssue {
                    field: FormField::FocusArea,
                    kind: IssueKind::UnknownOption,
                }],
            })?;
        let annual_budget = if self.annual_budget.is_empty() {
            None
        } else {
            self.annual_budget.parse::<BudgetBand>().ok()
        };

        Ok(OrganizationProfile::from_parts(
            self.organization_name.clone(),
            self.zip_code.clone(),
            focus_area,
            self.mission.clone(),
            self.target_population.clone(),
            annual_budget,
        ))
    }
}
