pub mod comparator;
pub mod profile;

pub use comparator::ComparatorEntity;
pub use profile::{BudgetBand, FocusArea, OrganizationProfile};
