pub mod form;

pub use form::{FieldIssue, FormField, IssueKind, OrganizationForm, ValidationError, is_valid_zip};
