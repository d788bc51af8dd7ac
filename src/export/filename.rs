pub const REPORT_SUFFIX: &str = "_competitive_analysis";
pub const EXTENSION: &str = "pdf";

/// Every character outside `[A-Za-z0-9]` becomes `_`, the rest is
/// lower-cased, then the report suffix and extension are appended.
pub fn export_file_name(organization_name: &str) -> String {
    let stem: String = organization_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}{REPORT_SUFFIX}.{EXTENSION}")
}
