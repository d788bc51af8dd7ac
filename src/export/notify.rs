use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient message surfaced to the user while an export runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notification {
    fn new(title: &str, description: &str, level: NoticeLevel) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            level,
        }
    }

    pub fn export_started() -> Self {
        Self::new(
            "Generating PDF...",
            "Your competitive analysis report is being prepared for download.",
            NoticeLevel::Info,
        )
    }

    pub fn export_succeeded() -> Self {
        Self::new(
            "PDF Downloaded",
            "Your competitive analysis report has been saved successfully.",
            NoticeLevel::Info,
        )
    }

    /// Deliberately generic; the underlying fault goes to the log.
    pub fn export_failed() -> Self {
        Self::new(
            "Export Error",
            "There was an issue generating your PDF. Please try again.",
            NoticeLevel::Error,
        )
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
