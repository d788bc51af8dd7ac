//! Two-state session: collecting organization details, then showing the
//! report built from them.

pub mod oneshot;
pub mod terminal;
pub mod text_view;

use std::sync::Arc;

use crate::domain::OrganizationProfile;
use crate::error::{AppError, AppResult};
use crate::export::{ExportOutcome, ExportPipeline};
use crate::landscape::LandscapeProvider;
use crate::pipeline::{Report, generate_report, today};

#[derive(Debug, Clone, PartialEq)]
pub enum ShellState {
    Collecting,
    Reporting(Arc<Report>),
}

impl ShellState {
    pub fn is_reporting(&self) -> bool {
        matches!(self, ShellState::Reporting(_))
    }
}

pub struct Shell {
    state: ShellState,
    provider: Arc<dyn LandscapeProvider>,
    exporter: ExportPipeline,
}

impl Shell {
    pub fn new(provider: Arc<dyn LandscapeProvider>, exporter: ExportPipeline) -> Self {
        Self {
            state: ShellState::Collecting,
            provider,
            exporter,
        }
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn current_report(&self) -> Option<Arc<Report>> {
        match &self.state {
            ShellState::Reporting(report) => Some(Arc::clone(report)),
            ShellState::Collecting => None,
        }
    }

    pub fn exporter(&self) -> &ExportPipeline {
        &self.exporter
    }

    /// Collecting -> Reporting. The report is built before the state changes,
    /// so a provider failure leaves the shell collecting.
    #[tracing::instrument(name = "shell submit", skip_all, fields(organization = %profile.name()))]
    pub async fn submit(&mut self, profile: OrganizationProfile) -> AppResult<Arc<Report>> {
        if self.state.is_reporting() {
            return Err(AppError::InvalidState("a report is already displayed"));
        }

        let report = Arc::new(generate_report(self.provider.as_ref(), profile, today()).await?);
        self.state = ShellState::Reporting(Arc::clone(&report));
        tracing::debug!("Shell entered reporting state");
        Ok(report)
    }

    /// Reporting -> Collecting. Drops the profile and report; an export
    /// already running keeps its own copy and finishes.
    pub fn start_over(&mut self) {
        if self.state.is_reporting() {
            tracing::debug!("Shell returned to collecting state");
        }
        self.state = ShellState::Collecting;
    }

    pub fn export(&self) -> ExportOutcome {
        self.exporter.export(self.current_report())
    }
}
