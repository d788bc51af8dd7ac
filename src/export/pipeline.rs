use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use opentelemetry::KeyValue;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::ExportError;
use crate::pipeline::Report;
use crate::telemetry::metrics::{EXPORT_ATTEMPTS, EXPORT_DURATION, EXPORT_FAILURES, EXPORT_PAGES};

use super::filename::export_file_name;
use super::layout::{self, PageGeometry, PagedDocument};
use super::notify::Notification;
use super::pdf;

type Assembler = fn(&PagedDocument, &str) -> Result<Vec<u8>, ExportError>;

/// Turns the displayed report into a PDF on disk, one export at a time.
///
/// Progress is reported through the notification channel; callers that want
/// the final path can await the returned job.
pub struct ExportPipeline {
    output_dir: PathBuf,
    geometry: PageGeometry,
    assembler: Assembler,
    notices: UnboundedSender<Notification>,
    in_flight: Arc<AtomicBool>,
}

#[derive(Debug)]
pub enum ExportOutcome {
    /// No report is displayed.
    Skipped,
    /// A previous export has not finished; this request was dropped.
    AlreadyRunning,
    Pending(ExportJob),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Completed(PathBuf),
    Failed(String),
}

#[derive(Debug)]
pub struct ExportJob {
    pub id: Uuid,
    pub file_name: String,
    handle: JoinHandle<ExportStatus>,
}

impl ExportJob {
    pub async fn wait(self) -> ExportStatus {
        match self.handle.await {
            Ok(status) => status,
            Err(err) => ExportStatus::Failed(ExportError::Task(err.to_string()).to_string()),
        }
    }
}

fn notify(notices: &UnboundedSender<Notification>, notice: Notification) {
    if let Err(err) = notices.send(notice) {
        tracing::debug!(notice = %err.0, "Notification dropped, receiver is gone");
    }
}

/// Clears the in-flight flag when the export task ends, however it ends.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ExportPipeline {
    pub fn new(output_dir: impl Into<PathBuf>, notices: UnboundedSender<Notification>) -> Self {
        Self {
            output_dir: output_dir.into(),
            geometry: PageGeometry::LETTER_PORTRAIT,
            assembler: pdf::assemble,
            notices,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    #[cfg(test)]
    fn with_assembler(mut self, assembler: Assembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Starts exporting `report` in the background. Must be called from
    /// within a tokio runtime.
    pub fn export(&self, report: Option<Arc<Report>>) -> ExportOutcome {
        let Some(report) = report else {
            tracing::debug!("Export requested with no report displayed");
            return ExportOutcome::Skipped;
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Export requested while another is running");
            return ExportOutcome::AlreadyRunning;
        }
        let guard = InFlight(Arc::clone(&self.in_flight));

        let id = Uuid::new_v4();
        let file_name = export_file_name(report.profile.name());
        let output_dir = self.output_dir.clone();
        let geometry = self.geometry;
        let assembler = self.assembler;
        let notices = self.notices.clone();

        EXPORT_ATTEMPTS.add(1, &[]);
        notify(&notices, Notification::export_started());

        let handle = tokio::spawn({
            let file_name = file_name.clone();
            async move {
                let _guard = guard;
                let start = Instant::now();
                let result = run_export(id, report, &file_name, &output_dir, geometry, assembler).await;
                let duration = start.elapsed().as_secs_f64();

                match result {
                    Ok(path) => {
                        EXPORT_DURATION.record(duration, &[KeyValue::new("export.status", "ok")]);
                        tracing::info!(export.id = %id, path = %path.display(), "Report exported");
                        notify(&notices, Notification::export_succeeded());
                        ExportStatus::Completed(path)
                    }
                    Err(err) => {
                        EXPORT_DURATION
                            .record(duration, &[KeyValue::new("export.status", "error")]);
                        EXPORT_FAILURES.add(1, &[]);
                        tracing::error!(export.id = %id, error = %err, "Report export failed");
                        notify(&notices, Notification::export_failed());
                        ExportStatus::Failed(err.to_string())
                    }
                }
            }
        });

        ExportOutcome::Pending(ExportJob {
            id,
            file_name,
            handle,
        })
    }
}

#[tracing::instrument(
    name = "export",
    skip_all,
    fields(
        export.id = %id,
        export.file_name = file_name,
        export.output_dir = %output_dir.display(),
    )
)]
async fn run_export(
    id: Uuid,
    report: Arc<Report>,
    file_name: &str,
    output_dir: &Path,
    geometry: PageGeometry,
    assembler: Assembler,
) -> Result<PathBuf, ExportError> {
    let span = tracing::Span::current();
    let bytes = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        let groups = layout::flatten(&report.document);
        let paged = layout::paginate(&groups, geometry)?;
        EXPORT_PAGES.record(paged.page_count() as f64, &[]);
        assembler(&paged, &report.document.title.heading)
    })
    .await
    .map_err(|err| ExportError::Task(err.to_string()))??;

    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| ExportError::Write {
            path: output_dir.to_path_buf(),
            source,
        })?;

    let path = output_dir.join(file_name);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::form::tests::filled_form;
    use crate::export::NoticeLevel;
    use crate::landscape::StaticLandscape;
    use crate::pipeline::generate_report;
    use chrono::NaiveDate;
    use tokio::sync::mpsc;

    async fn static_report() -> Arc<Report> {
        let profile = filled_form().submit().unwrap();
        let on = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        Arc::new(
            generate_report(&StaticLandscape::new(), profile, on)
                .await
                .unwrap(),
        )
    }

    fn expect_pending(outcome: ExportOutcome) -> ExportJob {
        match outcome {
            ExportOutcome::Pending(job) => job,
            other => panic!("expected a pending export, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_export_writes_pdf_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pipeline = ExportPipeline::new(dir.path().join("reports"), tx);

        let job = expect_pending(pipeline.export(Some(static_report().await)));
        assert_eq!(job.file_name, "hope___healing__inc__competitive_analysis.pdf");
        assert!(pipeline.is_busy());

        let status = job.wait().await;
        let expected = dir
            .path()
            .join("reports")
            .join("hope___healing__inc__competitive_analysis.pdf");
        assert_eq!(status, ExportStatus::Completed(expected.clone()));

        let bytes = std::fs::read(&expected).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        assert_eq!(rx.recv().await.unwrap(), Notification::export_started());
        assert_eq!(rx.recv().await.unwrap(), Notification::export_succeeded());
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn test_unwritable_destination_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-directory");
        std::fs::write(&blocker, b"occupied").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pipeline = ExportPipeline::new(&blocker, tx);

        let job = expect_pending(pipeline.export(Some(static_report().await)));
        match job.wait().await {
            ExportStatus::Failed(message) => assert!(message.starts_with("could not write")),
            other => panic!("expected failure, got {other:?}"),
        }

        assert_eq!(rx.recv().await.unwrap(), Notification::export_started());
        let failure = rx.recv().await.unwrap();
        assert_eq!(failure.level, NoticeLevel::Error);
        assert_eq!(failure, Notification::export_failed());
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn test_layout_failure_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pipeline = ExportPipeline::new(dir.path(), tx).with_geometry(PageGeometry {
            width_mm: 40.0,
            height_mm: 40.0,
            margin_mm: 20.0,
        });

        let job = expect_pending(pipeline.export(Some(static_report().await)));
        assert!(matches!(job.wait().await, ExportStatus::Failed(_)));

        rx.recv().await.unwrap();
        assert!(rx.recv().await.unwrap().is_error());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_panic_while_assembling_reports_failure() {
        fn panicking(_: &PagedDocument, _: &str) -> Result<Vec<u8>, ExportError> {
            panic!("font table corrupted");
        }

        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pipeline = ExportPipeline::new(dir.path(), tx).with_assembler(panicking);

        let job = expect_pending(pipeline.export(Some(static_report().await)));
        match job.wait().await {
            ExportStatus::Failed(message) => {
                assert!(message.starts_with("export task aborted"), "{message}")
            }
            other => panic!("expected failure, got {other:?}"),
        }

        assert_eq!(rx.recv().await.unwrap(), Notification::export_started());
        assert_eq!(rx.recv().await.unwrap(), Notification::export_failed());
        assert!(!pipeline.is_busy());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_notices_without_receiver_do_not_fail_export() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let pipeline = ExportPipeline::new(dir.path(), tx);

        let job = expect_pending(pipeline.export(Some(static_report().await)));
        assert!(matches!(job.wait().await, ExportStatus::Completed(_)));
        assert!(!pipeline.is_busy());
    }

    #[tokio::test]
    async fn test_no_report_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pipeline = ExportPipeline::new(dir.path(), tx);

        assert!(matches!(pipeline.export(None), ExportOutcome::Skipped));
        drop(pipeline);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_second_request_while_running_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pipeline = ExportPipeline::new(dir.path(), tx);
        let report = static_report().await;

        let job = expect_pending(pipeline.export(Some(Arc::clone(&report))));
        assert!(matches!(
            pipeline.export(Some(Arc::clone(&report))),
            ExportOutcome::AlreadyRunning
        ));
        assert!(matches!(job.wait().await, ExportStatus::Completed(_)));

        // Exactly one started/succeeded pair.
        drop(pipeline);
        let mut notices = Vec::new();
        while let Some(notice) = rx.recv().await {
            notices.push(notice);
        }
        assert_eq!(
            notices,
            vec![Notification::export_started(), Notification::export_succeeded()]
        );
    }

    #[tokio::test]
    async fn test_export_allowed_again_after_completion() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let pipeline = ExportPipeline::new(dir.path(), tx);
        let report = static_report().await;

        let first = expect_pending(pipeline.export(Some(Arc::clone(&report))));
        first.wait().await;
        let second = expect_pending(pipeline.export(Some(report)));
        assert!(matches!(second.wait().await, ExportStatus::Completed(_)));
    }
}
