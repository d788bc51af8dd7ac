//! Non-interactive `report` command: one profile in, one report out.

use std::io::Write;

use anyhow::bail;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::cli::ReportArgs;
use crate::error::AppError;
use crate::export::{ExportOutcome, ExportStatus, Notification};

use super::{Shell, text_view};

pub async fn run_report<W: Write>(
    shell: &mut Shell,
    notices: &mut UnboundedReceiver<Notification>,
    args: &ReportArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    let profile = args.to_form().submit().map_err(AppError::from)?;
    let report = shell.submit(profile).await?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&*report)?)?;
    } else {
        writeln!(out, "{}\n", text_view::report_text(&report.document))?;
    }

    if !args.export {
        return Ok(());
    }

    let ExportOutcome::Pending(job) = shell.export() else {
        bail!("export could not be started");
    };
    let status = job.wait().await;
    // JSON output stays parseable, so notices only go to the log there.
    while let Ok(notice) = notices.try_recv() {
        if notice.is_error() {
            tracing::warn!(notice = %notice, "Export notification");
        } else if args.json {
            tracing::info!(notice = %notice, "Export notification");
        } else {
            writeln!(out, "** {notice}")?;
        }
    }

    match status {
        ExportStatus::Completed(path) => {
            if !args.json {
                writeln!(out, "Saved {}", path.display())?;
            }
            Ok(())
        }
        ExportStatus::Failed(reason) => bail!("export failed: {reason}"),
    }
}
