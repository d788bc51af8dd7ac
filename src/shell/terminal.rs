//! Interactive line-oriented front end over a [`Shell`].

use std::io::{BufRead, Write};

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::collector::{FormField, OrganizationForm};
use crate::domain::{BudgetBand, FocusArea, OrganizationProfile};
use crate::export::{ExportJob, ExportOutcome, Notification};

use super::Shell;
use super::text_view::{self, HELP};

enum Next {
    StartOver,
    Quit,
}

pub struct Terminal<W> {
    lines: UnboundedReceiver<String>,
    out: W,
    shell: Shell,
    notices: UnboundedReceiver<Notification>,
    pending: Option<ExportJob>,
}

/// A number picks from `labels` (1-based); anything else is kept as typed.
pub fn resolve_choice(input: &str, labels: &[&str]) -> String {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=labels.len()).contains(&n) => labels[n - 1].to_string(),
        _ => input.to_string(),
    }
}

/// Feeds stdin lines from a dedicated thread. A blocked read never holds up
/// runtime shutdown; the thread simply dies with the process.
pub fn stdin_lines() -> UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

impl<W: Write> Terminal<W> {
    pub fn new(
        lines: UnboundedReceiver<String>,
        out: W,
        shell: Shell,
        notices: UnboundedReceiver<Notification>,
    ) -> Self {
        Self {
            lines,
            out,
            shell,
            notices,
            pending: None,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs until `quit` or end of input, then waits for an export that is
    /// still running so its file is not lost.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.out, "{}\n", text_view::landing_banner())?;
            writeln!(self.out, "{}\n", text_view::form_intro())?;

            let Some(profile) = self.collect().await? else {
                break;
            };

            let report = match self.shell.submit(profile).await {
                Ok(report) => report,
                Err(err) => {
                    tracing::error!(error = %err, "Report could not be built");
                    writeln!(self.out, "Could not build the report: {err}\n")?;
                    continue;
                }
            };

            writeln!(self.out, "\n{}\n", text_view::reporting_header(&report.profile))?;
            writeln!(self.out, "{}\n", text_view::report_text(&report.document))?;
            writeln!(self.out, "{HELP}\n")?;

            match self.reporting().await? {
                Next::StartOver => self.shell.start_over(),
                Next::Quit => break,
            }
        }

        self.finish().await
    }

    async fn next_line(&mut self) -> anyhow::Result<Option<String>> {
        self.out.flush()?;
        loop {
            tokio::select! {
                line = self.lines.recv() => {
                    return Ok(line);
                }
                Some(notice) = self.notices.recv() => self.show_notice(&notice)?,
            }
        }
    }

    fn show_notice(&mut self, notice: &Notification) -> std::io::Result<()> {
        let tag = if notice.is_error() { "!!" } else { "**" };
        writeln!(self.out, "\n{tag} {notice}")
    }

    fn prompt(&mut self, field: FormField) -> std::io::Result<()> {
        match field {
            FormField::FocusArea => {
                let labels = FocusArea::ALL.map(FocusArea::label);
                writeln!(self.out, "{}", text_view::numbered_options(labels))?;
            }
            FormField::AnnualBudget => {
                let labels = BudgetBand::ALL.map(BudgetBand::label);
                writeln!(self.out, "{}", text_view::numbered_options(labels))?;
            }
            _ => {}
        }
        let marker = if field.is_required() { " *" } else { "" };
        write!(
            self.out,
            "{}{marker} ({}): ",
            field.label(),
            field.placeholder()
        )
    }

    /// Asks for each field until it is acceptable. `None` on end of input.
    async fn collect(&mut self) -> anyhow::Result<Option<OrganizationProfile>> {
        let mut form = OrganizationForm::new();
        for field in FormField::ALL {
            loop {
                self.prompt(field)?;
                let Some(input) = self.next_line().await? else {
                    return Ok(None);
                };
                let value = match field {
                    FormField::FocusArea => {
                        resolve_choice(&input, &FocusArea::ALL.map(FocusArea::label))
                    }
                    FormField::AnnualBudget => {
                        resolve_choice(&input, &BudgetBand::ALL.map(BudgetBand::label))
                    }
                    _ => input,
                };
                form.set(field, value);
                match form.check_field(field) {
                    None => break,
                    Some(issue) => writeln!(self.out, "  {issue}")?,
                }
            }
        }

        Ok(Some(form.submit()?))
    }

    async fn reporting(&mut self) -> anyhow::Result<Next> {
        loop {
            write!(self.out, "> ")?;
            let Some(command) = self.next_line().await? else {
                return Ok(Next::Quit);
            };
            match command.trim() {
                "export" => match self.shell.export() {
                    ExportOutcome::Pending(job) => self.pending = Some(job),
                    ExportOutcome::AlreadyRunning => {
                        writeln!(self.out, "An export is already in progress.")?
                    }
                    ExportOutcome::Skipped => {}
                },
                "start-over" | "new" => return Ok(Next::StartOver),
                "json" => {
                    if let Some(report) = self.shell.current_report() {
                        writeln!(self.out, "{}", serde_json::to_string_pretty(&*report)?)?;
                    }
                }
                "help" => writeln!(self.out, "{HELP}")?,
                "quit" | "exit" => return Ok(Next::Quit),
                "" => {}
                other => writeln!(
                    self.out,
                    "Unknown command {other:?}. Type `help` for the list."
                )?,
            }
        }
    }

    async fn finish(&mut self) -> anyhow::Result<()> {
        if let Some(job) = self.pending.take() {
            job.wait().await;
        }
        while let Ok(notice) = self.notices.try_recv() {
            self.show_notice(&notice)?;
        }
        self.out.flush()?;
        Ok(())
    }
}
