use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;

use landscape_report::cli::{Cli, Commands};
use landscape_report::config::Config;
use landscape_report::domain::{BudgetBand, FocusArea};
use landscape_report::export::ExportPipeline;
use landscape_report::landscape::{LandscapeProvider, StaticLandscape};
use landscape_report::shell::Shell;
use landscape_report::shell::oneshot::run_report;
use landscape_report::shell::terminal::{Terminal, stdin_lines};
use landscape_report::shell::text_view::numbered_options;
use landscape_report::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }

    let telemetry_guard = init_telemetry(&config)?;

    tracing::info!(
        environment = %config.environment,
        output_dir = %config.output_dir.display(),
        "Starting landscape-report"
    );

    let provider: Arc<dyn LandscapeProvider> = Arc::new(StaticLandscape::new());
    let (notice_tx, mut notices) = mpsc::unbounded_channel();
    let mut shell = Shell::new(
        provider,
        ExportPipeline::new(config.output_dir.clone(), notice_tx),
    );

    let result = match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let mut terminal = Terminal::new(stdin_lines(), std::io::stdout(), shell, notices);
            tokio::select! {
                result = terminal.run() => result,
                _ = shutdown_signal() => Ok(()),
            }
        }
        Commands::Report(args) => {
            let mut stdout = std::io::stdout();
            run_report(&mut shell, &mut notices, &args, &mut stdout).await
        }
        Commands::Options => {
            println!("Focus areas:");
            println!("{}", numbered_options(FocusArea::ALL.map(FocusArea::label)));
            println!("Budget ranges:");
            println!("{}", numbered_options(BudgetBand::ALL.map(BudgetBand::label)));
            Ok(())
        }
    };

    if let Err(err) = &result {
        tracing::error!(error = %err, "landscape-report exited with an error");
    }
    tracing::info!("Shutdown complete");
    telemetry_guard.shutdown();

    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
