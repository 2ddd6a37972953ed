//! subbrute - concurrent DNS subdomain enumeration
//!
//! Resolves every `{label}.{domain}` from a wordlist with a pool of workers
//! and prints the names that exist.

use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::process::ExitCode;
use subbrute::{app::App, cli::Cli, config::Config, outputs::print_banner, Error};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn report_startup_error(err: &Error) -> ExitCode {
    error!(error = %err, "Startup failed");
    let _ = writeln!(std::io::stderr().lock(), "{} {}", "[-]".red(), err.to_string().red());
    ExitCode::from(err.exit_code())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with 2 and --help with 0, both handled by clap.
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            init_tracing("warn");
            return report_startup_error(&err);
        }
    };

    init_tracing(&config.log_level);
    info!(?config, "subbrute starting up...");

    let record_type = match config.record_type() {
        Ok(record_type) => record_type,
        Err(err) => return report_startup_error(&err),
    };
    print_banner(&cli.domain, &cli.wordlist, config.concurrency, record_type);

    let app = match App::builder(config, cli.domain.clone())
        .wordlist(cli.wordlist.clone())
        .build()
    {
        Ok(app) => app,
        Err(err) => return report_startup_error(&err),
    };

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            // Without a signal handler the scan simply runs to completion.
            std::future::pending::<()>().await;
        }
    };

    let report = app.run(interrupt).await;
    info!(
        found = report.found(),
        interrupted = report.interrupted,
        "Exiting."
    );
    ExitCode::SUCCESS
}
