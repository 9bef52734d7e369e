mod args;
mod commands;
mod session;

use std::io::{self, Write as _};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::args::Cli;
use crate::session::AdsiSession;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(&cli);
    tracing::debug!(command = ?cli.command, "starting");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = ?err, "command failed");
            eprintln!("error: {err:#}");
            if let Some(hint) = session::hint(&err) {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let session = AdsiSession::connect(cli.server.as_deref(), cli.credentials())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(&session, &cli.command, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Logs to stderr, plus a daily file under `--log-dir` when given.
///
/// `RUST_LOG` overrides the `-v` level. The returned guard flushes the
/// file writer on drop.
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let stderr = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(filter());

    let (file, guard) = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "adsi.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(stderr).with(file).init();
    guard
}
