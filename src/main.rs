use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passport_revoke::cli::Cli;
use passport_revoke::command::{Outcome, RevokeCommand};
use passport_revoke::config::{self, Config, LogFormat};
use passport_revoke::errors;
use passport_revoke::progress::TerminalReporter;
use passport_revoke::prompt::TerminalPrompt;
use passport_revoke::store::PgStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cfg.log_format);

    match run(&cfg, &args).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(errors::exit_code(&e))
        }
    }
}

/// Logs go to stderr; stdout carries the prompt, status lines and progress bar.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "passport_revoke=info,revoke_tokens=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(cfg: &Config, args: &Cli) -> anyhow::Result<Outcome> {
    tracing::debug!(table = %cfg.table, "connecting to database");
    let store = PgStore::connect(cfg)
        .await
        .context("failed to connect to the token database")?;

    let mut command = RevokeCommand::new(
        &store,
        TerminalPrompt::stdio(),
        TerminalReporter::stdout(),
    );
    let outcome = command.run(&args.request()).await?;
    Ok(outcome)
}
