use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Cli, Command};
use shared_config::AppConfig;
use shared_models::error::GENERIC_FAILURE_MESSAGE;

#[tokio::main]
async fn main() -> ExitCode {
    // Loading Env Vars
    dotenv().ok();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    debug!("Using API at {} and agenda at {}", config.api_base_url, config.agenda_api_url);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Command failed: {:#}", err);
            eprintln!("{}", GENERIC_FAILURE_MESSAGE);
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Calendar(cmd) => commands::calendar::run(cmd, config).await,
        Command::Dashboard { watch } => commands::dashboard::run(watch, config).await,
        Command::History { patient_id, filter, sort } => {
            commands::patient::history(&patient_id, &filter, &sort, config).await
        }
        Command::Annotate { patient_id, text } => commands::patient::annotate(&patient_id, &text, config).await,
        Command::Remind { patient_id } => commands::patient::remind(&patient_id, config).await,
        Command::Upload(cmd) => commands::upload::run(cmd, config).await,
        Command::Chat { message } => {
            info!("Opening staff chat");
            commands::chat::run(message, config).await
        }
    }
}
