//! CodeTutor CLI
//!
//! Classifies programming study questions through an OpenAI-compatible
//! inference service and browses the practice problem set.

use anyhow::Result;
use clap::Parser;
use codetutor_classifiers::{CancellationToken, RetryPolicy, TutorPipeline};
use codetutor_core::OpenAiChatClient;
use codetutor_practice::JsonFixtureRepository;
use std::sync::Arc;
use tokio::signal;
use tracing::{debug, warn};

mod cli;
mod commands;
mod config;

use cli::{Cli, Command, ProblemsCommand};
use commands::CommandOutput;
use config::TutorConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = TutorConfig::load(&cli)?;
    debug!("Configuration loaded from {}", cli.config.display());

    let output = match &cli.command {
        Command::Ask { query, no_retry } => {
            let pipeline = build_pipeline(&config)?;
            let policy = if *no_retry {
                RetryPolicy::none()
            } else {
                config.pipeline.retry.policy()
            };

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling in-flight request");
                    on_interrupt.cancel();
                }
            });

            commands::ask(&pipeline, query, &policy, &cancel).await
        }
        Command::Topics => commands::topics(&build_pipeline(&config)?),
        Command::Check { query } => commands::check(&build_pipeline(&config)?, query),
        Command::Problems { command } => {
            let repo = JsonFixtureRepository::open(&config.practice.data_dir)?;
            match command {
                ProblemsCommand::List { topic } => commands::list_problems(&repo, topic.as_deref()),
                ProblemsCommand::Show { id } => commands::show_problem(&repo, id),
                ProblemsCommand::Scaffold { id, language } => {
                    commands::show_scaffold(&repo, id, language)
                }
            }
        }
    };

    print_output(&output)?;
    if !output.success {
        std::process::exit(1);
    }

    Ok(())
}

fn build_pipeline(config: &TutorConfig) -> Result<TutorPipeline> {
    let client = OpenAiChatClient::new(config.pipeline.inference.client_settings())?;
    let pipeline = TutorPipeline::from_config(&config.pipeline, Arc::new(client))?;
    Ok(pipeline)
}

fn print_output(output: &CommandOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&output.body)?);
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("codetutor=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("codetutor=warn"))
    };

    // stdout is reserved for the JSON result
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
