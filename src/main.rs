//! StudyBuddy - Main CLI Entry Point

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use studybuddy::app::{Companion, CompanionConfig};
use studybuddy::cli::{Args, Commands, Verbosity};
use studybuddy::config::Config;
use studybuddy::repl;
use studybuddy::service::OllamaService;
use studybuddy::session::SessionConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    if let Some(Commands::Config) = args.command {
        println!("config file: {}", Config::config_path()?.display());
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    // CLI flags override the config file
    let base_url = args.resolve_base_url(&config.service.base_url);
    let model = args.resolve_model(&config.service.model);

    let service = OllamaService::with_config(&base_url, &model)?;

    if !service.health_check().await {
        eprintln!(
            "{}",
            format!(
                "Ollama is not reachable at {}. Start it with: ollama serve",
                base_url
            )
            .red()
        );
        std::process::exit(1);
    }

    let companion = Companion::new(
        Arc::new(service),
        CompanionConfig {
            verbose: args.verbosity() == Verbosity::Verbose,
            session: SessionConfig {
                max_context_messages: config.chat.max_context_messages,
            },
        },
    );

    repl::run(companion).await
}
