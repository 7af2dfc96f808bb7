//! Command-line argument parsing for StudyBuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};

/// StudyBuddy - Personalized learning-plan companion
#[derive(Parser, Debug)]
#[command(name = "studybuddy")]
#[command(version = "0.1.0")]
#[command(about = "Build a personalized learning plan and chat about it", long_about = None)]
pub struct Args {
    /// Ollama host (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Ollama port (overrides the config file)
    #[arg(long)]
    pub port: Option<u16>,

    /// Ollama model to use (overrides the config file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Verbosity level: default (normal), -v (verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress diagnostics)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display current configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose > 0 {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Base URL for the Ollama endpoint
    ///
    /// An explicit --host or --port always wins, even when it matches the
    /// built-in defaults; the config file value applies only when neither
    /// flag is given.
    pub fn resolve_base_url(&self, config_url: &str) -> String {
        if self.host.is_none() && self.port.is_none() {
            return config_url.to_string();
        }

        format!(
            "http://{}:{}",
            self.host.as_deref().unwrap_or("127.0.0.1"),
            self.port.unwrap_or(11434)
        )
    }

    /// Model name, preferring the --model flag over the config file
    pub fn resolve_model(&self, config_model: &str) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| config_model.to_string())
    }
}
