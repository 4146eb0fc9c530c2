use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Text};
use tracing::debug;
use weather_core::{Config, QueryCoordinator, QueryState, coordinator_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and 7-day forecast for any city")]
pub struct Cli {
    /// Read settings from this file instead of the platform config path.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Defaults to `interactive` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prompt for city names until Esc or Ctrl-C.
    Interactive,

    /// Show weather for a single city and exit.
    Show {
        /// City name, e.g. "London" or "New York".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Print the config file location and effective settings.
    Config,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        debug!(?config, "configuration loaded");

        match self.command.unwrap_or(Command::Interactive) {
            Command::Config => {
                let path = match self.config {
                    Some(path) => path,
                    None => Config::config_file_path()?,
                };
                println!("# {}", path.display());
                print!("{}", config.to_toml()?);
            }
            Command::Show { city } => {
                let coordinator = coordinator_from_config(&config)?;
                let input = city.join(" ");
                match run_query(&coordinator, &input).await {
                    QueryState::Success(report) => println!("{}", render::report(&report)),
                    QueryState::Failure(kind) => return Err(anyhow!(kind.user_message())),
                    other => return Err(anyhow!("query ended in unexpected state {other:?}")),
                }
            }
            Command::Interactive => {
                let coordinator = coordinator_from_config(&config)?;
                interactive(&coordinator).await?;
            }
        }

        Ok(())
    }
}

async fn interactive(coordinator: &QueryCoordinator) -> anyhow::Result<()> {
    println!("{}", render::welcome());

    loop {
        let input = match Text::new("City:")
            .with_placeholder("Enter city name...")
            .with_help_message("Enter to search, Esc to quit")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city name"),
        };

        match run_query(coordinator, &input).await {
            QueryState::Success(report) => println!("{}", render::report(&report)),
            QueryState::Failure(kind) => println!("{}", render::failure(&kind)),
            QueryState::Idle | QueryState::Loading => {}
        }
        coordinator.reset();
    }

    Ok(())
}

/// Submit `input` and show the loading indicator while the query runs.
async fn run_query(coordinator: &QueryCoordinator, input: &str) -> QueryState {
    let mut states = coordinator.subscribe();
    let submit = coordinator.submit(input);
    tokio::pin!(submit);

    loop {
        tokio::select! {
            outcome = &mut submit => return outcome,
            Ok(()) = states.changed() => {
                if states.borrow_and_update().is_loading() {
                    eprintln!("{}", render::LOADING);
                }
            }
        }
    }
}
