use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode};
use std::{path::PathBuf, sync::Arc};
use weatherdash_core::{Config, Dashboard, FetchState};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdash", version, about = "Weather dashboard")]
pub struct Cli {
    /// Directory for persisted recent searches (overrides the config file).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city and record it in recent searches.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,
    },

    /// List recent searches, most recent first.
    Recent,

    /// Interactive dashboard (default).
    Dashboard,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Dashboard) {
            Command::Configure => configure(),
            Command::Show { city } => show(&settings(self.data_dir)?, &city).await,
            Command::Recent => {
                let store = settings(self.data_dir)?.recent_store()?;
                print!("{}", render::recent_list(&store.load()));
                Ok(())
            }
            Command::Dashboard => interactive::run(&settings(self.data_dir)?).await,
        }
    }
}

/// Config from disk with command-line overrides applied.
fn settings(data_dir: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if data_dir.is_some() {
        config.data_dir = data_dir;
    }
    Ok(config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if config.api_key.is_some() {
        let replace = Confirm::new("An API key is already configured. Replace it?")
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
        if !replace {
            return Ok(());
        }
    }

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_validator(inquire::required!("An API key is required"))
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(config: &Config, city: &str) -> anyhow::Result<()> {
    let mut dash = Dashboard::new(Arc::new(config.build_provider()), config.recent_store()?);

    dash.search(city).await;

    match dash.fetch_state() {
        FetchState::Success(snapshot) => {
            print!("{}", render::snapshot_card(snapshot));
            Ok(())
        }
        FetchState::Failed(err) => bail!(err.user_message()),
        FetchState::Idle | FetchState::Loading => bail!("City name must not be empty"),
    }
}
