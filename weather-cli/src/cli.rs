use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use std::io::Stdout;
use weather_core::{
    Config, JsonFileStore, ProviderId, WeatherService,
    provider::default_provider_from_config,
};

use crate::menu;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive menu: register, log in and view weather (default).
    Menu,

    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "accuweather" or "weatherstack".
        provider: String,

        /// Also make this the active provider.
        #[arg(long)]
        default: bool,
    },

    /// Show current conditions for any location without logging in.
    Peek {
        /// Location name, e.g. "paris".
        location: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Menu) {
            Command::Menu => {
                let config = Config::load()?;
                let store_path = config.store_file_path()?;
                tracing::debug!(path = %store_path.display(), "using user store");

                let store = JsonFileStore::new(store_path);
                let mut weather = weather_service(&config)?;
                menu::run(&store, &mut weather).await
            }
            Command::Configure { provider, default } => configure(&provider, default),
            Command::Peek { location } => {
                let config = Config::load()?;
                let mut weather = weather_service(&config)?;
                weather.show_other_location(&location).await?;
                Ok(())
            }
        }
    }
}

/// The active provider is chosen once here and fixed for the whole session.
fn weather_service(config: &Config) -> anyhow::Result<WeatherService<Stdout>> {
    let source = default_provider_from_config(config)?;
    Ok(WeatherService::stdout(source))
}

fn configure(provider: &str, make_default: bool) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .with_help_message(&format!("Stored in {}", Config::config_file_path()?.display()))
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    if make_default {
        config.set_default_provider(id);
    }
    config.save()?;

    tracing::info!(provider = %id, "provider configured");
    println!("Configured provider: {id}");
    Ok(())
}
