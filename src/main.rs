mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use wetter_core::{Config, ThemeMode};
use wetter_weather::{
    CurrentConditions, FixedLocationProvider, JsonFileStore, NominatimGeocoder, Position,
    Preferences, RetryPolicy, SessionError, WeatherProvider, WeatherSession,
};

use crate::cli::{place_name, Cli, Command, SavedAction, ThemeArg};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    wetter_core::init(cli.verbose)?;

    let (config, _warnings) = match &cli.config {
        Some(path) => Config::load_validated_from(path)?,
        None => Config::load_validated()?,
    };
    tracing::debug!("Using config directory {}", config.config_dir.display());

    let session = build_session(&config, &cli.command)?;

    if let Err(e) = run(&session, &config, cli.command).await {
        tracing::debug!("Command failed: {}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

fn build_session(config: &Config, command: &Command) -> Result<WeatherSession> {
    let store = Arc::new(JsonFileStore::new(config.storage_path()));
    let weather =
        WeatherProvider::from_config(&config.weather).context("Failed to create weather client")?;
    let geocoder = NominatimGeocoder::new(config.location.geocode_url.as_str())
        .context("Failed to create geocoding client")?;

    let position = match command {
        Command::Here {
            lat: Some(lat),
            lon: Some(lon),
        } => Some(Position::new(*lat, *lon)),
        _ => config
            .location
            .latitude
            .zip(config.location.longitude)
            .map(|(lat, lon)| Position::new(lat, lon)),
    };

    let session = WeatherSession::new(
        weather,
        Arc::new(FixedLocationProvider::new(position)),
        Arc::new(geocoder),
        Preferences::new(store),
        config.ui.theme,
    )
    .with_retry_policy(RetryPolicy::from(&config.location));

    Ok(session)
}

async fn run(session: &WeatherSession, config: &Config, command: Command) -> Result<(), SessionError> {
    let units = config.weather.units.as_str();

    match command {
        Command::Search { place, save } => {
            let name = place_name(&place);
            let conditions = session.search(&name).await?;
            print_conditions(&conditions, &conditions.display_name(), units);
            if save {
                print_saved(&session.save(&conditions.display_name()).await?);
            }
        }
        Command::Here { .. } => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let located = session.use_my_location(&cancel).await?;
            print_conditions(&located.conditions, &located.display_name, units);
        }
        Command::Saved { action } => match action.unwrap_or(SavedAction::List) {
            SavedAction::List => print_saved(&session.saved().await),
            SavedAction::Add { place } => print_saved(&session.save(&place_name(&place)).await?),
            SavedAction::Remove { place } => {
                print_saved(&session.remove(&place_name(&place)).await?)
            }
            SavedAction::Open { place } => {
                let conditions = session.select_saved(&place_name(&place)).await?;
                print_conditions(&conditions, &conditions.display_name(), units);
            }
        },
        Command::Theme { mode } => {
            let theme = match mode {
                None => session.theme(),
                Some(ThemeArg::Toggle) => session.toggle_theme()?,
                Some(ThemeArg::Light) => set_theme(session, ThemeMode::Light)?,
                Some(ThemeArg::Dark) => set_theme(session, ThemeMode::Dark)?,
            };
            println!("{}", theme);
        }
    }

    Ok(())
}

fn set_theme(session: &WeatherSession, theme: ThemeMode) -> Result<ThemeMode, SessionError> {
    session.set_theme(theme)?;
    Ok(theme)
}

fn print_saved(saved: &[String]) {
    if saved.is_empty() {
        println!("No saved locations.");
        return;
    }
    for (i, name) in saved.iter().enumerate() {
        println!("{}. {}", i + 1, name);
    }
}

fn print_conditions(conditions: &CurrentConditions, name: &str, units: &str) {
    let (temp_unit, wind_unit) = match units {
        "imperial" => ("°F", "mph"),
        "standard" => ("K", "m/s"),
        _ => ("°C", "m/s"),
    };

    println!("{}", name);
    println!("  Temperature  {:.0}{}", conditions.temperature, temp_unit);
    println!("  Feels like   {:.0}{}", conditions.feels_like, temp_unit);
    println!(
        "  Min/Max      {:.0} / {:.0}{}",
        conditions.temp_min, conditions.temp_max, temp_unit
    );
    println!("  Humidity     {}%", conditions.humidity);
    println!("  Wind         {} {}", conditions.wind_speed, wind_unit);
    match &conditions.condition {
        Some(condition) if !condition.description.is_empty() => {
            println!("  Conditions   {}", condition.description)
        }
        Some(condition) => println!("  Conditions   {}", condition.category().description()),
        None => println!("  Conditions   -"),
    }
}
