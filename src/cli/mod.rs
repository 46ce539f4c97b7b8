//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions. One-shot
//! commands work on the fields saved by the previous run.

pub mod config;
pub mod location;
pub mod search;
pub mod serve;

use crate::config::Config;
use crate::error::Result;
use crate::fields::file::FileFields;
use crate::geo::nominatim::NominatimBackend;
use crate::geo::{get_geocoder, DeviceSource};
use crate::map::headless::{HeadlessMap, MapEvents};
use crate::picker::{LocationController, PickerOptions};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Pick a location by coordinates, search or device position
#[derive(Parser)]
#[command(name = "loc-picker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the saved location
    Get(location::GetArgs),

    /// Set the location from coordinates
    Set(location::SetArgs),

    /// Simulate a map click at a coordinate
    Click(location::ClickArgs),

    /// Clear the saved location
    Clear,

    /// Use the current device location
    Here(location::OutputArgs),

    /// Search for a place and optionally select a result
    Search(search::SearchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),
}

/// Controller used by one-shot commands
pub type CliPicker = LocationController<HeadlessMap, NominatimBackend, FileFields, DeviceSource>;

/// Build a controller over the saved fields
pub fn build_picker(config: &Config) -> Result<(CliPicker, MapEvents)> {
    let (map, events) = HeadlessMap::new();
    let picker = LocationController::new(
        PickerOptions::from(config),
        map,
        get_geocoder(config)?,
        FileFields::load()?,
        DeviceSource::from_config(config),
    );
    Ok((picker, events))
}

/// Initialize logging, honouring RUST_LOG when set
pub fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(match cli.command {
        Commands::Serve(_) => "info",
        _ => "warn",
    });

    match cli.command {
        Commands::Get(args) => location::get(args),
        Commands::Set(args) => location::set(args).await,
        Commands::Click(args) => location::click(args).await,
        Commands::Clear => location::clear(),
        Commands::Here(args) => location::here(args).await,
        Commands::Search(args) => search::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Serve(args) => serve::run(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_takes_no_address() {
        let cli = Cli::try_parse_from(["loc-picker", "click", "--lat", "24.7", "--lng", "-46.7"]).unwrap();
        match cli.command {
            Commands::Click(args) => {
                assert_eq!(args.lat, 24.7);
                assert_eq!(args.lng, -46.7);
            }
            _ => panic!("expected click command"),
        }

        let result = Cli::try_parse_from([
            "loc-picker", "click", "--lat", "24.7", "--lng", "46.7", "--address", "Riyadh",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_set_takes_address() {
        let cli = Cli::try_parse_from([
            "loc-picker", "set", "--lat", "24.7", "--lng", "46.7", "-a", "Riyadh",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Set(args) if args.address.as_deref() == Some("Riyadh")
        ));
    }
}
