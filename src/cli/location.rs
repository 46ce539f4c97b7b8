//! Location command handlers
//!
//! get, set, click, clear and here. Commands that move the selection wait
//! for the reverse lookup so the saved address matches the coordinate.

use crate::cli::{build_picker, CliPicker};
use crate::config::Config;
use crate::coord::field::format_component;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::picker::selection::LocationSnapshot;
use crate::picker::ReverseLookup;
use clap::Args;

/// Output options shared by location commands
#[derive(Args)]
pub struct OutputArgs {
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Also print a map link using this URL provider
    #[arg(long)]
    pub link: Option<String>,
}

/// Get command arguments
#[derive(Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Set command arguments
#[derive(Args)]
pub struct SetArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Address text (replaced by the reverse-geocoded address when found)
    #[arg(long, short = 'a')]
    pub address: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Click command arguments
#[derive(Args)]
pub struct ClickArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the get command
pub fn get(args: GetArgs) -> Result<()> {
    let config = Config::load()?;
    let (picker, _events) = build_picker(&config)?;
    print_location(&picker.get_location(), &config, &args.output)
}

/// Run the set command
pub async fn set(args: SetArgs) -> Result<()> {
    let config = Config::load()?;
    let (picker, _events) = build_picker(&config)?;

    let lookup = picker.set_location(args.lat, args.lng, args.address.as_deref())?;
    finish(&picker, lookup, &config, &args.output).await
}

/// Run the click command
///
/// Goes through the map's event stream like a real click would.
pub async fn click(args: ClickArgs) -> Result<()> {
    let config = Config::load()?;
    let (picker, mut events) = build_picker(&config)?;

    picker.map().click(Coordinates::new(args.lat, args.lng));
    let event = events
        .recv()
        .await
        .ok_or_else(|| Error::Server("Map event stream closed".to_string()))?;

    let lookup = picker.handle_map_event(event).await?;
    finish(&picker, lookup, &config, &args.output).await
}

/// Run the clear command
pub fn clear() -> Result<()> {
    let config = Config::load()?;
    let (picker, _events) = build_picker(&config)?;

    picker.clear_location();
    picker.fields().save()?;
    println!("Location cleared");
    Ok(())
}

/// Run the here command
pub async fn here(args: OutputArgs) -> Result<()> {
    let config = Config::load()?;
    let (picker, _events) = build_picker(&config)?;

    let lookup = picker.request_current_device_location().await?;
    finish(&picker, lookup, &config, &args).await
}

/// Wait for the reverse lookup, save the fields and print the result
pub(crate) async fn finish(
    picker: &CliPicker,
    lookup: ReverseLookup,
    config: &Config,
    output: &OutputArgs,
) -> Result<()> {
    if !lookup.finished().await {
        eprintln!("No address found, keeping previous address");
    }
    picker.fields().save()?;
    print_location(&picker.get_location(), config, output)
}

/// Print a location snapshot
pub(crate) fn print_location(
    snapshot: &LocationSnapshot,
    config: &Config,
    output: &OutputArgs,
) -> Result<()> {
    let link = match (snapshot.coordinates(), &output.link) {
        (Some(c), Some(provider)) => {
            Some(config.format_url(Some(provider), c.lat, c.lng, config.map.focus_zoom)?)
        }
        _ => None,
    };

    if output.json {
        let mut value = serde_json::to_value(snapshot)?;
        if let Some(link) = &link {
            value["link"] = serde_json::Value::String(link.clone());
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match snapshot.coordinates() {
        Some(c) => {
            println!("Latitude:  {}", format_component(c.lat));
            println!("Longitude: {}", format_component(c.lng));
            if !snapshot.address.is_empty() {
                println!("Address:   {}", snapshot.address);
            }
            if let Some(link) = link {
                println!("Map:       {}", link);
            }
        }
        None => println!("No location selected"),
    }
    Ok(())
}
