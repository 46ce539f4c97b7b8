//! Search command handler
//!
//! Runs one forward search and either lists the candidates or selects one.

use crate::cli::build_picker;
use crate::cli::location::{finish, OutputArgs};
use crate::config::Config;
use crate::constants::notice::NO_RESULTS;
use crate::error::{Error, Result};
use crate::picker::search::SearchResults;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place name or address to search for
    pub query: String,

    /// Select the Nth result (1-based) as the location
    #[arg(long, short = 's')]
    pub select: Option<usize>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    if !config.search.enabled {
        return Err(Error::Config(
            "Search is disabled (set search.enabled = true)".to_string(),
        ));
    }

    let (picker, _events) = build_picker(&config)?;
    let task = picker.search_input(&args.query)?.ok_or_else(|| {
        Error::Config(format!(
            "Search text must be at least {} characters",
            config.search.min_query_len
        ))
    })?;
    task.finished().await;

    let results = picker.search_results().unwrap_or(SearchResults::Hidden);

    let Some(index) = args.select else {
        print_results(&results, args.output.json)?;
        return Ok(());
    };

    let candidate = index
        .checked_sub(1)
        .and_then(|i| results.candidates().get(i))
        .ok_or_else(|| Error::Config(format!("No search result #{}", index)))?
        .clone();

    let lookup = picker.select_candidate(&candidate)?;
    finish(&picker, lookup, &config, &args.output).await
}

fn print_results(results: &SearchResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results.candidates())?);
        return Ok(());
    }

    if results.candidates().is_empty() {
        println!("{}", NO_RESULTS);
        return Ok(());
    }

    for (i, candidate) in results.candidates().iter().enumerate() {
        println!(
            "{:>2}. {}  ({:.6}, {:.6})",
            i + 1,
            candidate.display_name,
            candidate.lat,
            candidate.lng
        );
    }
    Ok(())
}
