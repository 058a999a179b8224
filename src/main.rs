mod parse;

use crate::parse::Args;
use clap::Parser;
use fossil_finder::error::SearchError;
use fossil_finder::export::{MapDocument, save_map_json, save_to_csv};
use fossil_finder::fetch::{PaleoDbClient, load_occurrences_file, load_time_scale_file};
use fossil_finder::marker::{MapView, build_markers};
use fossil_finder::normalize::ResultSet;
use fossil_finder::record::{Fossil, OccurrenceBatch};
use fossil_finder::search::SearchQuery;
use fossil_finder::timescale::GeoTimeTable;
use fossil_finder::util::print_hms;
use log::{info, warn};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// Most common values first, ties broken alphabetically.
pub fn top_counts<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(&'a str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    sorted.truncate(limit);
    sorted
}

pub fn print_summary(results: &ResultSet) {
    if results.is_empty() {
        println!("No fossils to summarize");
        return;
    }

    let fossils: &[Fossil] = results.fossils();
    println!("\nSummary:");
    if let Some(found) = results.records_found() {
        println!("Records found: {}", found);
    }
    println!("Fossils mapped: {}", fossils.len());

    let unique_names: HashSet<&str> = fossils.iter().map(|f| f.name.as_str()).collect();
    println!("Distinct names: {}", unique_names.len());

    println!("Top locations:");
    for (location, count) in top_counts(fossils.iter().map(|f| f.location.as_str()), 3) {
        println!("  {}: {}", location, count);
    }
}

async fn load_time_scale(args: &Args, client: &PaleoDbClient) -> Result<GeoTimeTable, SearchError> {
    match &args.intervals_file {
        Some(path) => load_time_scale_file(path),
        None => client.fetch_time_scale().await,
    }
}

async fn load_occurrences(
    args: &Args,
    client: &PaleoDbClient,
    query: &SearchQuery,
) -> Result<OccurrenceBatch, SearchError> {
    match &args.occurrences_file {
        Some(path) => load_occurrences_file(path),
        None => client.fetch_occurrences(query).await,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::try_parse()?;
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let query = args.search_query();
    let client = PaleoDbClient::new()?
        .with_api_base(&args.api_base)
        .with_delay(args.delay)
        .with_max_retries(args.retries);

    let start = Instant::now();
    let (table, batch) = match futures::try_join!(
        load_time_scale(&args, &client),
        load_occurrences(&args, &client, &query)
    ) {
        Ok(loaded) => loaded,
        Err(SearchError::UpstreamWarning(warning)) => {
            warn!("Search aborted by upstream warning: {}", warning);
            eprintln!("{}. Please try again.", warning);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut results = ResultSet::new();
    results.load(&batch, &table);
    print_hms(&start);

    let view = MapView::for_search(&query, results.fossils());
    let markers = match &view {
        Some(view) => view.markers(results.fossils()),
        None => build_markers(results.fossils()),
    };
    info!("Built {} map markers", markers.len());

    save_to_csv(results.fossils(), &args.output)?;
    save_map_json(
        &MapDocument {
            search_term: query.taxon.as_deref(),
            records_found: results.records_found(),
            view: view.as_ref(),
            markers: &markers,
        },
        &args.markers,
    )?;

    print_summary(&results);

    Ok(())
}
