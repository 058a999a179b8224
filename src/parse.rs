use clap::Parser;
use fossil_finder::record::Coordinates;
use fossil_finder::search::{DEFAULT_API_BASE, SearchQuery, TaxonGroup, search_taxon};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fossil-finder")]
#[command(about = "Search the Paleobiology Database and map the fossil finds")]
#[command(version = "0.1")]
pub(crate) struct Args {
    /// Taxon to search for; PBDB wildcards like "Stegosaur%" work
    #[arg(short, long)]
    pub taxon: Option<String>,

    /// Preset taxon group, used when no taxon is given
    #[arg(short, long, value_enum)]
    pub group: Option<TaxonGroup>,

    /// Latitude of the search centre
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the search centre
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Width of the search box around the centre, in degrees
    #[arg(short, long, default_value = "1")]
    pub degrees: u32,

    /// Base URL of the PBDB data service
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Read occurrences from a saved JSON response instead of the network
    #[arg(long)]
    pub occurrences_file: Option<PathBuf>,

    /// Read the time scale from a saved JSON response instead of the network
    #[arg(long)]
    pub intervals_file: Option<PathBuf>,

    /// Base delay between retries in milliseconds
    #[arg(long, default_value = "500")]
    pub delay: u64,

    /// Maximum number of retry attempts
    #[arg(short, long, default_value = "3")]
    pub retries: u32,

    /// Output CSV filename
    #[arg(short, long, default_value = "fossils.csv")]
    pub output: String,

    /// Output JSON filename for map markers
    #[arg(short, long, default_value = "markers.json")]
    pub markers: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn search_query(&self) -> SearchQuery {
        let center = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        };
        SearchQuery::new(
            search_taxon(self.taxon.as_deref(), self.group),
            center,
            self.degrees,
        )
    }
}
