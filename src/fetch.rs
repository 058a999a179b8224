use crate::error::SearchError;
use crate::record::{OccurrenceBatch, OccurrenceResponse};
use crate::search::{DEFAULT_API_BASE, SearchQuery, time_scale_url};
use crate::timescale::GeoTimeTable;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rand::Rng;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;

/// Client for the Paleobiology Database data service.
pub struct PaleoDbClient {
    client: Client,
    pub(crate) api_base: String,
    pub(crate) base_delay: Duration,
    pub(crate) max_retries: u32,
}

impl PaleoDbClient {
    pub fn new() -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            base_delay: Duration::from_millis(500),
            max_retries: 3,
        })
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.base_delay = Duration::from_millis(delay_ms);
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Exponential backoff with up to one base delay of jitter.
    pub(crate) fn backoff_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let jitter = if base_ms > 0 {
            rand::rng().random_range(0..base_ms)
        } else {
            0
        };
        Duration::from_millis(2_u64.saturating_pow(attempt).saturating_mul(base_ms) + jitter)
    }

    /// Fetch a body, retrying rate limits, server errors and transport failures.
    async fn get_text(&self, url: &str) -> Result<String, SearchError> {
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.backoff_delay(attempt);
                info!(
                    "Retrying {} (attempt {}) after {}ms delay",
                    url,
                    attempt + 1,
                    delay.as_millis()
                );
                sleep(delay).await;
            }

            match self.client.get(url).send().await {
                Ok(response) => match response.status().as_u16() {
                    200..=299 => return Ok(response.text().await?),
                    status @ (429 | 500..=599) => {
                        warn!("HTTP {} from {}", status, url);
                        continue;
                    }
                    // The data service reports bad parameters in a JSON body.
                    400 => return Ok(response.text().await?),
                    status => {
                        error!("HTTP {} from {}, not retrying", status, url);
                        return Err(SearchError::Status {
                            status,
                            url: url.to_string(),
                        });
                    }
                },
                Err(e) => {
                    if attempt < self.max_retries {
                        warn!("Request to {} failed, retrying...: {}", url, e);
                        continue;
                    }
                    error!("Request to {} failed, max retries reached: {}", url, e);
                    return Err(e.into());
                }
            }
        }

        Err(SearchError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.max_retries + 1,
        })
    }

    async fn get_with_spinner(&self, url: &str, message: &'static str) -> Result<String, SearchError> {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} [{elapsed_precise}] {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = self.get_text(url).await;
        spinner.finish_and_clear();
        result
    }

    pub async fn fetch_time_scale(&self) -> Result<GeoTimeTable, SearchError> {
        let url = time_scale_url(&self.api_base);
        debug!("Fetching time scale from {}", url);
        let body = self.get_with_spinner(&url, "Downloading time scale").await?;
        let table = GeoTimeTable::from_json(&body)?;
        info!("Loaded {} geologic intervals", table.len());
        Ok(table)
    }

    pub async fn fetch_occurrences(&self, query: &SearchQuery) -> Result<OccurrenceBatch, SearchError> {
        let url = query.occurrence_url(&self.api_base);
        info!("Searching {}", url);
        let body = self.get_with_spinner(&url, "Searching occurrences").await?;
        OccurrenceResponse::from_json(&body)?.into_batch()
    }
}

pub fn load_time_scale_file(path: &Path) -> Result<GeoTimeTable, SearchError> {
    let body = std::fs::read_to_string(path)?;
    let table = GeoTimeTable::from_json(&body)?;
    info!("Loaded {} geologic intervals from {}", table.len(), path.display());
    Ok(table)
}

pub fn load_occurrences_file(path: &Path) -> Result<OccurrenceBatch, SearchError> {
    let body = std::fs::read_to_string(path)?;
    info!("Reading occurrences from {}", path.display());
    OccurrenceResponse::from_json(&body)?.into_batch()
}
