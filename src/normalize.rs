use crate::age::resolve_age;
use crate::location::{resolve_location, resolve_nation};
use crate::record::{Coordinates, Fossil, OccurrenceBatch, RawOccurrence};
use crate::taxonomy::{resolve_display_name, resolve_taxonomy};
use crate::timescale::GeoTimeTable;
use log::{debug, error, info};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("record {index} has no usable coordinates (lat={lat:?}, lng={lng:?})")]
    MalformedCoordinate {
        index: usize,
        lat: Option<f64>,
        lng: Option<f64>,
    },
}

fn coordinates(index: usize, raw: &RawOccurrence) -> Result<Coordinates, NormalizeError> {
    match (raw.lat, raw.lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
            Ok(Coordinates::new(lat, lng))
        }
        (lat, lng) => Err(NormalizeError::MalformedCoordinate { index, lat, lng }),
    }
}

/// Builds one [`Fossil`] from one raw record. `index` is only used to
/// identify the record in errors.
pub fn normalize_record(
    index: usize,
    raw: &RawOccurrence,
    table: &GeoTimeTable,
) -> Result<Fossil, NormalizeError> {
    let coordinates = coordinates(index, raw)?;
    let taxonomy = resolve_taxonomy(raw);
    let name = resolve_display_name(raw.taxon_name.as_deref(), &taxonomy);
    let nation = resolve_nation(raw.country_code.as_deref());
    let location = resolve_location(
        nation.as_deref(),
        raw.state.as_deref(),
        raw.county.as_deref(),
        raw.geocomments.as_deref(),
    );
    let age = resolve_age(raw.interval_name.as_deref(), raw.max_ma, raw.min_ma, table);

    Ok(Fossil {
        name,
        taxonomy,
        location,
        age,
        coordinates,
        paleoenvironment: raw.paleoenvironment.clone(),
        geocomments: raw.geocomments.clone(),
    })
}

/// Normalizes every record in input order. Records without coordinates are
/// logged and left out; nothing else can fail.
pub fn normalize_batch(raws: &[RawOccurrence], table: &GeoTimeTable) -> Vec<Fossil> {
    let fossils: Vec<Fossil> = raws
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match normalize_record(index, raw, table) {
            Ok(fossil) => Some(fossil),
            Err(e) => {
                error!("Skipping occurrence: {}", e);
                None
            }
        })
        .collect();

    debug!("Normalized {} of {} occurrences", fossils.len(), raws.len());
    fossils
}

/// The fossils of the current search, owned by whoever runs the search.
///
/// Nothing is merged across searches: loading a new batch throws the old one
/// away first, so identical finds from two searches are never deduplicated.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    fossils: Vec<Fossil>,
    records_found: Option<u64>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.fossils.clear();
        self.records_found = None;
    }

    /// Replaces the current results with the normalized `batch`.
    pub fn load(&mut self, batch: &OccurrenceBatch, table: &GeoTimeTable) -> usize {
        self.clear();
        self.fossils = normalize_batch(&batch.records, table);
        self.records_found = batch.records_found;
        info!(
            "Loaded {} fossils ({} records found upstream)",
            self.fossils.len(),
            self.records_found.unwrap_or_default()
        );
        self.fossils.len()
    }

    pub fn fossils(&self) -> &[Fossil] {
        &self.fossils
    }

    pub fn records_found(&self) -> Option<u64> {
        self.records_found
    }

    pub fn len(&self) -> usize {
        self.fossils.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fossils.is_empty()
    }
}
