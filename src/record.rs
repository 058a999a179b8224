use crate::error::SearchError;
use serde::{Deserialize, Deserializer, Serialize};

/// One occurrence as it comes off the PBDB `occs/list.json` feed.
///
/// Field names follow the compact vocabulary of the feed. Everything apart
/// from the coordinates may be missing, and the coordinates themselves are
/// only trusted after normalization has checked them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOccurrence {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lng: Option<f64>,
    #[serde(rename = "tna", default)]
    pub taxon_name: Option<String>,
    #[serde(rename = "phl", default)]
    pub phylum: Option<String>,
    #[serde(rename = "cll", default)]
    pub class: Option<String>,
    #[serde(rename = "odl", default)]
    pub order: Option<String>,
    #[serde(rename = "fml", default)]
    pub family: Option<String>,
    #[serde(rename = "gnl", default)]
    pub genus: Option<String>,
    #[serde(rename = "cc2", default)]
    pub country_code: Option<String>,
    #[serde(rename = "stp", default)]
    pub state: Option<String>,
    #[serde(rename = "cny", default)]
    pub county: Option<String>,
    #[serde(rename = "oei", default)]
    pub interval_name: Option<String>,
    #[serde(rename = "env", default)]
    pub paleoenvironment: Option<String>,
    #[serde(rename = "eag", default, deserialize_with = "lenient_f64")]
    pub max_ma: Option<f64>,
    #[serde(rename = "lag", default, deserialize_with = "lenient_f64")]
    pub min_ma: Option<f64>,
    #[serde(rename = "ggc", default)]
    pub geocomments: Option<String>,
}

/// Top-level body of an occurrence search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OccurrenceResponse {
    #[serde(default)]
    pub records: Vec<RawOccurrence>,
    #[serde(default)]
    pub records_found: Option<u64>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    /// Bad request parameters come back here with an HTTP 400.
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

/// A search that came back clean, ready for normalization.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceBatch {
    pub records: Vec<RawOccurrence>,
    pub records_found: Option<u64>,
}

impl OccurrenceResponse {
    pub fn from_json(body: &str) -> Result<Self, SearchError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Splits off the records, or fails with the first upstream warning.
    pub fn into_batch(self) -> Result<OccurrenceBatch, SearchError> {
        if let Some(warnings) = self.warnings.or(self.errors) {
            let warning = warnings
                .into_iter()
                .next()
                .unwrap_or_else(|| "The search returned a warning".to_string());
            return Err(SearchError::UpstreamWarning(warning));
        }

        let records_found = self.records_found.or(Some(self.records.len() as u64));
        Ok(OccurrenceBatch {
            records: self.records,
            records_found,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The five taxonomic ranks recorded for a find, any of which may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Taxonomy {
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
}

/// A display-ready fossil find.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fossil {
    pub name: String,
    pub taxonomy: Taxonomy,
    pub location: String,
    pub age: String,
    pub coordinates: Coordinates,
    pub paleoenvironment: Option<String>,
    pub geocomments: Option<String>,
}

/// Flat view of a [`Fossil`] for CSV output, which cannot nest structs.
#[derive(Debug, Serialize)]
pub struct FossilRow<'a> {
    pub name: &'a str,
    pub lat: f64,
    pub lng: f64,
    pub location: &'a str,
    pub age: &'a str,
    pub phylum: Option<&'a str>,
    pub class: Option<&'a str>,
    pub order: Option<&'a str>,
    pub family: Option<&'a str>,
    pub genus: Option<&'a str>,
    pub paleoenvironment: Option<&'a str>,
    pub geocomments: Option<&'a str>,
}

impl<'a> From<&'a Fossil> for FossilRow<'a> {
    fn from(fossil: &'a Fossil) -> Self {
        let taxonomy = &fossil.taxonomy;
        Self {
            name: &fossil.name,
            lat: fossil.coordinates.lat,
            lng: fossil.coordinates.lng,
            location: &fossil.location,
            age: &fossil.age,
            phylum: taxonomy.phylum.as_deref(),
            class: taxonomy.class.as_deref(),
            order: taxonomy.order.as_deref(),
            family: taxonomy.family.as_deref(),
            genus: taxonomy.genus.as_deref(),
            paleoenvironment: fossil.paleoenvironment.as_deref(),
            geocomments: fossil.geocomments.as_deref(),
        }
    }
}

/// Accepts a JSON number or a numeric string. Anything else reads as absent.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(value)) => Some(value),
        Some(NumberOrText::Text(text)) => text.trim().parse::<f64>().ok(),
        Some(NumberOrText::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_occurrence_short_codes() {
        let json = r#"{
            "oid": "occ:1001", "lat": "45.9", "lng": -104.5,
            "tna": "Triceratops horridus", "phl": "Chordata", "cll": "Ornithischia",
            "fml": "Ceratopsidae", "gnl": "Triceratops", "cc2": "US",
            "stp": "Montana", "cny": "Carter", "oei": "Maastrichtian",
            "eag": 70.6, "lag": "66.0", "ggc": "Hell Creek"
        }"#;
        let raw: RawOccurrence = serde_json::from_str(json).unwrap();

        assert_eq!(raw.lat, Some(45.9));
        assert_eq!(raw.lng, Some(-104.5));
        assert_eq!(raw.taxon_name.as_deref(), Some("Triceratops horridus"));
        assert_eq!(raw.class.as_deref(), Some("Ornithischia"));
        assert_eq!(raw.order, None);
        assert_eq!(raw.country_code.as_deref(), Some("US"));
        assert_eq!(raw.max_ma, Some(70.6));
        assert_eq!(raw.min_ma, Some(66.0));
        assert_eq!(raw.paleoenvironment, None);
        assert_eq!(raw.geocomments.as_deref(), Some("Hell Creek"));
    }

    #[test]
    fn test_unparseable_coordinate_reads_as_absent() {
        let raw: RawOccurrence = serde_json::from_str(r#"{"lat": "north", "lng": null}"#).unwrap();
        assert_eq!(raw.lat, None);
        assert_eq!(raw.lng, None);
    }

    #[test]
    fn test_warning_response_aborts() {
        let body = r#"{"warnings": ["The name 'tircratops' is not known to this database"]}"#;
        let err = OccurrenceResponse::from_json(body)
            .unwrap()
            .into_batch()
            .unwrap_err();

        assert!(err.is_upstream_warning());
        assert_eq!(
            err.to_string(),
            "The name 'tircratops' is not known to this database"
        );
    }

    #[test]
    fn test_error_response_aborts() {
        let body = r#"{"errors": ["bad value 'x' for 'latmin'"]}"#;
        let err = OccurrenceResponse::from_json(body)
            .unwrap()
            .into_batch()
            .unwrap_err();
        assert_eq!(err.to_string(), "bad value 'x' for 'latmin'");
    }

    #[test]
    fn test_clean_response_into_batch() {
        let body = r#"{"records_found": 2, "records": [{"lat": 1.0, "lng": 2.0}, {"lat": 3.0, "lng": 4.0}]}"#;
        let batch = OccurrenceResponse::from_json(body)
            .unwrap()
            .into_batch()
            .unwrap();

        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records_found, Some(2));
    }

    #[test]
    fn test_fossil_row_flattens_taxonomy() {
        let fossil = Fossil {
            name: "Stegosaurus".to_string(),
            taxonomy: Taxonomy {
                class: Some("Ornithischia".to_string()),
                genus: Some("Stegosaurus".to_string()),
                ..Taxonomy::default()
            },
            location: "Colorado".to_string(),
            age: "Geologic age unknown".to_string(),
            coordinates: Coordinates::new(39.0, -105.0),
            paleoenvironment: None,
            geocomments: None,
        };
        let row = FossilRow::from(&fossil);

        assert_eq!(row.class, Some("Ornithischia"));
        assert_eq!(row.phylum, None);
        assert_eq!(row.lat, 39.0);
    }
}
