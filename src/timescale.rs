//! Reference table of named geologic intervals.
//!
//! The table is decoded once from the PBDB `intervals/list.json` feed and is
//! read-only afterwards. A parent index keyed by interval number is built at
//! load time so that walking from a period up to its era is a map lookup.

use crate::error::SearchError;
use crate::record::lenient_f64;
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Level of an interval in the time scale. Smaller is coarser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScaleLevel {
    Eon = 1,
    Era = 2,
    Period = 3,
    Epoch = 4,
    Age = 5,
}

impl ScaleLevel {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(ScaleLevel::Eon),
            2 => Some(ScaleLevel::Era),
            3 => Some(ScaleLevel::Period),
            4 => Some(ScaleLevel::Epoch),
            5 => Some(ScaleLevel::Age),
            _ => None,
        }
    }

    pub fn division_word(self) -> &'static str {
        match self {
            ScaleLevel::Eon => "eon",
            ScaleLevel::Era => "era",
            ScaleLevel::Period => "period",
            ScaleLevel::Epoch => "epoch",
            ScaleLevel::Age => "age",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoTimeInterval {
    #[serde(rename = "oid", alias = "interval_no", deserialize_with = "interval_id")]
    pub id: u64,
    #[serde(rename = "lvl", alias = "scale_level")]
    pub scale_level: u8,
    #[serde(rename = "nam", alias = "interval_name")]
    pub name: String,
    #[serde(rename = "col", alias = "color", default)]
    pub color: Option<String>,
    #[serde(rename = "eag", alias = "max_ma", deserialize_with = "required_f64")]
    pub max_ma: f64,
    #[serde(rename = "lag", alias = "min_ma", deserialize_with = "required_f64")]
    pub min_ma: f64,
    #[serde(rename = "pid", alias = "parent_no", default, deserialize_with = "optional_interval_id")]
    pub parent: Option<u64>,
}

impl GeoTimeInterval {
    pub fn level(&self) -> Option<ScaleLevel> {
        ScaleLevel::from_level(self.scale_level)
    }

    pub fn division_word(&self) -> &'static str {
        self.level().map(ScaleLevel::division_word).unwrap_or("interval")
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, age_ma: f64) -> bool {
        self.min_ma <= age_ma && age_ma <= self.max_ma
    }

    fn encloses(&self, other: &GeoTimeInterval) -> bool {
        self.min_ma <= other.min_ma && other.max_ma <= self.max_ma
    }
}

#[derive(Debug, Deserialize)]
struct IntervalResponse {
    records: Option<Vec<GeoTimeInterval>>,
    #[serde(default)]
    warnings: Option<Vec<String>>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct GeoTimeTable {
    intervals: Vec<GeoTimeInterval>,
    by_id: HashMap<u64, usize>,
}

impl GeoTimeTable {
    pub fn from_intervals(intervals: Vec<GeoTimeInterval>) -> Self {
        let by_id = intervals
            .iter()
            .enumerate()
            .map(|(position, interval)| (interval.id, position))
            .collect();
        let table = Self { intervals, by_id };
        table.check_nesting();
        table
    }

    /// Decodes the interval feed. An error or warning block, a missing
    /// `records` array, or an empty one all fail, since every age lookup
    /// needs the table.
    pub fn from_json(body: &str) -> Result<Self, SearchError> {
        let response: IntervalResponse = serde_json::from_str(body)?;
        if let Some(messages) = response.errors.or(response.warnings) {
            let message = messages
                .into_iter()
                .next()
                .unwrap_or_else(|| "the interval feed returned an error".to_string());
            return Err(SearchError::TimeScale(message));
        }
        let records = match response.records {
            Some(records) if !records.is_empty() => records,
            Some(_) => return Err(SearchError::TimeScale("no intervals in feed".to_string())),
            None => return Err(SearchError::TimeScale("missing records".to_string())),
        };
        debug!("Decoded {} geologic intervals", records.len());
        Ok(Self::from_intervals(records))
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&GeoTimeInterval> {
        self.by_id.get(&id).map(|&position| &self.intervals[position])
    }

    pub fn parent_of(&self, interval: &GeoTimeInterval) -> Option<&GeoTimeInterval> {
        interval.parent.and_then(|id| self.get(id))
    }

    /// First interval at `level`, in feed order, whose bounds contain `age_ma`.
    pub fn containing(&self, level: ScaleLevel, age_ma: f64) -> Option<&GeoTimeInterval> {
        self.intervals
            .iter()
            .find(|interval| interval.level() == Some(level) && interval.contains(age_ma))
    }

    /// Walks parent links up from `interval` until one at `level` turns up.
    pub fn ancestor_at(
        &self,
        interval: &GeoTimeInterval,
        level: ScaleLevel,
    ) -> Option<&GeoTimeInterval> {
        let mut current = self.parent_of(interval)?;
        // Levels strictly decrease on the way up, which also stops a cyclic feed.
        let mut last_level = interval.scale_level;
        loop {
            if current.scale_level >= last_level {
                return None;
            }
            if current.level() == Some(level) {
                return Some(current);
            }
            last_level = current.scale_level;
            current = self.parent_of(current)?;
        }
    }

    /// The period containing `age_ma` together with the era above it.
    pub fn period_and_era(&self, age_ma: f64) -> Option<(&GeoTimeInterval, &GeoTimeInterval)> {
        let period = self.containing(ScaleLevel::Period, age_ma)?;
        let era = self.ancestor_at(period, ScaleLevel::Era)?;
        Some((period, era))
    }

    fn check_nesting(&self) {
        for interval in &self.intervals {
            if interval.max_ma < interval.min_ma {
                warn!(
                    "Interval {} ({}) has max age {} below min age {}",
                    interval.id, interval.name, interval.max_ma, interval.min_ma
                );
            }
            if let Some(parent) = self.parent_of(interval) {
                if !parent.encloses(interval) {
                    warn!(
                        "Interval {} ({}) is not nested inside its parent {} ({})",
                        interval.id, interval.name, parent.id, parent.name
                    );
                }
            }
        }
    }
}

/// Interval identifiers come either as plain numbers or as `"int:<n>"`.
fn parse_interval_id(text: &str) -> Option<u64> {
    let digits = text.rsplit(':').next().unwrap_or(text);
    digits.trim().parse().ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Number(u64),
    Text(String),
}

fn interval_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match IdValue::deserialize(deserializer)? {
        IdValue::Number(id) => Ok(id),
        IdValue::Text(text) => parse_interval_id(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("bad interval id '{text}'"))),
    }
}

fn optional_interval_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<IdValue>::deserialize(deserializer)? {
        Some(IdValue::Number(0)) | None => None,
        Some(IdValue::Number(id)) => Some(id),
        Some(IdValue::Text(text)) => parse_interval_id(&text).filter(|&id| id != 0),
    })
}

fn required_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing age bound"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn interval(
        id: u64,
        level: u8,
        name: &str,
        max_ma: f64,
        min_ma: f64,
        parent: Option<u64>,
    ) -> GeoTimeInterval {
        GeoTimeInterval {
            id,
            scale_level: level,
            name: name.to_string(),
            color: None,
            max_ma,
            min_ma,
            parent,
        }
    }

    /// A trimmed Phanerozoic with enough structure to exercise the lookups.
    pub(crate) fn sample_table() -> GeoTimeTable {
        GeoTimeTable::from_intervals(vec![
            interval(751, 1, "Phanerozoic", 541.0, 0.0, None),
            interval(1, 2, "Cenozoic", 66.0, 0.0, Some(751)),
            interval(12, 2, "Mesozoic", 252.0, 66.0, Some(751)),
            interval(14, 2, "Paleozoic", 541.0, 252.0, Some(751)),
            interval(32, 3, "Quaternary", 2.58, 0.0, Some(1)),
            interval(26, 3, "Neogene", 23.03, 2.58, Some(1)),
            interval(25, 3, "Paleogene", 66.0, 23.03, Some(1)),
            interval(114, 3, "Cretaceous", 145.0, 66.0, Some(12)),
            interval(15, 3, "Jurassic", 201.3, 145.0, Some(12)),
            interval(16, 3, "Triassic", 252.0, 201.3, Some(12)),
            interval(22, 3, "Cambrian", 541.0, 485.4, Some(14)),
            interval(32_001, 4, "Holocene", 0.0117, 0.0, Some(32)),
        ])
    }

    #[test]
    fn test_division_words() {
        let words: Vec<_> = (1..=5)
            .filter_map(ScaleLevel::from_level)
            .map(ScaleLevel::division_word)
            .collect();
        assert_eq!(words, vec!["eon", "era", "period", "epoch", "age"]);
        assert_eq!(ScaleLevel::from_level(6), None);
    }

    #[test]
    fn test_period_and_era_lookup() {
        let table = sample_table();
        let (period, era) = table.period_and_era(68.0).unwrap();
        assert_eq!(period.name, "Cretaceous");
        assert_eq!(era.name, "Mesozoic");

        let (period, era) = table.period_and_era(500.0).unwrap();
        assert_eq!(period.name, "Cambrian");
        assert_eq!(era.name, "Paleozoic");
    }

    #[test]
    fn test_boundary_age_takes_first_period_in_feed_order() {
        let table = sample_table();
        let (period, _) = table.period_and_era(66.0).unwrap();
        assert_eq!(period.name, "Paleogene");
    }

    #[test]
    fn test_no_period_outside_table() {
        let table = sample_table();
        assert!(table.period_and_era(3000.0).is_none());
    }

    #[test]
    fn test_orphan_period_has_no_era() {
        let table = GeoTimeTable::from_intervals(vec![interval(
            114,
            3,
            "Cretaceous",
            145.0,
            66.0,
            Some(999),
        )]);
        assert!(table.containing(ScaleLevel::Period, 100.0).is_some());
        assert!(table.period_and_era(100.0).is_none());
    }

    #[test]
    fn test_cyclic_parents_terminate() {
        let table = GeoTimeTable::from_intervals(vec![
            interval(1, 3, "Loop A", 10.0, 0.0, Some(2)),
            interval(2, 3, "Loop B", 10.0, 0.0, Some(1)),
        ]);
        assert!(table.period_and_era(5.0).is_none());
    }

    #[test]
    fn test_decode_compact_feed() {
        let body = r##"{"records": [
            {"oid": "int:751", "lvl": 1, "nam": "Phanerozoic", "col": "#9AD9DD", "eag": 541, "lag": 0},
            {"oid": "int:12", "lvl": 2, "nam": "Mesozoic", "col": "#67C5CA", "eag": 252.17, "lag": 66, "pid": "int:751"},
            {"oid": 114, "lvl": 3, "nam": "Cretaceous", "eag": "145", "lag": "66", "pid": 12}
        ]}"##;
        let table = GeoTimeTable::from_json(body).unwrap();

        assert_eq!(table.len(), 3);
        let cretaceous = table.get(114).unwrap();
        assert_eq!(cretaceous.max_ma, 145.0);
        assert_eq!(table.parent_of(cretaceous).unwrap().name, "Mesozoic");
        assert_eq!(table.get(751).unwrap().parent, None);
        assert_eq!(table.get(751).unwrap().color.as_deref(), Some("#9AD9DD"));
    }

    #[test]
    fn test_decode_rejects_bad_id() {
        let body = r#"{"records": [{"oid": "int:abc", "lvl": 1, "nam": "X", "eag": 1, "lag": 0}]}"#;
        assert!(GeoTimeTable::from_json(body).is_err());
    }

    #[test]
    fn test_decode_rejects_error_blocks() {
        let errors = r#"{"errors": ["bad value 'foo' for parameter 'scale_id'"]}"#;
        match GeoTimeTable::from_json(errors) {
            Err(SearchError::TimeScale(message)) => {
                assert_eq!(message, "bad value 'foo' for parameter 'scale_id'")
            }
            other => panic!("expected a time scale error, got {other:?}"),
        }

        let warnings = r#"{"warnings": ["no records found"], "records": []}"#;
        assert!(matches!(
            GeoTimeTable::from_json(warnings),
            Err(SearchError::TimeScale(_))
        ));
    }

    #[test]
    fn test_decode_rejects_empty_table() {
        for body in [r#"{}"#, r#"{"records": []}"#] {
            assert!(
                matches!(GeoTimeTable::from_json(body), Err(SearchError::TimeScale(_))),
                "{body}"
            );
        }
    }

    #[test]
    fn test_decode_rejects_occurrence_feed() {
        let body = r#"{"records_found": 1, "records": [
            {"oid": "occ:1", "lat": 45.9, "lng": -104.5, "tna": "Triceratops horridus"}
        ]}"#;
        assert!(GeoTimeTable::from_json(body).is_err());
    }
}
