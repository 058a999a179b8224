use crate::countries::COUNTRY_NAMES;
use log::warn;

pub const LOCATION_UNDISCLOSED: &str = "Location undisclosed";

const GREAT_BRITAIN: &str = "Great Britain";
const UNITED_STATES: &str = "United States";
const UNITED_STATES_CODE: &str = "US";

/// Translates a PBDB country code into an English country name.
///
/// PBDB uses a handful of codes outside ISO 3166 (or with a different
/// meaning), which are mapped by hand before the table lookup. Unknown codes
/// are returned as given.
pub fn resolve_nation(code: Option<&str>) -> Option<String> {
    let code = code?.trim();
    let name = match code.to_ascii_uppercase().as_str() {
        "UK" => GREAT_BRITAIN.to_string(),
        "TU" => "Tuva (Russian Federation)".to_string(),
        "AA" => "Antarctica".to_string(),
        upper => match COUNTRY_NAMES.get(upper) {
            Some(name) => (*name).to_string(),
            None => {
                warn!("Unrecognized country code '{}'", code);
                code.to_string()
            }
        },
    };
    Some(name)
}

/// Like [`resolve_nation`], with an absent code reading as undisclosed.
pub fn nation_from_iso3166(code: Option<&str>) -> String {
    resolve_nation(code).unwrap_or_else(|| LOCATION_UNDISCLOSED.to_string())
}

/// Composes a location string from the administrative regions of a find.
///
/// `nation` is the already-translated country name, not the raw code.
pub fn resolve_location(
    nation: Option<&str>,
    state: Option<&str>,
    county: Option<&str>,
    geocomments: Option<&str>,
) -> String {
    match (nation, state, county) {
        (None, None, None) => geocomments.unwrap_or(LOCATION_UNDISCLOSED).to_string(),
        (Some(GREAT_BRITAIN), None, _) => GREAT_BRITAIN.to_string(),
        // The constituent-country test this stands in for was always true for
        // any state, so every British find is reported as "county, state".
        (Some(GREAT_BRITAIN), Some(state), county) => join_regions(&[county, Some(state)]),
        (Some(UNITED_STATES | UNITED_STATES_CODE), None, None) => UNITED_STATES.to_string(),
        (Some(UNITED_STATES | UNITED_STATES_CODE), state, county) => {
            join_regions(&[county, state])
        }
        (None, state, county) => join_regions(&[county, state]),
        (Some(nation), None, _) => nation.to_string(),
        (Some(nation), Some(state), county) => join_regions(&[county, Some(state), Some(nation)]),
    }
}

fn join_regions(parts: &[Option<&str>]) -> String {
    let joined = parts
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        LOCATION_UNDISCLOSED.to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nation_overrides() {
        assert_eq!(nation_from_iso3166(Some("UK")), "Great Britain");
        assert_eq!(nation_from_iso3166(Some("TU")), "Tuva (Russian Federation)");
        assert_eq!(nation_from_iso3166(Some("AA")), "Antarctica");
        assert_eq!(nation_from_iso3166(None), LOCATION_UNDISCLOSED);
    }

    #[test]
    fn test_nation_overrides_ignore_case() {
        assert_eq!(nation_from_iso3166(Some("uk")), "Great Britain");
        assert_eq!(nation_from_iso3166(Some(" Tu ")), "Tuva (Russian Federation)");
        assert_eq!(nation_from_iso3166(Some("aa")), "Antarctica");
    }

    #[test]
    fn test_nation_table_lookup() {
        assert_eq!(nation_from_iso3166(Some("US")), "United States");
        assert_eq!(nation_from_iso3166(Some("AR")), "Argentina");
        assert_eq!(nation_from_iso3166(Some("cn")), "China");
        assert_eq!(nation_from_iso3166(Some("GB")), "United Kingdom");
        assert_eq!(nation_from_iso3166(Some("ZZ")), "ZZ");
        assert_eq!(resolve_nation(None), None);
    }

    #[test]
    fn test_nothing_known_falls_back_to_geocomments() {
        assert_eq!(
            resolve_location(None, None, None, Some("Near the old quarry")),
            "Near the old quarry"
        );
        assert_eq!(resolve_location(None, None, None, None), LOCATION_UNDISCLOSED);
    }

    #[test]
    fn test_united_states() {
        assert_eq!(
            resolve_location(
                Some("United States"),
                Some("Montana"),
                Some("Carter County"),
                None
            ),
            "Carter County, Montana"
        );
        assert_eq!(
            resolve_location(Some("US"), Some("Utah"), None, None),
            "Utah"
        );
    }

    #[test]
    fn test_great_britain() {
        assert_eq!(
            resolve_location(Some("Great Britain"), None, Some("Dorset"), None),
            "Great Britain"
        );
        assert_eq!(
            resolve_location(Some("Great Britain"), Some("England"), Some("Dorset"), None),
            "Dorset, England"
        );
        assert_eq!(
            resolve_location(Some("Great Britain"), Some("Isle of Skye"), None, None),
            "Isle of Skye"
        );
    }

    #[test]
    fn test_missing_nation() {
        assert_eq!(
            resolve_location(None, Some("Alberta"), Some("Drumheller"), None),
            "Drumheller, Alberta"
        );
        assert_eq!(resolve_location(None, Some("Alberta"), None, None), "Alberta");
        assert_eq!(resolve_location(None, None, Some("Drumheller"), None), "Drumheller");
    }

    #[test]
    fn test_other_nations() {
        assert_eq!(resolve_location(Some("Mongolia"), None, None, None), "Mongolia");
        assert_eq!(
            resolve_location(Some("Argentina"), Some("Neuquén"), None, None),
            "Neuquén, Argentina"
        );
        assert_eq!(
            resolve_location(Some("China"), Some("Liaoning"), Some("Beipiao"), None),
            "Beipiao, Liaoning, China"
        );
    }

    #[test]
    fn test_us_without_state() {
        assert_eq!(
            resolve_location(Some("US"), None, None, Some("ignored")),
            "United States"
        );
        assert_eq!(
            resolve_location(Some("United States"), None, Some("Kane County"), None),
            "Kane County"
        );
    }
}
