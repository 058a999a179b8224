use crate::error::SearchError;
use crate::marker::{MapMarker, MapView};
use crate::record::{Fossil, FossilRow};
use csv::Writer;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Everything the map page needs, in one JSON document.
#[derive(Debug, Serialize)]
pub struct MapDocument<'a> {
    pub search_term: Option<&'a str>,
    pub records_found: Option<u64>,
    pub view: Option<&'a MapView>,
    pub markers: &'a [MapMarker],
}

pub fn write_csv<W: Write>(fossils: &[Fossil], writer: W) -> Result<(), SearchError> {
    let mut writer = Writer::from_writer(writer);
    for fossil in fossils {
        writer.serialize(FossilRow::from(fossil))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_to_csv(fossils: &[Fossil], filename: &str) -> Result<(), SearchError> {
    let file = File::create(filename)?;
    write_csv(fossils, file)?;
    info!("Data saved to {}", filename);
    Ok(())
}

pub fn save_map_json(document: &MapDocument<'_>, filename: &str) -> Result<(), SearchError> {
    let mut writer = BufWriter::new(File::create(filename)?);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.flush()?;
    info!("Map markers saved to {}", filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::build_markers;
    use crate::record::{Coordinates, Taxonomy};

    fn fossil() -> Fossil {
        Fossil {
            name: "Trilobite (genus Elrathia)".to_string(),
            taxonomy: Taxonomy {
                phylum: Some("Arthropoda".to_string()),
                class: Some("Trilobita".to_string()),
                ..Taxonomy::default()
            },
            location: "Millard County, Utah".to_string(),
            age: "Cambrian period, Paleozoic era (approx. 503.0 million years ago)".to_string(),
            coordinates: Coordinates::new(39.2, -113.3),
            paleoenvironment: Some("offshore".to_string()),
            geocomments: None,
        }
    }

    #[test]
    fn test_write_csv() {
        let mut buffer = Vec::new();
        write_csv(&[fossil()], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("name,lat,lng,location,age,phylum,class,order,family,genus,paleoenvironment,geocomments")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("Trilobite (genus Elrathia),39.2,-113.3,\"Millard County, Utah\""));
        assert!(row.ends_with(",Arthropoda,Trilobita,,,,offshore,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_save_map_json() {
        let fossils = vec![fossil()];
        let markers = build_markers(&fossils);
        let document = MapDocument {
            search_term: Some("Trilobita"),
            records_found: Some(1),
            view: None,
            markers: &markers,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markers.json");
        save_map_json(&document, path.to_str().unwrap()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["records_found"], 1);
        assert_eq!(saved["markers"][0]["icon"], "/static/images/mapicons/trilobite.png");
        assert!(saved["view"].is_null());
    }
}
