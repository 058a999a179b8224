use crate::record::Coordinates;
use clap::ValueEnum;

pub const DEFAULT_API_BASE: &str = "https://paleobiodb.org/data1.2";

/// Preset taxon groups offered when no taxon is typed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaxonGroup {
    Chordates,
    #[value(name = "dinosaursandfriends")]
    DinosaursAndFriends,
    Dinosaurs,
    Sauropods,
    Theropods,
    Stegosaurs,
    Ankylosaurs,
    Hadrosaurs,
    Ceratopsians,
    #[value(name = "plesioichthyosauria")]
    PlesiosaursAndIchthyosaurs,
    Pterosauria,
    Birds,
    Mammals,
    Hominids,
    Trilobites,
}

impl TaxonGroup {
    /// Comma-separated PBDB base names for the group.
    pub fn base_names(self) -> &'static str {
        match self {
            TaxonGroup::Chordates => "chordata",
            TaxonGroup::DinosaursAndFriends => {
                "saurischia,ornithischia,plesiosauria,ichthyosauria,pterosauria"
            }
            TaxonGroup::Dinosaurs => "saurischia,ornithischia",
            TaxonGroup::Sauropods => "sauropoda",
            TaxonGroup::Theropods => "Theropoda",
            TaxonGroup::Stegosaurs => "Stegosauria",
            TaxonGroup::Ankylosaurs => "ankylosauria",
            TaxonGroup::Hadrosaurs => "hadrosauria",
            TaxonGroup::Ceratopsians => "ceratopsia",
            TaxonGroup::PlesiosaursAndIchthyosaurs => "plesiosauria,ichthyosauria",
            TaxonGroup::Pterosauria => "pterosauria",
            TaxonGroup::Birds => "Aves",
            TaxonGroup::Mammals => "mammalia",
            TaxonGroup::Hominids => "Hominidae",
            TaxonGroup::Trilobites => "Trilobita",
        }
    }
}

/// Typed text wins over the preset group.
pub fn search_taxon(taxon_query: Option<&str>, group: Option<TaxonGroup>) -> Option<String> {
    match taxon_query.map(str::trim).filter(|query| !query.is_empty()) {
        Some(query) => Some(query.to_string()),
        None => group.map(|group| group.base_names().to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub taxon: Option<String>,
    pub center: Option<Coordinates>,
    /// Width of the search box in degrees.
    pub radius_degrees: u32,
}

impl SearchQuery {
    pub fn new(taxon: Option<String>, center: Option<Coordinates>, radius_degrees: u32) -> Self {
        Self {
            taxon,
            center,
            radius_degrees,
        }
    }

    /// `base_name` matches the taxon and all of its subtaxa.
    pub fn base_name_param(&self) -> String {
        match &self.taxon {
            Some(taxon) => format!("&base_name={}", taxon.replace(' ', "%20")),
            None => String::new(),
        }
    }

    /// A box `radius_degrees` wide, centred on the search point.
    pub fn bounding_box_param(&self) -> String {
        let Some(center) = self.center else {
            return String::new();
        };
        let half = f64::from(self.radius_degrees) / 2.0;
        format!(
            "&lngmin={}&lngmax={}&latmin={}&latmax={}",
            center.lng - half,
            center.lng + half,
            center.lat - half,
            center.lat + half
        )
    }

    pub fn occurrence_url(&self, api_base: &str) -> String {
        format!(
            "{}/occs/list.json?rowcount&level=3{}{}&show=full",
            api_base.trim_end_matches('/'),
            self.base_name_param(),
            self.bounding_box_param()
        )
    }

    pub fn zoom_level(&self) -> u8 {
        if self.center.is_none() {
            return 4;
        }
        match self.radius_degrees {
            9.. => 5,
            6..=8 => 6,
            3..=5 => 7,
            2 => 8,
            _ => 9,
        }
    }
}

pub fn time_scale_url(api_base: &str) -> String {
    format!("{}/intervals/list.json?scale=1", api_base.trim_end_matches('/'))
}
