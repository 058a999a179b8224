//! Map markers for the rendering side: an icon per find chosen from its
//! taxonomy, and an HTML caption.

use crate::record::{Coordinates, Fossil, Taxonomy};
use crate::search::SearchQuery;
use serde::{Serialize, Serializer};

const SAUROPOD_FAMILIES: [&str; 15] = [
    "Camarasauridae",
    "Brachiosauridae",
    "Euhelopodidae",
    "Titanosauridae",
    "Mamenchisauridae",
    "Diplodocidae",
    "Massospondylidae",
    "Megaloolithidae",
    "Riojasauridae",
    "Plateosauridae",
    "Saltasauridae",
    "Faveoloolithidae",
    "Dicraeosauridae",
    "Nemegtosauridae",
    "Rebbachisauridae",
];

const SEARCH_CENTER_CAPTION: &str = "Your chosen <b style='color:#00cc00;'> centerpoint </b>!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconTag {
    Trilobite,
    Sauropod,
    Theropod,
    Stegosaur,
    Triceratops,
    Pterosaur,
    Plesiosaur,
    Caveman,
    Generic,
    SearchCenter,
}

impl IconTag {
    pub fn path(self) -> &'static str {
        match self {
            IconTag::Trilobite => "/static/images/mapicons/trilobite.png",
            IconTag::Sauropod => "/static/images/mapicons/brontosaurus.png",
            IconTag::Theropod => "/static/images/mapicons/tyrannosaurus_rex.png",
            IconTag::Stegosaur => "/static/images/mapicons/stegosaurus.png",
            IconTag::Triceratops => "/static/images/mapicons/triceratops.png",
            IconTag::Pterosaur => "/static/images/mapicons/pterodactyl.png",
            IconTag::Plesiosaur => "/static/images/mapicons/plesiosaur.png",
            IconTag::Caveman => "/static/images/mapicons/cartoon_caveman.ico",
            IconTag::Generic => "/static/images/mapicons/townspeople-dinosaur-icon.png",
            IconTag::SearchCenter => "/static/images/mapicons/my_house.png",
        }
    }
}

impl Serialize for IconTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

/// Picks a map icon from the taxonomy of a find. Guards are tried in order
/// and the first match wins.
pub fn select_icon(taxonomy: &Taxonomy) -> IconTag {
    let class = taxonomy.class.as_deref();
    let order = taxonomy.order.as_deref();
    let family = taxonomy.family.as_deref();

    match class {
        Some("Trilobita") => IconTag::Trilobite,
        Some("Saurischia") => match family {
            Some(family) if SAUROPOD_FAMILIES.contains(&family) => IconTag::Sauropod,
            _ => IconTag::Theropod,
        },
        Some("Ornithischia") => match (order, family) {
            (Some("Thyreophora"), _) => IconTag::Stegosaur,
            (_, Some("Ceratopsidae")) => IconTag::Triceratops,
            _ => IconTag::Stegosaur,
        },
        _ => match (order, family) {
            (Some("Pterosauria"), _) => IconTag::Pterosaur,
            (Some("plesiosauridae" | "ichthyosauridae"), _) => IconTag::Plesiosaur,
            (_, Some("Hominidae")) => IconTag::Caveman,
            _ => IconTag::Generic,
        },
    }
}

pub fn caption(fossil: &Fossil) -> String {
    format!(
        "<b>{}</b>. {}. {}.",
        fossil.name, fossil.location, fossil.age
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub icon: IconTag,
    pub lat: f64,
    pub lng: f64,
    pub infobox: String,
}

impl MapMarker {
    pub fn for_fossil(fossil: &Fossil) -> Self {
        Self {
            icon: select_icon(&fossil.taxonomy),
            lat: fossil.coordinates.lat,
            lng: fossil.coordinates.lng,
            infobox: caption(fossil),
        }
    }

    pub fn search_center(center: Coordinates) -> Self {
        Self {
            icon: IconTag::SearchCenter,
            lat: center.lat,
            lng: center.lng,
            infobox: SEARCH_CENTER_CAPTION.to_string(),
        }
    }
}

pub fn build_markers(fossils: &[Fossil]) -> Vec<MapMarker> {
    fossils.iter().map(MapMarker::for_fossil).collect()
}

/// Where the map opens and how far it is zoomed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub search_center: Option<MapMarker>,
}

impl MapView {
    /// Centres on the chosen search point, or on the first find when the
    /// search had no location. `None` when there is nothing to centre on.
    pub fn for_search(query: &SearchQuery, fossils: &[Fossil]) -> Option<Self> {
        let zoom = query.zoom_level();
        match query.center {
            Some(center) => Some(Self {
                center,
                zoom,
                search_center: Some(MapMarker::search_center(center)),
            }),
            None => fossils.first().map(|fossil| Self {
                center: fossil.coordinates,
                zoom,
                search_center: None,
            }),
        }
    }

    /// All markers to draw, with the search centre last.
    pub fn markers(&self, fossils: &[Fossil]) -> Vec<MapMarker> {
        let mut markers = build_markers(fossils);
        markers.extend(self.search_center.clone());
        markers
    }
}
