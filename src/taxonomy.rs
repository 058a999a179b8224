use crate::record::{RawOccurrence, Taxonomy};

pub const UNKNOWN_SPECIES: &str = "Unknown species";
pub const SPECIES_NOT_RECORDED: &str = "Species not recorded";

const TRILOBITA: &str = "Trilobita";
const AVES: &str = "Aves";

pub fn resolve_taxonomy(raw: &RawOccurrence) -> Taxonomy {
    Taxonomy {
        phylum: raw.phylum.clone(),
        class: raw.class.clone(),
        order: raw.order.clone(),
        family: raw.family.clone(),
        genus: raw.genus.clone(),
    }
}

/// Picks the name shown for a find. Rules are tried in order and the first
/// one that applies wins; trilobites and birds are checked before the
/// generic genus fallback.
pub fn resolve_display_name(taxon_name: Option<&str>, taxonomy: &Taxonomy) -> String {
    let class = taxonomy.class.as_deref();
    let genus = taxonomy.genus.as_deref();

    let name = match (class, genus, taxon_name) {
        (Some(TRILOBITA), Some(genus), _) => format!("Trilobite (genus {genus})"),
        (Some(TRILOBITA), None, Some(taxon)) => format!("Trilobite (genus {taxon})"),
        (Some(TRILOBITA), None, None) => "Trilobite (genus unidentified)".to_string(),
        // A bird without a taxon name keeps the placeholder on purpose.
        (Some(AVES), _, taxon) => format!("Bird (genus {})", taxon.unwrap_or("None")),
        (_, None, Some(taxon)) => taxon.to_string(),
        (_, None, None) => UNKNOWN_SPECIES.to_string(),
        (_, Some(genus), _) => genus.to_string(),
    };

    if name.trim().is_empty() {
        SPECIES_NOT_RECORDED.to_string()
    } else {
        name
    }
}
