//! Fossil occurrence search against the Paleobiology Database.
//!
//! Raw occurrence records are normalized into display-ready [`record::Fossil`]s:
//! a name from the taxonomic ranks, a location from the administrative
//! regions and an age placed on the geologic time scale. The fossils are then
//! turned into map markers with an icon and a caption.

pub mod age;
mod countries;
pub mod error;
pub mod export;
pub mod fetch;
pub mod location;
pub mod marker;
pub mod normalize;
pub mod record;
pub mod search;
pub mod taxonomy;
pub mod timescale;
pub mod util;
