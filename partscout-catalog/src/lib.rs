//! Parts catalog data model, CSV loading, and upload-filename matching.
//!
//! This crate defines the in-memory catalog for marine engine parts and the
//! three-tier matcher that resolves an uploaded image filename to catalog
//! rows. It performs no network I/O; enrichment of matched rows lives in
//! `partscout-pitch`.

pub mod cache;
pub mod derive;
pub mod error;
pub mod load;
pub mod matcher;
pub mod types;

pub use cache::CatalogCache;
pub use derive::derive_image_fields;
pub use error::CatalogError;
pub use load::{load_catalog, parse_catalog_csv};
pub use matcher::{Catalog, IdentifyResult, MatchTier, extract_identifier};
pub use types::{CatalogEntry, PartRecord};
