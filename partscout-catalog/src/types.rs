//! Data model types for the parts catalog.

use serde::{Deserialize, Serialize};

/// One product entry as read from the catalog CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartRecord {
    pub name: String,
    /// Stock-keeping unit. Not guaranteed unique; empty CSV cells become None.
    pub sku: Option<String>,
    /// Quantity on hand. None when the cell is empty or not an integer.
    pub stock: Option<i64>,
    pub description: String,
    /// Price as it appears in the catalog ("$12.99", "Call"). Kept verbatim.
    pub price: Option<String>,
    /// Source of truth for the derived image fields.
    pub image_url: Option<String>,
}

/// A catalog row plus its derived fields, computed once at load time.
///
/// `image_sku` and `expected_filename` are a pure function of
/// `record.image_url`: both are present or both are absent.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub record: PartRecord,
    /// Substring of the image URL between the last path separator and its
    /// `__<digits>` suffix.
    pub image_sku: Option<String>,
    /// `{image_sku}__{digits}.jpg` — the filename an upload of this part's
    /// image is expected to carry.
    pub expected_filename: Option<String>,
}

impl CatalogEntry {
    /// Wrap a record, computing the derived fields from its image URL.
    pub fn from_record(record: PartRecord) -> Self {
        let derived = record
            .image_url
            .as_deref()
            .and_then(crate::derive::derive_image_fields);
        let (image_sku, expected_filename) = match derived {
            Some((sku, filename)) => (Some(sku), Some(filename)),
            None => (None, None),
        };
        Self {
            record,
            image_sku,
            expected_filename,
        }
    }
}
