//! Upload-filename matching against the catalog.
//!
//! Given an uploaded image filename, derive a candidate identifier and
//! resolve it to catalog rows using three tiers, evaluated in strict order
//! with early exit on the first tier that yields anything:
//!
//! 1. exact expected-filename match (case-sensitive)
//! 2. exact image-SKU match against the extracted identifier (case-sensitive)
//! 3. case-insensitive substring match against the catalog SKU column
//!
//! Matching is a pure function over the filename and the loaded catalog: no
//! I/O, no retained state between calls.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{CatalogEntry, PartRecord};

/// Identifier prefix before the first `__<digits>` token. Non-greedy, so
/// `ABC__1__2.jpg` extracts `ABC`.
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+?)__\d+").expect("identifier regex must compile"));

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Uploaded filename equals a row's expected filename exactly.
    Filename,
    /// Extracted identifier equals a row's URL-derived image SKU exactly.
    ImageSku,
    /// Extracted identifier appears in a row's SKU, case-insensitively.
    SkuSubstring,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchTier::Filename => write!(f, "filename"),
            MatchTier::ImageSku => write!(f, "image-sku"),
            MatchTier::SkuSubstring => write!(f, "sku-substring"),
        }
    }
}

/// Result of matching one uploaded filename.
///
/// `rows` are indices into the catalog's entries, in catalog order. An empty
/// `rows` with `tier == None` means "not found" — a normal outcome, not an
/// error.
#[derive(Debug, Clone)]
pub struct IdentifyResult {
    pub identifier: String,
    pub rows: Vec<usize>,
    pub tier: Option<MatchTier>,
}

impl IdentifyResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Derive the candidate identifier from an uploaded filename.
///
/// Everything before the first `__<digits>` token; when the filename carries
/// no such token, the filename with its extension stripped.
pub fn extract_identifier(filename: &str) -> String {
    if let Some(caps) = IDENTIFIER_RE.captures(filename) {
        return caps[1].to_string();
    }
    strip_extension(filename).to_string()
}

/// Strip the last dotted extension. A leading dot is not an extension
/// separator, so `.hidden` stays intact.
fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(pos) if pos > 0 => &filename[..pos],
        _ => filename,
    }
}

/// The loaded, immutable catalog: an ordered sequence of entries with their
/// derived fields already computed.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from raw records, deriving image fields once per row.
    pub fn from_records(records: Vec<PartRecord>) -> Self {
        Self {
            entries: records.into_iter().map(CatalogEntry::from_record).collect(),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match an uploaded filename against the catalog.
    pub fn identify(&self, filename: &str) -> IdentifyResult {
        let identifier = extract_identifier(filename);

        // Tier 1: exact expected-filename match
        let rows: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.expected_filename.as_deref() == Some(filename))
            .map(|(i, _)| i)
            .collect();
        if !rows.is_empty() {
            return IdentifyResult {
                identifier,
                rows,
                tier: Some(MatchTier::Filename),
            };
        }

        // Tier 2: exact image-SKU match
        let rows: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.image_sku.as_deref() == Some(identifier.as_str()))
            .map(|(i, _)| i)
            .collect();
        if !rows.is_empty() {
            return IdentifyResult {
                identifier,
                rows,
                tier: Some(MatchTier::ImageSku),
            };
        }

        // Tier 3: case-insensitive SKU substring match. Rows without a SKU
        // never match.
        let needle = identifier.to_lowercase();
        let rows: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.record
                    .sku
                    .as_deref()
                    .is_some_and(|sku| sku.to_lowercase().contains(&needle))
            })
            .map(|(i, _)| i)
            .collect();
        if !rows.is_empty() {
            return IdentifyResult {
                identifier,
                rows,
                tier: Some(MatchTier::SkuSubstring),
            };
        }

        IdentifyResult {
            identifier,
            rows: Vec::new(),
            tier: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, sku: Option<&str>, image_url: Option<&str>) -> PartRecord {
        PartRecord {
            name: name.to_string(),
            sku: sku.map(str::to_string),
            stock: Some(3),
            description: format!("{name} description"),
            price: None,
            image_url: image_url.map(str::to_string),
        }
    }

    fn make_test_catalog() -> Catalog {
        Catalog::from_records(vec![
            record(
                "Impeller Kit",
                Some("PUMP-IMP-09"),
                Some("https://cdn.example.com/img/ABC__123.500x500.jpg"),
            ),
            record(
                "Impeller Kit (bulk)",
                Some("PUMP-IMP-09-B"),
                Some("https://cdn.example.com/img/ABC__9.500x500.jpg"),
            ),
            record(
                "Raw Water Pump",
                Some("PUMP-XYZ-22"),
                Some("https://cdn.example.com/img/XYZ__9.500x500.jpg"),
            ),
            record("Zinc Anode", None, None),
        ])
    }

    #[test]
    fn test_extract_identifier_with_token() {
        assert_eq!(extract_identifier("ABC__123.jpg"), "ABC");
        assert_eq!(extract_identifier("ABC__123.500x500.png"), "ABC");
        // Stops at the first token
        assert_eq!(extract_identifier("ABC__1__2.jpg"), "ABC");
    }

    #[test]
    fn test_extract_identifier_without_token() {
        assert_eq!(extract_identifier("IMG_4412.jpeg"), "IMG_4412");
        assert_eq!(extract_identifier("photo.tar.gz"), "photo.tar");
        assert_eq!(extract_identifier("noextension"), "noextension");
        assert_eq!(extract_identifier(".hidden"), ".hidden");
    }

    #[test]
    fn test_tier1_exact_filename_beats_image_sku() {
        let catalog = make_test_catalog();
        let result = catalog.identify("ABC__123.jpg");
        // Row 1 also has image SKU "ABC", but tier 1 wins with exactly row 0
        assert_eq!(result.rows, vec![0]);
        assert_eq!(result.tier, Some(MatchTier::Filename));
        assert_eq!(result.identifier, "ABC");
    }

    #[test]
    fn test_tier1_is_case_sensitive() {
        let catalog = make_test_catalog();
        let result = catalog.identify("abc__123.jpg");
        // Falls through tier 1 and tier 2 (identifier "abc" != "ABC"),
        // tier 3 finds nothing containing "abc"
        assert!(result.is_empty());
        assert_eq!(result.tier, None);
    }

    #[test]
    fn test_tier2_image_sku_match() {
        let catalog = make_test_catalog();
        // No row expects "XYZ__9.png" (expected filenames end in .jpg), but
        // row 2's image SKU is "XYZ"
        let result = catalog.identify("XYZ__9.png");
        assert_eq!(result.rows, vec![2]);
        assert_eq!(result.tier, Some(MatchTier::ImageSku));
    }

    #[test]
    fn test_tier2_returns_all_matching_rows_in_order() {
        let catalog = make_test_catalog();
        let result = catalog.identify("ABC__555.png");
        assert_eq!(result.rows, vec![0, 1]);
        assert_eq!(result.tier, Some(MatchTier::ImageSku));
    }

    #[test]
    fn test_tier3_fuzzy_sku_substring() {
        let catalog = make_test_catalog();
        let result = catalog.identify("xyz.jpg");
        assert_eq!(result.rows, vec![2]);
        assert_eq!(result.tier, Some(MatchTier::SkuSubstring));
        assert_eq!(result.identifier, "xyz");
    }

    #[test]
    fn test_tier3_skips_rows_without_sku() {
        let catalog = Catalog::from_records(vec![record("Zinc Anode", None, None)]);
        // "zinc" appears in the name but there is no SKU to match against
        let result = catalog.identify("zinc.jpg");
        assert!(result.is_empty());
        assert_eq!(result.tier, None);
    }

    #[test]
    fn test_no_match_is_empty_without_tier() {
        let catalog = make_test_catalog();
        let result = catalog.identify("UNKNOWN__1.jpg");
        assert!(result.is_empty());
        assert_eq!(result.tier, None);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::from_records(Vec::new());
        let result = catalog.identify("ABC__123.jpg");
        assert!(result.is_empty());
        assert_eq!(result.tier, None);
        assert_eq!(result.identifier, "ABC");
    }
}
