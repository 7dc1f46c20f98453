//! Catalog CSV loading.
//!
//! The catalog is a headered CSV with at least the columns `Name`, `SKU`,
//! `Stock`, and `Description`; `Price` and `Image URL` are optional. Columns
//! are resolved by header name, case-insensitively, so column order does not
//! matter. Malformed rows are skipped with a warning rather than failing the
//! whole load.

use std::io::Read;
use std::path::Path;

use crate::error::CatalogError;
use crate::matcher::Catalog;
use crate::types::PartRecord;

/// Load a catalog from a CSV file path.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let mut file = std::fs::File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    parse_catalog_csv(&contents)
}

/// Parse catalog CSV content from a string.
pub fn parse_catalog_csv(content: &str) -> Result<Catalog, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::resolve(&headers)?;

    let mut records = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping malformed catalog row: {e}");
                continue;
            }
        };

        let field = |idx: Option<usize>| -> Option<String> {
            let value = record.get(idx?)?.trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        records.push(PartRecord {
            name: field(Some(columns.name)).unwrap_or_default(),
            sku: field(Some(columns.sku)),
            stock: field(Some(columns.stock)).and_then(|s| s.parse().ok()),
            description: field(Some(columns.description)).unwrap_or_default(),
            price: field(columns.price),
            image_url: field(columns.image_url),
        });
    }

    Ok(Catalog::from_records(records))
}

/// Header indices for the catalog columns.
struct ColumnMap {
    name: usize,
    sku: usize,
    stock: usize,
    description: usize,
    price: Option<usize>,
    image_url: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, CatalogError> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };
        let require = |wanted: &str| {
            find(wanted).ok_or_else(|| CatalogError::MissingColumn(wanted.to_string()))
        };

        Ok(Self {
            name: require("Name")?,
            sku: require("SKU")?,
            stock: require("Stock")?,
            description: require("Description")?,
            price: find("Price"),
            image_url: find("Image URL"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_columns() {
        let csv = "Name,SKU,Stock,Description\n\
                   Impeller,PUMP-1,4,Rubber impeller\n";
        let catalog = parse_catalog_csv(csv).unwrap();
        assert_eq!(catalog.len(), 1);
        let entry = catalog.get(0).unwrap();
        assert_eq!(entry.record.name, "Impeller");
        assert_eq!(entry.record.sku.as_deref(), Some("PUMP-1"));
        assert_eq!(entry.record.stock, Some(4));
        assert!(entry.record.price.is_none());
        assert!(entry.image_sku.is_none());
        assert!(entry.expected_filename.is_none());
    }

    #[test]
    fn test_parse_missing_required_column() {
        let csv = "Name,Stock,Description\nImpeller,4,Rubber impeller\n";
        let err = parse_catalog_csv(csv).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(c) if c == "SKU"));
    }

    #[test]
    fn test_headers_case_insensitive_any_order() {
        let csv = "description,stock,sku,name,image url\n\
                   Rubber impeller,4,PUMP-1,Impeller,https://h/ABC__12.x.jpg\n";
        let catalog = parse_catalog_csv(csv).unwrap();
        let entry = catalog.get(0).unwrap();
        assert_eq!(entry.record.name, "Impeller");
        assert_eq!(entry.image_sku.as_deref(), Some("ABC"));
        assert_eq!(entry.expected_filename.as_deref(), Some("ABC__12.jpg"));
    }

    #[test]
    fn test_empty_cells_become_none() {
        let csv = "Name,SKU,Stock,Description,Price,Image URL\n\
                   Anode,,none,Zinc anode,,\n";
        let catalog = parse_catalog_csv(csv).unwrap();
        let entry = catalog.get(0).unwrap();
        assert!(entry.record.sku.is_none());
        // "none" is not an integer; the row still loads
        assert!(entry.record.stock.is_none());
        assert!(entry.record.price.is_none());
        assert!(entry.record.image_url.is_none());
    }

    #[test]
    fn test_short_rows_do_not_panic() {
        // flexible(true): rows narrower than the header are tolerated
        let csv = "Name,SKU,Stock,Description,Price,Image URL\n\
                   Anode,ZN-1\n";
        let catalog = parse_catalog_csv(csv).unwrap();
        let entry = catalog.get(0).unwrap();
        assert_eq!(entry.record.name, "Anode");
        assert_eq!(entry.record.sku.as_deref(), Some("ZN-1"));
        assert!(entry.record.stock.is_none());
    }

    #[test]
    fn test_row_order_preserved() {
        let csv = "Name,SKU,Stock,Description\n\
                   First,A-1,1,one\n\
                   Second,A-2,2,two\n\
                   Third,A-3,3,three\n";
        let catalog = parse_catalog_csv(csv).unwrap();
        let names: Vec<_> = catalog
            .entries()
            .iter()
            .map(|e| e.record.name.as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }
}
