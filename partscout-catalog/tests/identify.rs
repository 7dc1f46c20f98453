//! End-to-end: load a catalog CSV from disk and run uploads through the
//! three-tier matcher.

use std::io::Write;

use partscout_catalog::{MatchTier, load_catalog};

fn write_catalog(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const CATALOG_CSV: &str = "\
Name,SKU,Stock,Description,Price,Image URL
Impeller Kit,PUMP-IMP-09,12,Neoprene impeller with gasket,$38.50,https://cdn.example.com/img/ABC__123.500x500.jpg
Raw Water Pump,PUMP-XYZ-22,3,Bronze body raw water pump,,https://cdn.example.com/img/XYZ__9.500x500.jpg
Zinc Anode,,40,Shaft zinc anode,$6.00,
Fuel Filter,FF-210,0,10-micron fuel filter,$14.25,https://cdn.example.com/img/filter.jpg
";

#[test]
fn exact_filename_upload_hits_tier_one() {
    let file = write_catalog(CATALOG_CSV);
    let catalog = load_catalog(file.path()).unwrap();

    let result = catalog.identify("ABC__123.jpg");
    assert_eq!(result.tier, Some(MatchTier::Filename));
    assert_eq!(result.rows, vec![0]);
    assert_eq!(
        catalog.get(result.rows[0]).unwrap().record.name,
        "Impeller Kit"
    );
}

#[test]
fn renamed_upload_falls_back_to_image_sku() {
    let file = write_catalog(CATALOG_CSV);
    let catalog = load_catalog(file.path()).unwrap();

    // Different digits and extension than the catalog URL carries
    let result = catalog.identify("XYZ__40.png");
    assert_eq!(result.tier, Some(MatchTier::ImageSku));
    assert_eq!(
        catalog.get(result.rows[0]).unwrap().record.name,
        "Raw Water Pump"
    );
}

#[test]
fn freehand_filename_falls_back_to_sku_substring() {
    let file = write_catalog(CATALOG_CSV);
    let catalog = load_catalog(file.path()).unwrap();

    let result = catalog.identify("xyz.jpg");
    assert_eq!(result.tier, Some(MatchTier::SkuSubstring));
    assert_eq!(
        catalog.get(result.rows[0]).unwrap().record.sku.as_deref(),
        Some("PUMP-XYZ-22")
    );
}

#[test]
fn unknown_upload_yields_empty_result() {
    let file = write_catalog(CATALOG_CSV);
    let catalog = load_catalog(file.path()).unwrap();

    let result = catalog.identify("propeller.jpg");
    assert!(result.is_empty());
    assert_eq!(result.tier, None);
    assert_eq!(result.identifier, "propeller");
}

#[test]
fn image_url_without_token_derives_nothing() {
    let file = write_catalog(CATALOG_CSV);
    let catalog = load_catalog(file.path()).unwrap();

    // "Fuel Filter" has an image URL but no __<digits> suffix
    let entry = catalog.get(3).unwrap();
    assert!(entry.image_sku.is_none());
    assert!(entry.expected_filename.is_none());

    // It is still reachable through tier 3
    let result = catalog.identify("ff-210.jpg");
    assert_eq!(result.tier, Some(MatchTier::SkuSubstring));
    assert_eq!(result.rows, vec![3]);
}
