//! Derived-field computation for catalog image URLs.
//!
//! Catalog image URLs embed the part's image SKU in their last path segment,
//! followed by a `__<digits>` suffix:
//! ```text
//! https://cdn.example.com/images/IMPELLER-09-812B__4821.500x500.jpg
//!                                ^^^^^^^^^^^^^^^-- image SKU
//! ```
//! The expected upload filename is that segment with a plain `.jpg`
//! extension: `IMPELLER-09-812B__4821.jpg`.

use std::sync::LazyLock;

use regex::Regex;

/// Capture between the last path separator and a `__<digits>` suffix.
/// `[^/]+` cannot span separators, so the leftmost match sits in the last
/// segment that carries the suffix.
static IMAGE_SKU_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/([^/]+)__(\d+)").expect("image SKU regex must compile"));

/// Extract `(image_sku, expected_filename)` from an image URL.
///
/// Returns `None` when the URL is empty or does not carry the
/// `/<segment>__<digits>` pattern. The two fields always come from the same
/// capture, so callers get both or neither.
pub fn derive_image_fields(url: &str) -> Option<(String, String)> {
    let caps = IMAGE_SKU_RE.captures(url)?;
    let sku = caps[1].to_string();
    let expected = format!("{}__{}.jpg", &caps[1], &caps[2]);
    Some((sku, expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_from_cdn_url() {
        let url = "https://cdn.example.com/images/IMPELLER-09-812B__4821.500x500.jpg";
        let (sku, expected) = derive_image_fields(url).unwrap();
        assert_eq!(sku, "IMPELLER-09-812B");
        assert_eq!(expected, "IMPELLER-09-812B__4821.jpg");
    }

    #[test]
    fn test_derive_uses_last_path_segment() {
        // Earlier segments without the suffix are skipped over
        let url = "https://host/catalog/2024/GASKET-7__19.thumb.jpg";
        let (sku, expected) = derive_image_fields(url).unwrap();
        assert_eq!(sku, "GASKET-7");
        assert_eq!(expected, "GASKET-7__19.jpg");
    }

    #[test]
    fn test_derive_greedy_over_embedded_token() {
        // URL-side capture is greedy: the capture runs to the last __<digits>
        let url = "https://host/ABC__1__2.jpg";
        let (sku, expected) = derive_image_fields(url).unwrap();
        assert_eq!(sku, "ABC__1");
        assert_eq!(expected, "ABC__1__2.jpg");
    }

    #[test]
    fn test_derive_no_suffix() {
        assert!(derive_image_fields("https://host/images/plain.jpg").is_none());
    }

    #[test]
    fn test_derive_empty_url() {
        assert!(derive_image_fields("").is_none());
    }

    #[test]
    fn test_derive_requires_path_separator() {
        assert!(derive_image_fields("ABC__123.jpg").is_none());
    }
}
