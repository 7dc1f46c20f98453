//! Sales pitch prompt construction.

use partscout_catalog::PartRecord;

use crate::anthropic::AnthropicClient;
use crate::error::PitchError;

/// Build the salesperson prompt for a matched part.
pub fn build_pitch_prompt(part: &PartRecord) -> String {
    let sku = part.sku.as_deref().unwrap_or("(not listed)");
    let stock = part
        .stock
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let price = part.price.as_deref().unwrap_or("Contact for pricing");

    format!(
        "I need you to act as a knowledgeable marine supply shop salesperson.\n\
         \n\
         Here's information about a marine part:\n\
         - Name: {name}\n\
         - SKU: {sku}\n\
         - Stock: {stock}\n\
         - Price: {price}\n\
         - Description: {description}\n\
         \n\
         You're a marine supply shop salesperson. The person showed you this \
         part. They quickly want to know if we have it and how much it is. \
         And then ask if you can help any more.",
        name = part.name,
        description = part.description,
    )
}

/// Generate a sales pitch for a matched part.
pub async fn generate_pitch(
    client: &AnthropicClient,
    part: &PartRecord,
) -> Result<String, PitchError> {
    client.generate(&build_pitch_prompt(part)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(price: Option<&str>) -> PartRecord {
        PartRecord {
            name: "Impeller Kit".to_string(),
            sku: Some("PUMP-IMP-09".to_string()),
            stock: Some(12),
            description: "Neoprene impeller with gasket".to_string(),
            price: price.map(str::to_string),
            image_url: None,
        }
    }

    #[test]
    fn test_prompt_carries_all_fields() {
        let prompt = build_pitch_prompt(&part(Some("$38.50")));
        assert!(prompt.contains("- Name: Impeller Kit"));
        assert!(prompt.contains("- SKU: PUMP-IMP-09"));
        assert!(prompt.contains("- Stock: 12"));
        assert!(prompt.contains("- Price: $38.50"));
        assert!(prompt.contains("- Description: Neoprene impeller with gasket"));
    }

    #[test]
    fn test_prompt_price_fallback() {
        let prompt = build_pitch_prompt(&part(None));
        assert!(prompt.contains("- Price: Contact for pricing"));
    }

    #[test]
    fn test_prompt_missing_stock_and_sku() {
        let mut p = part(None);
        p.sku = None;
        p.stock = None;
        let prompt = build_pitch_prompt(&p);
        assert!(prompt.contains("- SKU: (not listed)"));
        assert!(prompt.contains("- Stock: unknown"));
    }
}
