use log::{debug, trace, warn};
use scraper::{Html, Selector};
use serde_json::Value;

use super::{ParseReport, Parser, ProductCandidate};
use crate::ScraperResult;

const LD_JSON_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// Extracts products from the `application/ld+json` blocks of a page.
///
/// A block contributes a product only when `name`, `brand.name` and `offers.price` are all
/// present and non-empty. Blocks that fail to decode are logged and skipped; they never affect
/// their siblings.
pub struct JsonLdParser {
    selector: Selector,
}

impl Default for JsonLdParser {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonLdParser {
    pub fn new() -> Self {
        Self {
            selector: Selector::parse(LD_JSON_SELECTOR).expect("static JSON-LD selector"),
        }
    }

    fn decode_block(text: &str) -> ScraperResult<Value> {
        Ok(serde_json::from_str(text.trim())?)
    }

    fn project(value: &Value) -> Option<ProductCandidate> {
        let name = scalar_text(value.get("name"))?;
        let brand_name = scalar_text(value.get("brand").and_then(|b| b.get("name")))?;
        let price = scalar_text(value.get("offers").and_then(|o| o.get("price")))?;

        Some(ProductCandidate {
            name,
            brand_name,
            price,
        })
    }
}

/// Strings (trimmed, non-empty) and numbers count as present; anything else is absent.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Parser for JsonLdParser {
    fn parse(&self, markup: &str) -> ParseReport {
        let document = Html::parse_document(markup);
        let mut report = ParseReport::default();

        for (position, element) in document.select(&self.selector).enumerate() {
            report.blocks += 1;
            let text = element.text().collect::<String>();
            trace!("JSON-LD block {}: {}", position, text);

            let value = match Self::decode_block(&text) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Skipping JSON-LD block {}: {}", position, e);
                    report.decode_errors += 1;
                    continue;
                }
            };

            // A top-level array holds several entities in one block.
            let entities: Vec<&Value> = match &value {
                Value::Array(items) => items.iter().collect(),
                other => vec![other],
            };

            for entity in entities.into_iter().filter(|v| v.is_object()) {
                match Self::project(entity) {
                    Some(candidate) => report.products.push(candidate),
                    None => debug!("JSON-LD block {} has no complete product", position),
                }
            }
        }

        report
    }
}
