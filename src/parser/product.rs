use serde::{Deserialize, Serialize};

/// Fields projected from one structured-data block, all present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCandidate {
    pub name: String,
    pub brand_name: String,
    pub price: String,
}

impl ProductCandidate {
    pub fn into_record(self, source_url: impl Into<String>) -> ProductRecord {
        ProductRecord {
            source_url: source_url.into(),
            name: self.name,
            brand_name: self.brand_name,
            price: self.price,
        }
    }
}

/// One output row. Field order matches the sink columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Product URL")]
    pub source_url: String,
    pub name: String,
    #[serde(rename = "brand name")]
    pub brand_name: String,
    pub price: String,
}
