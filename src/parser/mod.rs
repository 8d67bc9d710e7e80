pub mod base;
pub mod jsonld;
pub mod product;

pub use base::{ParseReport, Parser};
pub use jsonld::JsonLdParser;
pub use product::{ProductCandidate, ProductRecord};
