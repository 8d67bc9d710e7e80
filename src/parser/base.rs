use super::ProductCandidate;

/// Outcome of scanning one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub products: Vec<ProductCandidate>,
    /// Structured-data blocks found on the page.
    pub blocks: usize,
    /// Blocks skipped because they were not valid JSON.
    pub decode_errors: usize,
}

pub trait Parser: Send + Sync {
    fn parse(&self, markup: &str) -> ParseReport;

    fn extract(&self, markup: &str) -> Vec<ProductCandidate> {
        self.parse(markup).products
    }
}
