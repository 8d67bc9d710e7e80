use log::{info, warn};
use reqwest::header::HeaderValue;
use std::fs;
use std::path::Path;

use crate::core::RandomSource;
use crate::{ScraperError, ScraperResult};

/// User-agent strings accepted by the target site, one of which is presented per request.
#[derive(Debug, Clone, Default)]
pub struct IdentityPool {
    identities: Vec<String>,
}

impl IdentityPool {
    /// Reads newline-delimited identities; blank lines and lines that cannot be sent as a
    /// `User-Agent` value are dropped.
    pub fn load<P: AsRef<Path>>(path: P) -> ScraperResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::config(format!(
                "cannot read identity source {}: {}",
                path.display(),
                e
            ))
        })?;

        let pool = Self::from_identities(content.lines());
        info!(
            "Loaded {} identities from {}",
            pool.len(),
            path.display()
        );
        Ok(pool)
    }

    pub fn from_identities<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            identities: identities
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .filter(|s| match HeaderValue::from_str(s) {
                    Ok(_) => true,
                    Err(_) => {
                        warn!("Dropping identity {:?}: not a valid header value", s);
                        false
                    }
                })
                .collect(),
        }
    }

    /// Uniform choice; `None` means the pool is unusable.
    pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        if self.identities.is_empty() {
            return None;
        }
        let index = rng.pick_index(self.identities.len());
        self.identities.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
