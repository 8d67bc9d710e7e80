use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::ScraperResult;

/// Durable cursor holding the index of the next URL to process.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unparsable content reads as 0.
    pub fn read(&self) -> usize {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                info!(
                    "No checkpoint at {} ({}). Starting from 0.",
                    self.path.display(),
                    e
                );
                return 0;
            }
        };

        match content.trim().parse::<usize>() {
            Ok(index) => {
                info!("Resuming from checkpoint index {}", index);
                index
            }
            Err(e) => {
                warn!(
                    "Unparsable checkpoint {:?} in {}: {}. Starting from 0.",
                    content.trim(),
                    self.path.display(),
                    e
                );
                0
            }
        }
    }

    /// Writes through a sibling temp file and renames it into place.
    pub fn write(&self, index: usize) -> ScraperResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(index.to_string().as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        debug!("Checkpoint advanced to {}", index);
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "checkpoint".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
