use super::base::{SinkMode, StorageBackend, StorageError};
use crate::parser::ProductRecord;
use async_trait::async_trait;
use csv::{Writer, WriterBuilder};
use log::{info, warn};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

pub const OUTPUT_HEADER: [&str; 4] = ["Product URL", "name", "brand name", "price"];

pub struct CsvStorage {
    path: PathBuf,
    mode: SinkMode,
    writer: Option<Writer<File>>,
}

impl CsvStorage {
    pub fn new<P: AsRef<Path>>(path: P, mode: SinkMode) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            mode,
            writer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn has_rows(&self) -> bool {
        fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    fn writer(&mut self) -> Result<&mut Writer<File>, StorageError> {
        self.writer.as_mut().ok_or(StorageError::NotInitialized)
    }
}

#[async_trait]
impl StorageBackend for CsvStorage {
    async fn initialize(&mut self, resume: bool) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let append = resume && self.mode == SinkMode::ResumeAppend && self.has_rows();
        if resume && self.mode == SinkMode::Truncate {
            warn!(
                "Truncating {} on a resumed run: rows written by the previous run are discarded",
                self.path.display()
            );
        }

        let file = if append {
            info!("Appending to existing output {}", self.path.display());
            OpenOptions::new().append(true).open(&self.path)?
        } else {
            info!("Starting new output {}", self.path.display());
            File::create(&self.path)?
        };

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if !append {
            writer.write_record(OUTPUT_HEADER)?;
            writer.flush()?;
        }
        self.writer = Some(writer);
        Ok(())
    }

    async fn store(&mut self, record: &ProductRecord) -> Result<(), StorageError> {
        self.writer()?.serialize(record)?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), StorageError> {
        self.writer()?.flush()?;
        Ok(())
    }
}
