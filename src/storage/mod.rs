pub mod base;
pub mod csv;
pub mod memory;

pub use base::{SinkMode, StorageBackend, StorageError};
pub use self::csv::{CsvStorage, OUTPUT_HEADER};
pub use memory::MemoryStorage;
