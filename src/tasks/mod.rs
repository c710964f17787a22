pub mod batch;
pub mod upsert;

pub use batch::{BatchProcessor, BatchResult};
pub use upsert::{upsert_row, UpsertOutcome};
