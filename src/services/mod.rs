pub mod source_catalog;

pub use source_catalog::{SourceCatalog, SourceCounts};
