//! Filtering and aggregation over canonical records.

pub mod aggregate;
pub mod filter;
pub mod summary;

pub use aggregate::{aggregate, AggregateConfig};
pub use filter::{apply, matches};
pub use summary::{summarize, DatasetSummary};
