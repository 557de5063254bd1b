//! Report assembly for mediaintel.
//!
//! [`assemble`] validates and orders the five chart sections; the resulting
//! [`Report`] renders to a reproducible markdown body and serializes to JSON.

pub mod error;
pub mod render;
pub mod report;

pub use error::AssemblyError;
pub use report::{assemble, ChartImageRef, Report, ReportInputs, ReportSection};
