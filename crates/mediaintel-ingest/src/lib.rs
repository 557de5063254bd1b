//! Ingestion for mediaintel: reads exported campaign files and normalizes
//! their rows into [`mediaintel_core::CanonicalRecord`]s.
//!
//! Reading ([`reader`]) only splits a file into labelled cells. All type
//! decisions happen once, in [`normalize`]: column aliasing, date parsing,
//! sentiment bucketing, counter parsing, and de-duplication.

pub mod dates;
pub mod error;
pub mod lexicon;
pub mod normalize;
pub mod raw;
pub mod reader;
pub mod values;

pub use dates::DateParser;
pub use error::IngestError;
pub use lexicon::Lexicon;
pub use normalize::{
    normalize, AliasTable, ColumnMapping, NormalizeConfig, Normalized, RejectReason,
    RejectionReport, RowRejection,
};
pub use raw::{normalize_label, RawRow, RawTable, RawValue};
pub use reader::{read_delimited, read_path};
