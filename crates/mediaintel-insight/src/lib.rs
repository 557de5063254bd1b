//! Insight synthesis for mediaintel.
//!
//! [`rules`] computes three ranked, metric-backed findings per chart. The
//! [`Synthesizer`] optionally hands those drafts to an enrichment port for
//! rewording, and [`narrative`] builds the report-level summary and
//! recommendations.

pub mod narrative;
pub mod rules;
pub mod synthesizer;

pub use narrative::{Narrative, NarrativeSource};
pub use rules::{describe, draft_insights, engagement_trend, volume_trend, Trend};
pub use synthesizer::Synthesizer;
