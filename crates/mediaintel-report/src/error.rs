use mediaintel_core::ChartKind;
use thiserror::Error;

/// Inconsistent report inputs. Fatal to report generation only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("expected 5 charts, got {found}")]
    ChartCount { found: usize },

    #[error("chart '{0}' appears more than once")]
    DuplicateChart(ChartKind),

    #[error("got {insights} insight sets for {charts} charts")]
    MisalignedInsights { charts: usize, insights: usize },

    #[error("insights for chart '{0}' are not ranked 1, 2, 3")]
    InvalidRanks(ChartKind),

    #[error("no image handle supplied for chart '{0}'")]
    MissingChartImage(ChartKind),
}
