use thiserror::Error;

/// Failures surfaced to the caller. Scenario-level integrity violations and
/// empty result sets are not errors; they degrade to neutral statistics so
/// the dashboard always has something to display.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Exhaustive enumeration was requested above the fixture ceiling.
    /// Whether to fall back to sampling is the caller's decision.
    #[error("{fixtures} remaining fixtures exceed the exhaustive limit of {limit}")]
    CapacityExceeded { fixtures: usize, limit: usize },

    /// A progress hook asked for the run to stop.
    #[error("analysis cancelled after {completed} of {total} scenarios")]
    Cancelled { completed: u64, total: u64 },
}
