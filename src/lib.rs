//! Playoff Core - qualification scenario engine for round-robin points tables.
//!
//! Given a standings snapshot and the season's remaining fixtures, the crate
//! either enumerates every possible resolution (up to a hard fixture
//! ceiling) or samples them, and reports per team: the probability of
//! finishing inside each configured cutoff, which fixtures actually matter
//! to that outcome, and the minimum number of its own wins that can or will
//! qualify it. Outputs are plain serializable data; the dashboard frontend
//! consumes them through the optional PyO3 bindings (cargo feature
//! `python`).

pub mod config;
pub mod constants;
pub mod error;
pub mod exhaustive;
pub mod monte_carlo;
pub mod outcomes;
pub mod path;
pub mod progress;
pub mod report;
pub mod scenario;
pub mod simulate;
pub mod standings;
pub mod team;

#[cfg(feature = "python")]
mod python;

pub use config::AnalysisConfig;
pub use constants::{DEFAULT_CUTOFFS, DEFAULT_TRIALS, MAX_EXHAUSTIVE_FIXTURES, POINTS_PER_WIN};
pub use error::AnalysisError;
pub use exhaustive::run_exhaustive;
pub use monte_carlo::run_monte_carlo;
pub use outcomes::{synthesize_call, FixtureCall};
pub use path::QualificationPath;
pub use progress::{Progress, ProgressHook};
pub use report::{AnalysisMethod, AnalysisReport, FixtureOutcome, TeamAnalysis};
pub use simulate::{play_out_calls, FinalStanding, PlayedFixture};
pub use standings::{qualifies, rank_table, Fixture, FixtureList, Standings};
pub use team::TeamRecord;
