//! Exhaustive scenario enumeration.
//!
//! Visits every one of the 2^N outcome assignments exactly once, in binary
//! counting order, and accumulates all teams' tallies for every cutoff in
//! that single walk. Re-enumerating per team would multiply the cost by the
//! team count for nothing; one pass collects everything.
//!
//! The walk runs in sequential progress windows (roughly 1% of the work
//! each); inside a window the scenarios are sharded with rayon into private
//! tallies merged by addition, so the result is identical at any thread
//! count. Progress hooks fire and cancellation is honored between windows.

use std::time::Instant;

use log::debug;
use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::constants::PROGRESS_WINDOWS;
use crate::error::AnalysisError;
use crate::progress::{work_windows, Progress, ProgressHook};
use crate::report::{AnalysisMethod, AnalysisReport};
use crate::scenario::EvalContext;
use crate::standings::{FixtureList, Standings};

/// Enumerate all 2^N assignments and report probabilities, required
/// outcomes, and qualification paths.
///
/// # Errors
/// `CapacityExceeded` if the fixture count is above the configured ceiling
/// (checked before any work starts; falling back to sampling is the
/// caller's decision), `Cancelled` if a progress hook stops the run.
pub fn run_exhaustive(
    standings: &Standings,
    fixtures: &FixtureList,
    config: &AnalysisConfig,
    mut progress: Option<ProgressHook<'_>>,
) -> Result<AnalysisReport, AnalysisError> {
    let fixture_count = fixtures.len();
    // 2^N must also fit the u64 scenario counter.
    let limit = config.max_exhaustive_fixtures.min(63);
    if fixture_count > limit {
        return Err(AnalysisError::CapacityExceeded {
            fixtures: fixture_count,
            limit,
        });
    }

    let total = 1u64 << fixture_count;
    let ctx = EvalContext::new(standings, fixtures, &config.cutoffs, true);
    let mut tally = ctx.empty_tally();
    let start = Instant::now();

    for window in work_windows(total, PROGRESS_WINDOWS) {
        let completed = window.end;
        let part = window
            .into_par_iter()
            .fold(
                || (ctx.empty_tally(), Vec::new(), Vec::new()),
                |(mut shard, mut table, mut order), mask| {
                    ctx.record(&[mask], &mut table, &mut order, &mut shard);
                    (shard, table, order)
                },
            )
            .map(|(shard, _, _)| shard)
            .reduce(
                || ctx.empty_tally(),
                |mut a, b| {
                    a.merge(&b);
                    a
                },
            );
        tally.merge(&part);

        if let Some(ref mut hook) = progress {
            let snapshot = Progress {
                completed,
                total,
                elapsed: start.elapsed(),
            };
            if !hook(snapshot) {
                return Err(AnalysisError::Cancelled { completed, total });
            }
        }
    }

    debug!(
        "exhaustive walk over {} fixtures: {} scenarios counted, {} discarded in {:?}",
        fixture_count,
        tally.counted,
        tally.discarded,
        start.elapsed()
    );
    Ok(AnalysisReport::from_tallies(
        AnalysisMethod::Exhaustive,
        standings,
        fixtures,
        &tally,
        None,
    ))
}
