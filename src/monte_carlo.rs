//! Monte Carlo scenario sampling.
//!
//! Used when the remaining fixture count puts exhaustive enumeration out of
//! reach. Each trial draws one uniformly random winner per fixture and runs
//! the same resolve → rank → classify pipeline as the exhaustive walk, so
//! the estimates converge to the exhaustive values as the trial count
//! grows. No qualification path is computed: partial coverage cannot tell
//! "no scenario with k wins qualifies" from "none was drawn".
//!
//! Randomness comes from a single `ChaCha8Rng` owned by the run. Trial
//! assignments are drawn sequentially from it in window-sized batches and
//! evaluated in parallel, so a seeded run reproduces bit for bit at any
//! thread count.

use std::time::Instant;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::constants::PROGRESS_WINDOWS;
use crate::error::AnalysisError;
use crate::progress::{work_windows, Progress, ProgressHook};
use crate::report::{AnalysisMethod, AnalysisReport};
use crate::scenario::EvalContext;
use crate::standings::{FixtureList, Standings};

/// Estimate qualification probabilities and required outcomes from
/// `config.trials` random scenarios.
///
/// # Errors
/// `Cancelled` if a progress hook stops the run. There is no capacity
/// ceiling here; trial count, not fixture count, bounds the work.
pub fn run_monte_carlo(
    standings: &Standings,
    fixtures: &FixtureList,
    config: &AnalysisConfig,
    mut progress: Option<ProgressHook<'_>>,
) -> Result<AnalysisReport, AnalysisError> {
    let ctx = EvalContext::new(standings, fixtures, &config.cutoffs, false);
    let words = ctx.words_per_assignment();
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let total = config.trials as u64;
    let mut tally = ctx.empty_tally();
    let mut batch: Vec<u64> = Vec::new();
    let start = Instant::now();

    for window in work_windows(total, PROGRESS_WINDOWS) {
        let trials = (window.end - window.start) as usize;
        batch.clear();
        batch.extend((0..trials * words).map(|_| rng.gen::<u64>()));

        let part = batch
            .par_chunks(words)
            .fold(
                || (ctx.empty_tally(), Vec::new(), Vec::new()),
                |(mut shard, mut table, mut order), assignment| {
                    ctx.record(assignment, &mut table, &mut order, &mut shard);
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
                completed: window.end,
                total,
                elapsed: start.elapsed(),
            };
            if !hook(snapshot) {
                return Err(AnalysisError::Cancelled {
                    completed: window.end,
                    total,
                });
            }
        }
    }

    debug!(
        "monte carlo over {} fixtures: {} trials counted, {} discarded in {:?}",
        fixtures.len(),
        tally.counted,
        tally.discarded,
        start.elapsed()
    );
    Ok(AnalysisReport::from_tallies(
        AnalysisMethod::MonteCarlo,
        standings,
        fixtures,
        &tally,
        Some(config.noise_tolerance),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhaustive::run_exhaustive;
    use crate::team::TeamRecord;
    use statrs::distribution::{ContinuousCDF, Normal};

    fn four_team_league() -> (Standings, FixtureList) {
        let standings = Standings::from_rows([
            ("A".to_string(), TeamRecord::new(2, 2, 4)),
            ("B".to_string(), TeamRecord::new(2, 1, 2)),
            ("C".to_string(), TeamRecord::new(2, 1, 2)),
            ("D".to_string(), TeamRecord::new(2, 0, 0)),
        ]);
        let fixtures =
            FixtureList::resolve(&standings, [("A", "B"), ("C", "D"), ("B", "C"), ("D", "A")]);
        (standings, fixtures)
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let (standings, fixtures) = four_team_league();
        let config = AnalysisConfig::default().with_trials(2_000).with_seed(42);
        let first = run_monte_carlo(&standings, &fixtures, &config, None).unwrap();
        let second = run_monte_carlo(&standings, &fixtures, &config, None).unwrap();
        assert_eq!(first.overall, second.overall);
        assert_eq!(first.teams, second.teams);
    }

    #[test]
    fn test_estimates_converge_to_exhaustive() {
        let (standings, fixtures) = four_team_league();
        let cutoffs = vec![2usize];
        let exact_config = AnalysisConfig::default().with_cutoffs(cutoffs.clone());
        let exact = run_exhaustive(&standings, &fixtures, &exact_config, None).unwrap();

        let trials = 100_000usize;
        let sampled_config = AnalysisConfig::default()
            .with_cutoffs(cutoffs)
            .with_trials(trials)
            .with_seed(7);
        let sampled = run_monte_carlo(&standings, &fixtures, &sampled_config, None).unwrap();

        // Bound the sampling error at 4 standard errors (normal tail well
        // past 0.9999), in percentage points.
        let z = Normal::new(0.0, 1.0).unwrap().inverse_cdf(0.99997);
        for key in standings.keys() {
            let p = exact.percent(key, 2).unwrap() / 100.0;
            let estimate = sampled.percent(key, 2).unwrap();
            let bound = z * (p * (1.0 - p) / trials as f64).sqrt() * 100.0;
            assert!(
                (estimate - exact.percent(key, 2).unwrap()).abs() <= bound.max(0.05),
                "{}: sampled {:.3}% vs exact {:.3}% (bound {:.3})",
                key,
                estimate,
                exact.percent(key, 2).unwrap(),
                bound
            );
        }
    }

    #[test]
    fn test_no_qualification_path() {
        let (standings, fixtures) = four_team_league();
        let config = AnalysisConfig::default().with_trials(500).with_seed(3);
        let report = run_monte_carlo(&standings, &fixtures, &config, None).unwrap();
        assert!(report.qualification_path.is_none());
        assert_eq!(report.method, AnalysisMethod::MonteCarlo);
    }

    #[test]
    fn test_zero_trials_degrade_to_neutral() {
        let (standings, fixtures) = four_team_league();
        let config = AnalysisConfig::default().with_trials(0).with_seed(1);
        let report = run_monte_carlo(&standings, &fixtures, &config, None).unwrap();
        assert_eq!(report.scenarios, 0);
        assert_eq!(report.percent("A", 4), Some(0.0), "no division fault");
        let analysis = &report.teams[&4]["A"];
        assert!(analysis
            .fixtures
            .iter()
            .all(|f| f.call == crate::outcomes::FixtureCall::Irrelevant));
    }

    #[test]
    fn test_certain_leader_measures_certain() {
        // A has already finished its season clear of everyone else's
        // ceiling, so every trial must count it in the top four.
        let standings = Standings::from_rows([
            ("A".to_string(), TeamRecord::new(4, 4, 8)),
            ("B".to_string(), TeamRecord::new(3, 0, 0)),
            ("C".to_string(), TeamRecord::new(3, 0, 0)),
        ]);
        let fixtures = FixtureList::resolve(&standings, [("B", "C")]);
        let config = AnalysisConfig::default().with_trials(1_000).with_seed(11);
        let report = run_monte_carlo(&standings, &fixtures, &config, None).unwrap();
        assert_eq!(report.percent("A", 4), Some(100.0));
        assert_eq!(report.scenarios, 1_000);
    }

    #[test]
    fn test_cancellation() {
        let (standings, fixtures) = four_team_league();
        let config = AnalysisConfig::default().with_trials(10_000).with_seed(5);
        let mut hook = |_: Progress| false;
        let result = run_monte_carlo(&standings, &fixtures, &config, Some(&mut hook));
        assert!(matches!(result, Err(AnalysisError::Cancelled { .. })));
    }
}
