use crate::constants::{
    DEFAULT_CUTOFFS, DEFAULT_NOISE_TOLERANCE, DEFAULT_TRIALS, MAX_EXHAUSTIVE_FIXTURES,
};

/// Tuning for an analysis run.
///
/// The defaults match the dashboard: top-4 and top-2 cutoffs, a 22-fixture
/// exhaustive ceiling, 100k sampled trials, 2% noise tolerance. Analyses
/// are pure functions of (snapshot, fixtures, config), so two runs with the
/// same config and seed produce the same numbers.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Qualification cutoffs to tally, e.g. [4, 2].
    pub cutoffs: Vec<usize>,
    /// Hard ceiling on exhaustive enumeration; checked before any work.
    pub max_exhaustive_fixtures: usize,
    /// Monte Carlo trial count.
    pub trials: usize,
    /// Seed for the sampler's generator; None draws one from the OS.
    pub seed: Option<u64>,
    /// Relative win-split imbalance treated as noise in sampled runs.
    pub noise_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            cutoffs: DEFAULT_CUTOFFS.to_vec(),
            max_exhaustive_fixtures: MAX_EXHAUSTIVE_FIXTURES,
            trials: DEFAULT_TRIALS,
            seed: None,
            noise_tolerance: DEFAULT_NOISE_TOLERANCE,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        AnalysisConfig::default()
    }

    pub fn with_cutoffs(mut self, cutoffs: Vec<usize>) -> Self {
        self.cutoffs = cutoffs;
        self
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
