/// League points awarded for a win. Tie/no-result credit arrives already
/// folded into the snapshot's points column and is never recomputed here.
pub const POINTS_PER_WIN: u32 = 2;

/// Qualification cutoffs the dashboard displays: playoff berth and top-two seed.
pub const DEFAULT_CUTOFFS: [usize; 2] = [4, 2];

/// Hard ceiling on exhaustive enumeration. 2^22 is ~4.2 million full table
/// resolutions per walk; beyond that the sampler is the right tool.
pub const MAX_EXHAUSTIVE_FIXTURES: usize = 22;

/// Default Monte Carlo trial count.
pub const DEFAULT_TRIALS: usize = 100_000;

/// Relative win-split imbalance at or below which a sampled fixture is
/// reported as not mattering, so sampling noise never reads as certainty.
pub const DEFAULT_NOISE_TOLERANCE: f64 = 0.02;

/// Target number of progress windows per run (roughly 1% granularity).
pub const PROGRESS_WINDOWS: u64 = 100;
