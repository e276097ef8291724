//! One scenario = one assignment of a winner to every remaining fixture.
//!
//! Assignments are packed 64 fixtures per `u64` word; bit `i` of the stream
//! set means fixture `i`'s team A wins. The exhaustive walker hands in a
//! single counting word, the sampler hands in freshly drawn words, and both
//! feed the same resolve → rank → classify → tally pipeline.

use crate::standings::{qualifies, rank_into, Fixture, FixtureList, Standings};
use crate::team::TeamRecord;

/// Read fixture `index`'s winner bit out of a packed assignment.
#[inline]
pub fn assignment_bit(words: &[u64], index: usize) -> bool {
    words[index >> 6] >> (index & 63) & 1 == 1
}

/// Apply an assignment to `table`, the caller's private copy of the
/// snapshot: winner +1 win / +2 points / +1 match, loser +1 match.
pub fn apply_assignment(table: &mut [TeamRecord], fixtures: &[Fixture], words: &[u64]) {
    for (index, fixture) in fixtures.iter().enumerate() {
        let (winner, loser) = if assignment_bit(words, index) {
            (fixture.team_a, fixture.team_b)
        } else {
            (fixture.team_b, fixture.team_a)
        };
        table[winner].record_win();
        table[loser].record_loss();
    }
}

/// Completeness check: every team's played count reached its scheduled
/// total. A resolved scenario failing this is discarded from every tally.
pub fn is_complete(table: &[TeamRecord], expected: &[u32]) -> bool {
    table
        .iter()
        .zip(expected)
        .all(|(record, &total)| record.matches_played == total)
}

/// Fixed-shape counters accumulated over a walk.
///
/// Every cell exists up front and shards merge by plain addition, so the
/// totals are identical however the walk is split across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallySet {
    cutoffs: Vec<usize>,
    fixture_count: usize,
    /// Valid scenarios behind every other counter.
    pub counted: u64,
    /// Scenarios discarded by the completeness check.
    pub discarded: u64,
    /// Qualification hits, indexed `[team][cutoff]`.
    hits: Vec<u64>,
    /// Among a team's qualifying scenarios, how often each fixture fell to
    /// side A or side B; indexed `[team][cutoff][fixture][side]`.
    fixture_wins: Vec<u64>,
    path: Option<PathTallies>,
}

impl TallySet {
    fn new(teams: usize, cutoffs: Vec<usize>, fixture_count: usize, path: Option<PathTallies>) -> Self {
        let hits = vec![0; teams * cutoffs.len()];
        let fixture_wins = vec![0; teams * cutoffs.len() * fixture_count * 2];
        TallySet {
            cutoffs,
            fixture_count,
            counted: 0,
            discarded: 0,
            hits,
            fixture_wins,
            path,
        }
    }

    pub fn cutoffs(&self) -> &[usize] {
        &self.cutoffs
    }

    pub fn hits(&self, team: usize, cutoff_index: usize) -> u64 {
        self.hits[team * self.cutoffs.len() + cutoff_index]
    }

    /// Qualification probability as a 0-100 percentage; 0.0 when nothing
    /// was counted, never a division fault.
    pub fn percent(&self, team: usize, cutoff_index: usize) -> f64 {
        if self.counted == 0 {
            0.0
        } else {
            self.hits(team, cutoff_index) as f64 / self.counted as f64 * 100.0
        }
    }

    /// (team A wins, team B wins) for one fixture among the scenarios where
    /// `team` qualified at the given cutoff.
    pub fn fixture_split(&self, team: usize, cutoff_index: usize, fixture: usize) -> (u64, u64) {
        let base = self.fixture_base(team, cutoff_index, fixture);
        (self.fixture_wins[base], self.fixture_wins[base + 1])
    }

    pub fn path(&self) -> Option<&PathTallies> {
        self.path.as_ref()
    }

    /// Fold another shard's counters into this one.
    pub fn merge(&mut self, other: &TallySet) {
        debug_assert_eq!(self.hits.len(), other.hits.len());
        self.counted += other.counted;
        self.discarded += other.discarded;
        for (a, b) in self.hits.iter_mut().zip(&other.hits) {
            *a += b;
        }
        for (a, b) in self.fixture_wins.iter_mut().zip(&other.fixture_wins) {
            *a += b;
        }
        if let (Some(path), Some(other_path)) = (self.path.as_mut(), other.path.as_ref()) {
            path.merge(other_path);
        }
    }

    #[inline]
    fn fixture_base(&self, team: usize, cutoff_index: usize, fixture: usize) -> usize {
        ((team * self.cutoffs.len() + cutoff_index) * self.fixture_count + fixture) * 2
    }

    #[inline]
    fn add_hit(&mut self, team: usize, cutoff_index: usize) {
        self.hits[team * self.cutoffs.len() + cutoff_index] += 1;
    }

    #[inline]
    fn add_fixture_win(&mut self, team: usize, cutoff_index: usize, fixture: usize, side_a: bool) {
        let base = self.fixture_base(team, cutoff_index, fixture);
        self.fixture_wins[base + usize::from(!side_a)] += 1;
    }
}

/// Scenario counts grouped by how many of a team's own matches it won,
/// feeding the minimum-wins qualification path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTallies {
    /// Valid scenarios with exactly k own wins, indexed `[team][k]`.
    totals: Vec<Vec<u64>>,
    /// Qualifying scenarios with exactly k own wins, `[team][cutoff][k]`.
    qualified: Vec<Vec<Vec<u64>>>,
}

impl PathTallies {
    fn new(own_counts: &[u32], cutoff_count: usize) -> Self {
        let totals = own_counts
            .iter()
            .map(|&n| vec![0; n as usize + 1])
            .collect::<Vec<_>>();
        let qualified = own_counts
            .iter()
            .map(|&n| vec![vec![0; n as usize + 1]; cutoff_count])
            .collect();
        PathTallies { totals, qualified }
    }

    /// Valid-scenario counts per own-win count for one team.
    pub fn totals(&self, team: usize) -> &[u64] {
        &self.totals[team]
    }

    /// Qualifying-scenario counts per own-win count for one team and cutoff.
    pub fn qualified(&self, team: usize, cutoff_index: usize) -> &[u64] {
        &self.qualified[team][cutoff_index]
    }

    fn merge(&mut self, other: &PathTallies) {
        for (a, b) in self.totals.iter_mut().zip(&other.totals) {
            for (x, y) in a.iter_mut().zip(b) {
                *x += y;
            }
        }
        for (a, b) in self.qualified.iter_mut().zip(&other.qualified) {
            for (ac, bc) in a.iter_mut().zip(b) {
                for (x, y) in ac.iter_mut().zip(bc) {
                    *x += y;
                }
            }
        }
    }
}

/// Everything a walk needs to evaluate one assignment: the snapshot, the
/// resolved fixtures, the cutoffs, the expected final match counts, and the
/// per-team fixture bitmasks that make "own wins" a popcount.
pub struct EvalContext<'a> {
    standings: &'a Standings,
    fixtures: &'a FixtureList,
    cutoffs: Vec<usize>,
    expected: Vec<u32>,
    words: usize,
    track_path: bool,
    /// Per team, the fixture bits where it plays as side A / side B.
    a_masks: Vec<Vec<u64>>,
    b_masks: Vec<Vec<u64>>,
    own_counts: Vec<u32>,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        standings: &'a Standings,
        fixtures: &'a FixtureList,
        cutoffs: &[usize],
        track_path: bool,
    ) -> Self {
        let teams = standings.len();
        let words = (fixtures.len() + 63) / 64 + usize::from(fixtures.is_empty());
        let mut a_masks = vec![vec![0u64; words]; teams];
        let mut b_masks = vec![vec![0u64; words]; teams];
        for (index, fixture) in fixtures.fixtures().iter().enumerate() {
            a_masks[fixture.team_a][index >> 6] |= 1 << (index & 63);
            b_masks[fixture.team_b][index >> 6] |= 1 << (index & 63);
        }
        EvalContext {
            standings,
            fixtures,
            cutoffs: cutoffs.to_vec(),
            expected: fixtures.final_match_counts(standings),
            words,
            track_path,
            a_masks,
            b_masks,
            own_counts: fixtures.appearances(standings),
        }
    }

    /// Words per packed assignment (at least one, even with no fixtures).
    pub fn words_per_assignment(&self) -> usize {
        self.words
    }

    pub fn empty_tally(&self) -> TallySet {
        let path = self
            .track_path
            .then(|| PathTallies::new(&self.own_counts, self.cutoffs.len()));
        TallySet::new(
            self.standings.len(),
            self.cutoffs.clone(),
            self.fixtures.len(),
            path,
        )
    }

    /// How many of `team`'s own matches the assignment has it winning.
    #[inline]
    fn own_wins(&self, team: usize, words: &[u64]) -> usize {
        self.a_masks[team]
            .iter()
            .zip(&self.b_masks[team])
            .zip(words)
            .map(|((&a, &b), &w)| ((w & a) | (!w & b)).count_ones() as usize)
            .sum()
    }

    /// Run one assignment through resolve → rank → classify and fold the
    /// result into `tally`. Returns false if the scenario was discarded by
    /// the completeness check. `table` and `order` are scratch buffers the
    /// caller reuses across scenarios.
    pub fn record(
        &self,
        words: &[u64],
        table: &mut Vec<TeamRecord>,
        order: &mut Vec<usize>,
        tally: &mut TallySet,
    ) -> bool {
        debug_assert_eq!(words.len(), self.words);
        table.clear();
        table.extend_from_slice(self.standings.records());
        apply_assignment(table, self.fixtures.fixtures(), words);
        if !is_complete(table, &self.expected) {
            tally.discarded += 1;
            return false;
        }
        tally.counted += 1;

        for team in 0..table.len() {
            rank_into(table, Some(team), order);
            let own_wins = if self.track_path {
                let k = self.own_wins(team, words);
                if let Some(path) = tally.path.as_mut() {
                    path.totals[team][k] += 1;
                }
                k
            } else {
                0
            };
            for cutoff_index in 0..self.cutoffs.len() {
                if !qualifies(order, self.cutoffs[cutoff_index], team) {
                    continue;
                }
                tally.add_hit(team, cutoff_index);
                for fixture in 0..self.fixtures.len() {
                    tally.add_fixture_win(
                        team,
                        cutoff_index,
                        fixture,
                        assignment_bit(words, fixture),
                    );
                }
                if self.track_path {
                    if let Some(path) = tally.path.as_mut() {
                        path.qualified[team][cutoff_index][own_wins] += 1;
                    }
                }
            }
        }
        true
    }
}
