//! Play a season out along a team's synthesized fixture calls.
//!
//! The dashboard uses this after an analysis: every fixture with a named
//! winner is applied as called, every fixture whose result doesn't matter
//! is decided by a coin flip, and the final table is ranked with the
//! analyzed team's priority tie-break.

use log::warn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::outcomes::FixtureCall;
use crate::standings::{rank_table, FixtureList, Standings};
use crate::team::TeamRecord;

/// Result of one played-out fixture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayedFixture {
    pub winner: String,
    pub loser: String,
}

impl std::fmt::Display for PlayedFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} defeats {}", self.winner, self.loser)
    }
}

/// One row of the played-out final table, in ranked order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FinalStanding {
    pub team: String,
    #[serde(flatten)]
    pub record: TeamRecord,
}

/// Apply `calls` to the remaining fixtures and rank the resulting table.
///
/// `calls` pairs up with the fixture list by position; a missing or
/// unmatchable call falls back to a coin flip, like an irrelevant result.
/// `seed` fixes the coin flips for reproducible playouts.
pub fn play_out_calls(
    standings: &Standings,
    fixtures: &FixtureList,
    team: &str,
    calls: &[FixtureCall],
    seed: Option<u64>,
) -> (Vec<PlayedFixture>, Vec<FinalStanding>) {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut table = standings.records().to_vec();
    let mut results = Vec::with_capacity(fixtures.len());

    for (index, fixture) in fixtures.fixtures().iter().enumerate() {
        let side_a = standings.key(fixture.team_a);
        let side_b = standings.key(fixture.team_b);
        let a_wins = match calls.get(index) {
            Some(FixtureCall::Win(winner)) if winner == side_a => true,
            Some(FixtureCall::Win(winner)) if winner == side_b => false,
            Some(FixtureCall::Win(winner)) => {
                warn!(
                    "call names {:?} but the fixture is {} vs {}; flipping a coin",
                    winner, side_a, side_b
                );
                rng.gen::<bool>()
            }
            Some(FixtureCall::Irrelevant) | None => rng.gen::<bool>(),
        };
        let (winner, loser) = if a_wins {
            (fixture.team_a, fixture.team_b)
        } else {
            (fixture.team_b, fixture.team_a)
        };
        table[winner].record_win();
        table[loser].record_loss();
        results.push(PlayedFixture {
            winner: standings.key(winner).to_string(),
            loser: standings.key(loser).to_string(),
        });
    }

    let priority = standings.index_of(team);
    if priority.is_none() {
        warn!("playout team {:?} not in the snapshot; ranking without priority", team);
    }
    let final_table = rank_table(&table, priority)
        .into_iter()
        .map(|index| FinalStanding {
            team: standings.key(index).to_string(),
            record: table[index],
        })
        .collect();

    (results, final_table)
}
