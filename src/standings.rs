use std::collections::HashMap;

use log::warn;

use crate::team::TeamRecord;

/// Points-table snapshot at the moment of analysis.
///
/// Team order is preserved from construction and serves as the final
/// tie-break, so identical inputs always rank identically. The snapshot is
/// never mutated by an analysis; every scenario works on a private copy of
/// the record table.
#[derive(Clone, Debug, Default)]
pub struct Standings {
    keys: Vec<String>,
    records: Vec<TeamRecord>,
    index: HashMap<String, usize>,
}

impl Standings {
    pub fn new() -> Self {
        Standings::default()
    }

    /// Build a snapshot from (key, record) rows.
    ///
    /// Rows that fail the basic shape check (more wins than matches played)
    /// are skipped individually; full input validation is the loader's job.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, TeamRecord)>,
    {
        let mut standings = Standings::new();
        for (key, record) in rows {
            standings.push(key, record);
        }
        standings
    }

    /// Append one team. Returns false (and keeps the table unchanged) if the
    /// row is malformed or the key is already present.
    pub fn push(&mut self, key: String, record: TeamRecord) -> bool {
        if record.wins > record.matches_played {
            warn!(
                "skipping standings row for {:?}: {} wins in {} matches",
                key, record.wins, record.matches_played
            );
            return false;
        }
        if self.index.contains_key(&key) {
            warn!("skipping duplicate standings row for {:?}", key);
            return false;
        }
        self.index.insert(key.clone(), self.keys.len());
        self.keys.push(key);
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn key(&self, index: usize) -> &str {
        &self.keys[index]
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn records(&self) -> &[TeamRecord] {
        &self.records
    }
}

/// An unplayed pairing, resolved to snapshot indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fixture {
    pub team_a: usize,
    pub team_b: usize,
}

/// Ordered list of remaining fixtures.
///
/// Pairings are resolved against the snapshot once, at construction, so the
/// scenario loop never revalidates keys.
#[derive(Clone, Debug, Default)]
pub struct FixtureList {
    fixtures: Vec<Fixture>,
    labels: Vec<String>,
}

impl FixtureList {
    /// Resolve (team A key, team B key) pairs against the snapshot.
    ///
    /// Pairings that name a team missing from the snapshot are dropped with
    /// a warning; filtering those out properly is the loader's contract.
    pub fn resolve<'a, I>(standings: &Standings, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut fixtures = Vec::new();
        let mut labels = Vec::new();
        for (a, b) in pairs {
            match (standings.index_of(a), standings.index_of(b)) {
                (Some(team_a), Some(team_b)) => {
                    fixtures.push(Fixture { team_a, team_b });
                    labels.push(format!("{} vs {}", a, b));
                }
                _ => warn!("dropping fixture {:?} vs {:?}: unknown team", a, b),
            }
        }
        FixtureList { fixtures, labels }
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Display label for fixture `index`, e.g. "Chennai vs Kolkata".
    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// How many remaining fixtures each team appears in.
    pub fn appearances(&self, standings: &Standings) -> Vec<u32> {
        let mut counts = vec![0u32; standings.len()];
        for fixture in &self.fixtures {
            counts[fixture.team_a] += 1;
            counts[fixture.team_b] += 1;
        }
        counts
    }

    /// Total matches each team will have played once every fixture resolves.
    pub fn final_match_counts(&self, standings: &Standings) -> Vec<u32> {
        let mut counts: Vec<u32> = standings
            .records()
            .iter()
            .map(|r| r.matches_played)
            .collect();
        for fixture in &self.fixtures {
            counts[fixture.team_a] += 1;
            counts[fixture.team_b] += 1;
        }
        counts
    }
}

/// Order table indices by points descending, then (if given) the priority
/// team ahead of any rival on equal points, then wins descending.
///
/// The priority rule models the assumption that real-world tie-breaks fall
/// the analyzed team's way when points and wins tie. The sort is stable, so
/// any remaining ties keep snapshot order.
pub fn rank_into(table: &[TeamRecord], priority: Option<usize>, order: &mut Vec<usize>) {
    order.clear();
    order.extend(0..table.len());
    order.sort_by(|&a, &b| {
        table[b]
            .points
            .cmp(&table[a].points)
            .then_with(|| priority_rank(a, priority).cmp(&priority_rank(b, priority)))
            .then_with(|| table[b].wins.cmp(&table[a].wins))
    });
}

/// Allocating convenience wrapper around [`rank_into`].
pub fn rank_table(table: &[TeamRecord], priority: Option<usize>) -> Vec<usize> {
    let mut order = Vec::with_capacity(table.len());
    rank_into(table, priority, &mut order);
    order
}

fn priority_rank(index: usize, priority: Option<usize>) -> u8 {
    u8::from(priority != Some(index))
}

/// Does `team` finish within the first `cutoff` placements?
pub fn qualifies(placements: &[usize], cutoff: usize, team: usize) -> bool {
    placements.iter().take(cutoff).any(|&t| t == team)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn league() -> Standings {
        Standings::from_rows([
            ("Chennai".to_string(), TeamRecord::new(2, 2, 4)),
            ("Mumbai".to_string(), TeamRecord::new(2, 1, 2)),
            ("Kolkata".to_string(), TeamRecord::new(2, 1, 2)),
            ("Delhi".to_string(), TeamRecord::new(2, 0, 0)),
        ])
    }

    #[test]
    fn test_from_rows_preserves_order() {
        let standings = league();
        assert_eq!(standings.len(), 4);
        assert_eq!(standings.key(0), "Chennai");
        assert_eq!(standings.key(3), "Delhi");
        assert_eq!(standings.index_of("Kolkata"), Some(2));
    }

    #[test]
    fn test_malformed_row_skipped() {
        let standings = Standings::from_rows([
            ("Chennai".to_string(), TeamRecord::new(1, 2, 4)), // wins > matches
            ("Mumbai".to_string(), TeamRecord::new(2, 1, 2)),
        ]);
        assert_eq!(standings.len(), 1, "only the well-formed row should land");
        assert_eq!(standings.key(0), "Mumbai");
    }

    #[test]
    fn test_duplicate_key_skipped() {
        let standings = Standings::from_rows([
            ("Chennai".to_string(), TeamRecord::new(2, 2, 4)),
            ("Chennai".to_string(), TeamRecord::new(2, 0, 0)),
        ]);
        assert_eq!(standings.len(), 1);
        assert_eq!(standings.records()[0].wins, 2, "first row wins");
    }

    #[test]
    fn test_resolve_drops_unknown_team() {
        let standings = league();
        let fixtures =
            FixtureList::resolve(&standings, [("Chennai", "Mumbai"), ("Chennai", "Pune")]);
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures.label(0), "Chennai vs Mumbai");
    }

    #[test]
    fn test_final_match_counts() {
        let standings = league();
        let fixtures =
            FixtureList::resolve(&standings, [("Chennai", "Mumbai"), ("Chennai", "Delhi")]);
        assert_eq!(fixtures.final_match_counts(&standings), vec![4, 3, 2, 3]);
        assert_eq!(fixtures.appearances(&standings), vec![2, 1, 0, 1]);
    }

    #[test]
    fn test_rank_by_points_then_wins() {
        let table = [
            TeamRecord::new(3, 1, 3), // points 3
            TeamRecord::new(3, 2, 4), // points 4
            TeamRecord::new(3, 1, 4), // points 4, fewer wins
        ];
        assert_eq!(rank_table(&table, None), vec![1, 2, 0]);
    }

    #[test]
    fn test_priority_beats_wins_on_equal_points() {
        let table = [
            TeamRecord::new(3, 2, 4),
            TeamRecord::new(3, 1, 4), // fewer wins, but under analysis
        ];
        assert_eq!(rank_table(&table, None), vec![0, 1]);
        assert_eq!(
            rank_table(&table, Some(1)),
            vec![1, 0],
            "the analyzed team sorts first on equal points"
        );
    }

    #[test]
    fn test_priority_does_not_override_points() {
        let table = [TeamRecord::new(3, 3, 6), TeamRecord::new(3, 1, 2)];
        assert_eq!(
            rank_table(&table, Some(1)),
            vec![0, 1],
            "priority only applies within a points tie"
        );
    }

    #[test]
    fn test_full_ties_keep_snapshot_order() {
        let table = [
            TeamRecord::new(2, 1, 2),
            TeamRecord::new(2, 1, 2),
            TeamRecord::new(2, 1, 2),
        ];
        assert_eq!(rank_table(&table, None), vec![0, 1, 2]);
    }

    #[test]
    fn test_qualifies_cutoff() {
        let placements = vec![2, 0, 1, 3];
        assert!(qualifies(&placements, 2, 0));
        assert!(!qualifies(&placements, 2, 1));
        assert!(qualifies(&placements, 4, 3));
        assert!(!qualifies(&placements, 0, 2));
    }
}
