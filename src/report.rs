use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::outcomes::{synthesize_call, FixtureCall};
use crate::path::QualificationPath;
use crate::scenario::TallySet;
use crate::standings::{FixtureList, Standings};

/// How a report was computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AnalysisMethod {
    Exhaustive,
    #[serde(rename = "Monte Carlo")]
    MonteCarlo,
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMethod::Exhaustive => write!(f, "Exhaustive"),
            AnalysisMethod::MonteCarlo => write!(f, "Monte Carlo"),
        }
    }
}

/// One fixture's entry in a team's outcome table.
///
/// An ordered list, not a label-keyed map: the same pairing can occur twice
/// in a season and a map would silently collide.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FixtureOutcome {
    /// Display label, e.g. "Chennai vs Kolkata".
    pub label: String,
    pub call: FixtureCall,
}

/// A team's analysis for one cutoff.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamAnalysis {
    /// Qualification probability, 0-100.
    pub percent: f64,
    pub fixtures: Vec<FixtureOutcome>,
}

/// The JSON-serializable envelope handed to collaborators.
///
/// All maps are keyed by team key or by cutoff; the dashboard flattens them
/// into its own display shape. `qualification_path` is present only for
/// exhaustive runs.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub method: AnalysisMethod,
    pub computed_at: DateTime<Utc>,
    pub fixture_count: usize,
    /// Valid scenarios (or trials) behind the numbers.
    pub scenarios: u64,
    /// team key -> cutoff -> qualification probability (0-100).
    pub overall: BTreeMap<String, BTreeMap<usize, f64>>,
    /// cutoff -> team key -> per-team analysis.
    pub teams: BTreeMap<usize, BTreeMap<String, TeamAnalysis>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification_path: Option<BTreeMap<usize, BTreeMap<String, QualificationPath>>>,
}

impl AnalysisReport {
    /// Assemble the envelope from a finished walk. `tolerance` is the
    /// sampler's noise band; exhaustive callers pass None for exact calls.
    pub(crate) fn from_tallies(
        method: AnalysisMethod,
        standings: &Standings,
        fixtures: &FixtureList,
        tally: &TallySet,
        tolerance: Option<f64>,
    ) -> Self {
        let mut overall: BTreeMap<String, BTreeMap<usize, f64>> = BTreeMap::new();
        let mut teams: BTreeMap<usize, BTreeMap<String, TeamAnalysis>> = BTreeMap::new();

        for (cutoff_index, &cutoff) in tally.cutoffs().iter().enumerate() {
            let mut per_team = BTreeMap::new();
            for team in 0..standings.len() {
                let key = standings.key(team).to_string();
                let percent = tally.percent(team, cutoff_index);
                overall.entry(key.clone()).or_default().insert(cutoff, percent);

                let outcome_table = (0..fixtures.len())
                    .map(|index| {
                        let fixture = fixtures.fixtures()[index];
                        let (a_wins, b_wins) = tally.fixture_split(team, cutoff_index, index);
                        FixtureOutcome {
                            label: fixtures.label(index).to_string(),
                            call: synthesize_call(
                                standings.key(fixture.team_a),
                                standings.key(fixture.team_b),
                                a_wins,
                                b_wins,
                                tolerance,
                            ),
                        }
                    })
                    .collect();
                per_team.insert(
                    key,
                    TeamAnalysis {
                        percent,
                        fixtures: outcome_table,
                    },
                );
            }
            teams.insert(cutoff, per_team);
        }

        let qualification_path = tally.path().map(|path| {
            tally
                .cutoffs()
                .iter()
                .enumerate()
                .map(|(cutoff_index, &cutoff)| {
                    let per_team = (0..standings.len())
                        .map(|team| {
                            (
                                standings.key(team).to_string(),
                                QualificationPath::from_counts(
                                    path.totals(team),
                                    path.qualified(team, cutoff_index),
                                ),
                            )
                        })
                        .collect();
                    (cutoff, per_team)
                })
                .collect()
        });

        AnalysisReport {
            method,
            computed_at: Utc::now(),
            fixture_count: fixtures.len(),
            scenarios: tally.counted,
            overall,
            teams,
            qualification_path,
        }
    }

    /// Convenience accessor: a team's 0-100 probability at a cutoff.
    pub fn percent(&self, team: &str, cutoff: usize) -> Option<f64> {
        self.overall.get(team).and_then(|m| m.get(&cutoff)).copied()
    }

    /// Convenience accessor: a team's path entry at a cutoff.
    pub fn path(&self, team: &str, cutoff: usize) -> Option<&QualificationPath> {
        self.qualification_path
            .as_ref()
            .and_then(|m| m.get(&cutoff))
            .and_then(|m| m.get(team))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::exhaustive::run_exhaustive;
    use crate::monte_carlo::run_monte_carlo;
    use crate::team::TeamRecord;

    fn league() -> (Standings, FixtureList) {
        let standings = Standings::from_rows([
            ("Chennai".to_string(), TeamRecord::new(1, 1, 2)),
            ("Mumbai".to_string(), TeamRecord::new(1, 0, 0)),
        ]);
        let fixtures = FixtureList::resolve(&standings, [("Chennai", "Mumbai")]);
        (standings, fixtures)
    }

    #[test]
    fn test_exhaustive_report_json_shape() {
        let (standings, fixtures) = league();
        let report =
            run_exhaustive(&standings, &fixtures, &AnalysisConfig::default(), None).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["method"], "Exhaustive");
        assert_eq!(value["fixture_count"], 1);
        assert_eq!(value["scenarios"], 2);
        assert!(value["computed_at"].is_string());
        // Cutoff-keyed maps with per-team entries.
        assert_eq!(value["overall"]["Chennai"]["4"], 100.0);
        assert_eq!(value["teams"]["2"]["Mumbai"]["percent"], 100.0);
        assert_eq!(
            value["teams"]["2"]["Mumbai"]["fixtures"][0]["label"],
            "Chennai vs Mumbai"
        );
        let path = &value["qualification_path"]["4"]["Chennai"];
        assert_eq!(path["possible"], 0);
        assert_eq!(path["guaranteed"], 0);
        assert_eq!(path["target_matches"], 1);
    }

    #[test]
    fn test_monte_carlo_report_omits_path() {
        let (standings, fixtures) = league();
        let config = AnalysisConfig::default().with_trials(64).with_seed(1);
        let report = run_monte_carlo(&standings, &fixtures, &config, None).unwrap();
        assert!(report.qualification_path.is_none());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["method"], "Monte Carlo");
        assert!(
            value.get("qualification_path").is_none(),
            "sampled reports must omit the path section entirely"
        );
    }

    #[test]
    fn test_nullable_path_fields_serialize_as_null() {
        let (standings, fixtures) = league();
        // Top-0 cannot be reached, so every path entry is None/None.
        let config = AnalysisConfig::default().with_cutoffs(vec![0]);
        let report = run_exhaustive(&standings, &fixtures, &config, None).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        let path = &value["qualification_path"]["0"]["Chennai"];
        assert!(path["possible"].is_null());
        assert!(path["guaranteed"].is_null());
    }
}
