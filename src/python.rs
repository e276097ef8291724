//! PyO3 surface for the dashboard.
//!
//! Thin wrappers around the analysis entry points. Standings arrive as the
//! dashboard's dict-of-dicts (insertion order is preserved and becomes the
//! final tie-break), fixtures as a list of (team A, team B) pairs, and the
//! report goes back as plain nested dicts. Long runs release the GIL and
//! reacquire it only to invoke an optional progress callable.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::exhaustive::run_exhaustive;
use crate::monte_carlo::run_monte_carlo;
use crate::outcomes::FixtureCall;
use crate::progress::Progress;
use crate::report::AnalysisReport;
use crate::simulate::play_out_calls;
use crate::standings::{FixtureList, Standings};
use crate::team::TeamRecord;

/// Build the snapshot from the dashboard's `{team: {"Matches", "Wins",
/// "Points"}}` dict, in dict order. Rows missing a field are skipped, the
/// loader's validation having had first refusal.
fn standings_from_dict(rows: &Bound<'_, PyDict>) -> PyResult<Standings> {
    let mut standings = Standings::new();
    for (key, value) in rows.iter() {
        let key: String = key.extract()?;
        let Ok(row) = value.downcast_into::<PyDict>() else {
            log::warn!("skipping standings row for {:?}: not a mapping", key);
            continue;
        };
        let field = |name: &str| -> Option<u32> {
            row.get_item(name).ok().flatten().and_then(|v| v.extract().ok())
        };
        match (field("Matches"), field("Wins"), field("Points")) {
            (Some(matches), Some(wins), Some(points)) => {
                standings.push(key, TeamRecord::new(matches, wins, points));
            }
            _ => log::warn!("skipping standings row for {:?}: missing fields", key),
        }
    }
    Ok(standings)
}

fn fixtures_from_pairs(standings: &Standings, pairs: &[(String, String)]) -> FixtureList {
    FixtureList::resolve(standings, pairs.iter().map(|(a, b)| (a.as_str(), b.as_str())))
}

fn config_from_args(
    cutoffs: Option<Vec<usize>>,
    trials: Option<usize>,
    seed: Option<u64>,
    max_fixtures: Option<usize>,
) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    if let Some(cutoffs) = cutoffs {
        config.cutoffs = cutoffs;
    }
    if let Some(trials) = trials {
        config.trials = trials;
    }
    if let Some(max_fixtures) = max_fixtures {
        config.max_exhaustive_fixtures = max_fixtures;
    }
    config.seed = seed;
    config
}

/// Wrap a Python callable as a progress hook. The callable receives
/// (fraction, elapsed seconds); returning False (or raising) cancels.
fn call_progress(callback: &PyObject, progress: Progress) -> bool {
    Python::with_gil(|py| {
        match callback.call1(py, (progress.fraction(), progress.elapsed.as_secs_f64())) {
            Ok(value) => !matches!(value.extract::<bool>(py), Ok(false)),
            Err(err) => {
                err.print(py);
                false
            }
        }
    })
}

fn to_py_err(error: AnalysisError) -> PyErr {
    match error {
        AnalysisError::CapacityExceeded { .. } => PyValueError::new_err(error.to_string()),
        AnalysisError::Cancelled { .. } => PyRuntimeError::new_err(error.to_string()),
    }
}

/// Render the report as the dashboard's nested-dict shape.
fn report_to_dict(py: Python<'_>, report: &AnalysisReport) -> PyResult<Py<PyDict>> {
    let out = PyDict::new_bound(py);
    out.set_item("method", report.method.to_string())?;
    out.set_item("computed_at", report.computed_at.to_rfc3339())?;
    out.set_item("fixture_count", report.fixture_count)?;
    out.set_item("scenarios", report.scenarios)?;

    let overall = PyDict::new_bound(py);
    for (team, cutoffs) in &report.overall {
        let entry = PyDict::new_bound(py);
        for (cutoff, percent) in cutoffs {
            entry.set_item(format!("Top {} Probability", cutoff), percent)?;
        }
        overall.set_item(team, entry)?;
    }
    out.set_item("overall", overall)?;

    let teams = PyDict::new_bound(py);
    for (cutoff, per_team) in &report.teams {
        let cutoff_entry = PyDict::new_bound(py);
        for (team, analysis) in per_team {
            let entry = PyDict::new_bound(py);
            entry.set_item("percentage", analysis.percent)?;
            let table = PyList::new_bound(
                py,
                analysis
                    .fixtures
                    .iter()
                    .map(|outcome| (outcome.label.clone(), outcome.call.to_string())),
            );
            entry.set_item("fixtures", table)?;
            cutoff_entry.set_item(team, entry)?;
        }
        teams.set_item(cutoff.to_string(), cutoff_entry)?;
    }
    out.set_item("teams", teams)?;

    if let Some(paths) = &report.qualification_path {
        let path_out = PyDict::new_bound(py);
        for (cutoff, per_team) in paths {
            let cutoff_entry = PyDict::new_bound(py);
            for (team, path) in per_team {
                let entry = PyDict::new_bound(py);
                entry.set_item("possible", path.possible)?;
                entry.set_item("guaranteed", path.guaranteed)?;
                entry.set_item("target_matches", path.target_matches)?;
                cutoff_entry.set_item(team, entry)?;
            }
            path_out.set_item(cutoff.to_string(), cutoff_entry)?;
        }
        out.set_item("qualification_path", path_out)?;
    }

    Ok(out.unbind())
}

/// Exhaustive analysis over every resolution of the remaining fixtures.
///
/// Raises ValueError above the fixture ceiling; choosing the sampler
/// instead is the caller's decision.
#[pyfunction]
#[pyo3(signature = (standings, fixtures, cutoffs = None, max_fixtures = None, progress = None))]
fn py_run_exhaustive_analysis(
    py: Python<'_>,
    standings: &Bound<'_, PyDict>,
    fixtures: Vec<(String, String)>,
    cutoffs: Option<Vec<usize>>,
    max_fixtures: Option<usize>,
    progress: Option<PyObject>,
) -> PyResult<Py<PyDict>> {
    let snapshot = standings_from_dict(standings)?;
    let fixture_list = fixtures_from_pairs(&snapshot, &fixtures);
    let config = config_from_args(cutoffs, None, None, max_fixtures);

    let report = py.allow_threads(|| {
        let mut hook = progress.map(|cb| move |p: Progress| call_progress(&cb, p));
        run_exhaustive(
            &snapshot,
            &fixture_list,
            &config,
            hook.as_mut()
                .map(|h| h as &mut dyn FnMut(Progress) -> bool),
        )
    });
    report_to_dict(py, &report.map_err(to_py_err)?)
}

/// Monte Carlo analysis over `trials` random resolutions.
#[pyfunction]
#[pyo3(signature = (standings, fixtures, trials = None, seed = None, cutoffs = None, progress = None))]
fn py_run_monte_carlo_analysis(
    py: Python<'_>,
    standings: &Bound<'_, PyDict>,
    fixtures: Vec<(String, String)>,
    trials: Option<usize>,
    seed: Option<u64>,
    cutoffs: Option<Vec<usize>>,
    progress: Option<PyObject>,
) -> PyResult<Py<PyDict>> {
    let snapshot = standings_from_dict(standings)?;
    let fixture_list = fixtures_from_pairs(&snapshot, &fixtures);
    let config = config_from_args(cutoffs, trials, seed, None);

    let report = py.allow_threads(|| {
        let mut hook = progress.map(|cb| move |p: Progress| call_progress(&cb, p));
        run_monte_carlo(
            &snapshot,
            &fixture_list,
            &config,
            hook.as_mut()
                .map(|h| h as &mut dyn FnMut(Progress) -> bool),
        )
    });
    report_to_dict(py, &report.map_err(to_py_err)?)
}

/// Play the season out along a team's outcome strings ("X wins" /
/// "Result doesn't matter"), as shown in its analysis table.
///
/// Returns (list of "winner defeats loser" strings, final table rows as
/// dicts in ranked order).
#[pyfunction]
#[pyo3(signature = (standings, fixtures, team, calls, seed = None))]
fn py_play_out_calls(
    py: Python<'_>,
    standings: &Bound<'_, PyDict>,
    fixtures: Vec<(String, String)>,
    team: String,
    calls: Vec<String>,
    seed: Option<u64>,
) -> PyResult<(Vec<String>, Py<PyList>)> {
    let snapshot = standings_from_dict(standings)?;
    let fixture_list = fixtures_from_pairs(&snapshot, &fixtures);
    let calls: Vec<FixtureCall> = calls
        .iter()
        .map(|call| match call.strip_suffix(" wins") {
            Some(team) => FixtureCall::Win(team.to_string()),
            None => FixtureCall::Irrelevant,
        })
        .collect();

    let (results, table) = play_out_calls(&snapshot, &fixture_list, &team, &calls, seed);

    let rows = PyList::empty_bound(py);
    for row in &table {
        let entry = PyDict::new_bound(py);
        entry.set_item("Team", &row.team)?;
        entry.set_item("Matches", row.record.matches_played)?;
        entry.set_item("Wins", row.record.wins)?;
        entry.set_item("Points", row.record.points)?;
        rows.append(entry)?;
    }
    Ok((
        results.iter().map(|r| r.to_string()).collect(),
        rows.unbind(),
    ))
}

/// Python module definition
#[pymodule]
fn playoff_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_run_exhaustive_analysis, m)?)?;
    m.add_function(wrap_pyfunction!(py_run_monte_carlo_analysis, m)?)?;
    m.add_function(wrap_pyfunction!(py_play_out_calls, m)?)?;

    m.add("DEFAULT_CUTOFFS", crate::constants::DEFAULT_CUTOFFS.to_vec())?;
    m.add(
        "MAX_EXHAUSTIVE_FIXTURES",
        crate::constants::MAX_EXHAUSTIVE_FIXTURES,
    )?;
    m.add("DEFAULT_TRIALS", crate::constants::DEFAULT_TRIALS)?;

    Ok(())
}
