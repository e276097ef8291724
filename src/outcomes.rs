use std::fmt;

use serde::{Serialize, Serializer};

/// The call for one fixture, conditioned on a team qualifying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FixtureCall {
    /// Qualification favors this side winning the fixture.
    Win(String),
    /// Either result keeps the qualification path alive.
    Irrelevant,
}

impl fmt::Display for FixtureCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureCall::Win(team) => write!(f, "{} wins", team),
            FixtureCall::Irrelevant => write!(f, "Result doesn't matter"),
        }
    }
}

impl Serialize for FixtureCall {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Turn one fixture's conditioned win tallies into a call.
///
/// `a_wins`/`b_wins` count the qualifying scenarios in which each side won
/// the fixture. Exhaustive tallies use exact majority logic (a strict
/// majority names the side, an even split doesn't matter). Sampled tallies
/// pass a tolerance: splits within it are reported as not mattering rather
/// than as spurious certainty. A fixture never seen in a qualifying
/// scenario doesn't matter either.
pub fn synthesize_call(
    side_a: &str,
    side_b: &str,
    a_wins: u64,
    b_wins: u64,
    tolerance: Option<f64>,
) -> FixtureCall {
    let total = a_wins + b_wins;
    if total == 0 {
        return FixtureCall::Irrelevant;
    }
    if let Some(tolerance) = tolerance {
        let imbalance = (a_wins as f64 - b_wins as f64).abs() / total as f64;
        if imbalance <= tolerance {
            return FixtureCall::Irrelevant;
        }
    }
    if a_wins > b_wins {
        FixtureCall::Win(side_a.to_string())
    } else if b_wins > a_wins {
        FixtureCall::Win(side_b.to_string())
    } else {
        FixtureCall::Irrelevant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unanimous_side() {
        assert_eq!(
            synthesize_call("Chennai", "Mumbai", 12, 0, None),
            FixtureCall::Win("Chennai".to_string())
        );
        assert_eq!(
            synthesize_call("Chennai", "Mumbai", 0, 12, None),
            FixtureCall::Win("Mumbai".to_string())
        );
    }

    #[test]
    fn test_majority_side() {
        assert_eq!(
            synthesize_call("Chennai", "Mumbai", 7, 5, None),
            FixtureCall::Win("Chennai".to_string())
        );
    }

    #[test]
    fn test_even_split_is_irrelevant() {
        assert_eq!(
            synthesize_call("Chennai", "Mumbai", 4, 4, None),
            FixtureCall::Irrelevant
        );
    }

    #[test]
    fn test_never_seen_is_irrelevant() {
        assert_eq!(
            synthesize_call("Chennai", "Mumbai", 0, 0, None),
            FixtureCall::Irrelevant
        );
    }

    #[test]
    fn test_tolerance_band_suppresses_noise() {
        // 5050 vs 4950: 1% imbalance, inside a 2% band.
        assert_eq!(
            synthesize_call("Chennai", "Mumbai", 5050, 4950, Some(0.02)),
            FixtureCall::Irrelevant
        );
        // 5300 vs 4700: 6% imbalance, outside the band.
        assert_eq!(
            synthesize_call("Chennai", "Mumbai", 5300, 4700, Some(0.02)),
            FixtureCall::Win("Chennai".to_string())
        );
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(
            FixtureCall::Win("Kolkata".to_string()).to_string(),
            "Kolkata wins"
        );
        assert_eq!(FixtureCall::Irrelevant.to_string(), "Result doesn't matter");
    }
}
