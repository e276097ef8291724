use serde::Serialize;

/// Minimum own-wins answer for one team and cutoff, from the exhaustive
/// pass. Sampled runs never produce one of these; partial coverage cannot
/// distinguish "no scenario with k wins qualifies" from "none was drawn".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QualificationPath {
    /// Smallest own-win count that qualified in at least one scenario.
    /// None means the team cannot qualify at all.
    pub possible: Option<u32>,
    /// Smallest own-win count that qualified in every scenario with that
    /// count. None means no own-win count guarantees qualification.
    pub guaranteed: Option<u32>,
    /// The team's remaining-match count.
    pub target_matches: u32,
}

impl QualificationPath {
    /// Derive the path from per-own-win-count scenario tallies.
    /// `totals[k]` counts valid scenarios with exactly k own wins,
    /// `qualified[k]` the qualifying subset.
    pub fn from_counts(totals: &[u64], qualified: &[u64]) -> Self {
        debug_assert_eq!(totals.len(), qualified.len());
        let possible = qualified
            .iter()
            .position(|&q| q > 0)
            .map(|k| k as u32);
        let guaranteed = totals
            .iter()
            .zip(qualified)
            .position(|(&t, &q)| t > 0 && q == t)
            .map(|k| k as u32);
        QualificationPath {
            possible,
            guaranteed,
            target_matches: totals.len().saturating_sub(1) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_path() {
        // 3 remaining matches: k=2 first qualifies somewhere, k=3 always does.
        let totals = [8, 24, 24, 8];
        let qualified = [0, 0, 5, 8];
        let path = QualificationPath::from_counts(&totals, &qualified);
        assert_eq!(path.possible, Some(2));
        assert_eq!(path.guaranteed, Some(3));
        assert_eq!(path.target_matches, 3);
    }

    #[test]
    fn test_cannot_qualify() {
        let path = QualificationPath::from_counts(&[4, 4], &[0, 0]);
        assert_eq!(path.possible, None);
        assert_eq!(path.guaranteed, None);
        assert_eq!(path.target_matches, 1);
    }

    #[test]
    fn test_possible_without_guarantee() {
        let path = QualificationPath::from_counts(&[4, 4], &[1, 3]);
        assert_eq!(path.possible, Some(0));
        assert_eq!(path.guaranteed, None);
    }

    #[test]
    fn test_guarantee_implies_possible_at_or_before() {
        let path = QualificationPath::from_counts(&[2, 6, 2], &[0, 6, 2]);
        assert_eq!(path.guaranteed, Some(1));
        assert_eq!(path.possible, Some(1));
        assert!(path.possible.unwrap() <= path.guaranteed.unwrap());
    }

    #[test]
    fn test_no_remaining_matches() {
        // Season over for this team: one scenario group, already qualified.
        let path = QualificationPath::from_counts(&[1], &[1]);
        assert_eq!(path.possible, Some(0));
        assert_eq!(path.guaranteed, Some(0));
        assert_eq!(path.target_matches, 0);
    }
}
