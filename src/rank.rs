use crate::score::ContributorScores;
use crate::scoring::ScoringTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub login: String,
    pub xp: u64,
}

/// Top `table.podium` contributors by XP, highest first.
///
/// Equal XP keeps first-seen order, but nothing downstream depends on it.
pub fn top_contributors(scores: &ContributorScores, table: &ScoringTable) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = scores
        .iter()
        .map(|(login, points)| RankedEntry {
            login: login.to_string(),
            xp: table.xp(points),
        })
        .collect();

    entries.sort_by(|a, b| b.xp.cmp(&a.xp));
    entries.truncate(table.podium);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_top_three_descending() {
        let scores: ContributorScores = [("D", 1), ("C", 5), ("A", 130), ("B", 20)]
            .into_iter()
            .collect();
        let top = top_contributors(&scores, &ScoringTable::default());

        let logins: Vec<_> = top.iter().map(|e| e.login.as_str()).collect();
        assert_eq!(logins, ["A", "B", "C"]);
        assert_eq!(top[0].xp, 13_000);
        assert_eq!(top[1].xp, 2_000);
        assert_eq!(top[2].xp, 500);
    }

    #[test]
    fn fewer_contributors_than_podium() {
        let scores: ContributorScores = [("solo", 30)].into_iter().collect();
        let top = top_contributors(&scores, &ScoringTable::default());
        assert_eq!(
            top,
            vec![RankedEntry {
                login: "solo".to_string(),
                xp: 3_000
            }]
        );
    }

    #[test]
    fn empty_scores_rank_nobody() {
        let top = top_contributors(&ContributorScores::default(), &ScoringTable::default());
        assert!(top.is_empty());
    }
}
