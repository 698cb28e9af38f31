use std::collections::HashMap;

use crate::pr::PullRequest;
use crate::scoring::PointTable;

/// Accumulated points per contributor, in the order contributors were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributorScores {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl ContributorScores {
    pub fn add(&mut self, login: &str, points: u64) {
        match self.index.get(login) {
            Some(&i) => self.entries[i].1 += points,
            None => {
                self.index.insert(login.to_string(), self.entries.len());
                self.entries.push((login.to_string(), points));
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, login: &str) -> Option<u64> {
        self.index.get(login).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(login, points)| (login.as_str(), *points))
    }
}

impl<'a> FromIterator<(&'a str, u64)> for ContributorScores {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        let mut scores = Self::default();
        for (login, points) in iter {
            scores.add(login, points);
        }
        scores
    }
}

/// Points a single merged PR is worth.
///
/// Each label is tried against the keywords in priority order and counts
/// once; matches on different labels add up.
pub fn pr_points(pr: &PullRequest, table: &PointTable) -> u64 {
    let mut points = 0;
    let mut matched = false;

    for label in &pr.labels {
        let name = label.name.to_lowercase();
        if let Some((_, value)) = table
            .keywords()
            .into_iter()
            .find(|(keyword, _)| name.contains(keyword))
        {
            points += value;
            matched = true;
        }
    }

    if matched {
        points
    } else {
        table.default
    }
}

/// Sum points per author over merged PRs, skipping the repository owner.
pub fn calculate_scores(pulls: &[PullRequest], owner: &str, table: &PointTable) -> ContributorScores {
    let owner = owner.to_lowercase();
    let mut scores = ContributorScores::default();

    for pr in pulls {
        if !pr.is_merged() {
            continue;
        }
        let Some(login) = pr.author() else {
            continue;
        };
        if login.to_lowercase() == owner {
            continue;
        }

        let points = pr_points(pr, table);
        tracing::trace!(pr = pr.number, login, points, "scored pull request");
        scores.add(login, points);
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pr::{Author, Label};
    use crate::scoring::ScoringTable;
    use chrono::{TimeZone, Utc};

    const OWNER: &str = "sayeeg-11";

    fn pr(login: &str, merged: bool, labels: &[&str]) -> PullRequest {
        PullRequest {
            number: 1,
            user: Some(Author {
                login: login.to_string(),
            }),
            merged_at: merged.then(|| Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            labels: labels
                .iter()
                .map(|name| Label {
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    fn score(pulls: &[PullRequest]) -> ContributorScores {
        calculate_scores(pulls, OWNER, &ScoringTable::default().points)
    }

    #[test]
    fn unmerged_prs_are_ignored() {
        let scores = score(&[pr("alice", false, &["level 3"])]);
        assert!(scores.is_empty());
    }

    #[test]
    fn owner_never_scores() {
        let scores = score(&[
            pr(OWNER, true, &["level 3"]),
            pr("Sayeeg-11", true, &["Level 2"]),
        ]);
        assert!(scores.is_empty());
    }

    #[test]
    fn matched_labels_accumulate() {
        let scores = score(&[pr("alice", true, &["level 3", "level 1"])]);
        assert_eq!(scores.get("alice"), Some(13));
    }

    #[test]
    fn unlabeled_merged_pr_scores_default() {
        let scores = score(&[pr("bob", true, &[])]);
        assert_eq!(scores.get("bob"), Some(1));

        let scores = score(&[pr("bob", true, &["documentation"])]);
        assert_eq!(scores.get("bob"), Some(1));
    }

    #[test]
    fn default_not_added_when_any_label_matches() {
        let scores = score(&[pr("bob", true, &["docs", "Level 1"])]);
        assert_eq!(scores.get("bob"), Some(2));
    }

    #[test]
    fn label_match_is_case_insensitive_substring() {
        let scores = score(&[pr("alice", true, &["Level 2 Bug"])]);
        assert_eq!(scores.get("alice"), Some(5));
    }

    #[test]
    fn one_label_counts_once_at_highest_keyword() {
        let scores = score(&[pr("alice", true, &["level 3 / level 1"])]);
        assert_eq!(scores.get("alice"), Some(11));
    }

    #[test]
    fn authorless_prs_are_skipped() {
        let mut ghost = pr("ghost", true, &["level 3"]);
        ghost.user = None;
        let scores = score(&[ghost, pr("alice", true, &[])]);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get("alice"), Some(1));
    }

    #[test]
    fn totals_accumulate_across_prs() {
        let scores = score(&[
            pr("alice", true, &["level 2"]),
            pr("bob", true, &[]),
            pr("alice", true, &["level 1"]),
            pr("alice", false, &["level 3"]),
        ]);
        assert_eq!(scores.get("alice"), Some(7));
        assert_eq!(scores.get("bob"), Some(1));
        let order: Vec<_> = scores.iter().map(|(login, _)| login).collect();
        assert_eq!(order, ["alice", "bob"]);
    }
}
