use crate::config::Config;
use crate::fetch::{fetch_all_pulls, PageSource};
use crate::rank::{top_contributors, RankedEntry};
use crate::score::calculate_scores;
use crate::scoring::ScoringTable;
use crate::view::{self, LeaderboardView};

/// Result of one fetch, score, rank pass.
#[derive(Debug)]
pub struct Leaderboard {
    pub top: Vec<RankedEntry>,
    pub view: LeaderboardView,
    pub contributors: usize,
    pub pages: u32,
    /// Why the fetched history is incomplete, if it is.
    pub partial: Option<String>,
}

pub async fn run<S: PageSource>(source: &S, config: &Config, table: &ScoringTable) -> Leaderboard {
    let outcome = fetch_all_pulls(source, &config.fetch).await;
    let partial = outcome.failure().map(ToString::to_string);

    let scores = calculate_scores(&outcome.pulls, &config.repository.owner, &table.points);
    if scores.is_empty() {
        tracing::warn!("no merged contributions found");
    }
    let top = top_contributors(&scores, table);
    let view = view::build(&top, table);

    tracing::info!(
        pulls = outcome.pulls.len(),
        pages = outcome.pages,
        partial = partial.is_some(),
        contributors = scores.len(),
        "leaderboard computed"
    );

    Leaderboard {
        top,
        view,
        contributors: scores.len(),
        pages: outcome.pages,
        partial,
    }
}
