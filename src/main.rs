use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod config;
mod fetch;
mod pipeline;
mod pr;
mod rank;
mod render;
mod score;
mod scoring;
mod view;

use config::Config;
use fetch::{GithubApi, PageSource};
use pipeline::Leaderboard;
use render::{html::HtmlPage, terminal::TerminalPresenter, Presenter};
use scoring::ScoringTable;
use view::LeaderboardView;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xpboard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::load().context("loading configuration")?;
    let table = ScoringTable::default();

    let result = match GithubApi::new(&config.repository, &config.fetch) {
        Ok(api) => sync(&api, &config, &table).await,
        Err(e) => Err(anyhow::Error::new(e).context("building HTTP client")),
    };
    let (view, partial) = settle(result, &table);

    if config.output.terminal {
        let mut status = format!("{}/{}", config.repository.owner, config.repository.name);
        if let Some(reason) = partial {
            status.push_str(&format!(" │ partial history: {reason}"));
        }
        if let Err(e) = TerminalPresenter::new(status).present(&view) {
            report_failure(&e);
        }
    }

    Ok(())
}

/// Fetch, score and rank, then write the configured page.
async fn sync<S: PageSource>(source: &S, config: &Config, table: &ScoringTable) -> Result<Leaderboard> {
    let board = pipeline::run(source, config, table).await;

    if let Some(path) = &config.output.page {
        write_page(path, &board.view)
            .with_context(|| format!("rendering leaderboard into {}", path.display()))?;
    }

    Ok(board)
}

fn write_page(path: &Path, view: &LeaderboardView) -> Result<()> {
    let mut page = HtmlPage::open(path)?;
    page.present(view)?;
    page.save(path)?;
    Ok(())
}

/// The view to show after a sync attempt, plus the partial-history reason.
/// A failed sync is logged and leaves the placeholders.
fn settle(result: Result<Leaderboard>, table: &ScoringTable) -> (LeaderboardView, Option<String>) {
    match result {
        Ok(board) => {
            tracing::info!(contributors = board.contributors, pages = board.pages, "sync complete");
            for (rank, entry) in board.top.iter().enumerate() {
                tracing::info!(rank = rank + 1, login = %entry.login, xp = entry.xp, "ranked");
            }
            (board.view, board.partial)
        }
        Err(e) => {
            report_failure(&e);
            (view::build(&[], table), None)
        }
    }
}

fn report_failure(e: &anyhow::Error) {
    tracing::error!("leaderboard sync failed: {e:#}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::ScriptedSource;
    use crate::pr::PullRequest;
    use crate::render::html::{inner_html, text_content};
    use crate::view::SlotContent;

    fn alice_page() -> ScriptedSource {
        let pulls: Vec<PullRequest> = serde_json::from_str(
            r#"[{"user": {"login": "alice"}, "merged_at": "2024-03-01T10:00:00Z",
                 "labels": [{"name": "Level 2 Bug"}]}]"#,
        )
        .unwrap();
        ScriptedSource::new(vec![Ok(pulls)])
    }

    fn config_with_page(page: &Path) -> Config {
        let mut config = Config::default();
        config.output.page = Some(page.to_path_buf());
        config.output.terminal = false;
        config
    }

    #[tokio::test]
    async fn failed_page_write_leaves_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_page(&dir.path().join("missing.html"));
        let table = ScoringTable::default();

        let result = sync(&alice_page(), &config, &table).await;
        let err = result.as_ref().unwrap_err();
        assert!(format!("{err:#}").contains("missing.html"));

        let (view, partial) = settle(result, &table);
        assert!(view.slots.iter().all(|s| s.content == SlotContent::Empty));
        assert!(partial.is_none());
        assert!(!dir.path().join("missing.html").exists());
    }

    #[tokio::test]
    async fn successful_sync_writes_page_and_keeps_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, r#"<div class="lb-row gold">Loading...</div>"#).unwrap();
        let config = config_with_page(&path);
        let table = ScoringTable::default();

        let (view, partial) = settle(sync(&alice_page(), &config, &table).await, &table);
        assert!(partial.is_none());
        assert!(matches!(&view.slots[0].content, SlotContent::Filled(s) if s.login == "alice"));

        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text_content(inner_html(&saved, ".lb-row.gold").unwrap()),
            "#1 @alice 🌱 Contributor Role 500 XP"
        );
    }
}
