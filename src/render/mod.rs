//! Presentation adapters for a [`LeaderboardView`].

pub mod html;
pub mod terminal;

use crate::view::LeaderboardView;

/// A display surface the leaderboard can be drawn onto.
pub trait Presenter {
    fn present(&mut self, view: &LeaderboardView) -> anyhow::Result<()>;
}
