//! Declarative description of the three leaderboard rows.

use crate::rank::RankedEntry;
use crate::scoring::{ScoringTable, Tier};

/// CSS selectors of the rows, in rank order.
pub const SLOT_SELECTORS: [&str; 3] = [".lb-row.gold", ".lb-row.silver", ".lb-row.bronze"];

pub const PLACEHOLDER_NAME: &str = "---";
pub const PLACEHOLDER_XP: &str = "0 XP";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub rank: usize,
    pub selector: &'static str,
    pub content: SlotContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotContent {
    Filled(Standing),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub login: String,
    pub xp: u64,
    pub tier: Tier,
}

impl Standing {
    pub fn handle(&self) -> String {
        format!("@{}", self.login)
    }

    pub fn xp_display(&self) -> String {
        group_thousands(self.xp)
    }
}

impl Slot {
    pub fn badge(&self) -> String {
        format!("#{}", self.rank)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardView {
    pub slots: Vec<Slot>,
}

/// Map ranked entries onto the fixed rows. Rows without an entry get the
/// placeholder.
pub fn build(top: &[RankedEntry], table: &ScoringTable) -> LeaderboardView {
    let slots = SLOT_SELECTORS
        .iter()
        .enumerate()
        .map(|(i, &selector)| {
            let content = match top.get(i) {
                Some(entry) => SlotContent::Filled(Standing {
                    login: entry.login.clone(),
                    xp: entry.xp,
                    tier: *table.tier_for(entry.xp),
                }),
                None => SlotContent::Empty,
            };
            Slot {
                rank: i + 1,
                selector,
                content,
            }
        })
        .collect();

    LeaderboardView { slots }
}

/// `1234567` -> `"1,234,567"`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{GOLD, ROOKIE};

    fn entry(login: &str, xp: u64) -> RankedEntry {
        RankedEntry {
            login: login.to_string(),
            xp,
        }
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(500), "500");
        assert_eq!(group_thousands(1_500), "1,500");
        assert_eq!(group_thousands(15_000), "15,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn fills_slots_in_rank_order() {
        let view = build(
            &[entry("alice", 20_000), entry("bob", 500)],
            &ScoringTable::default(),
        );

        assert_eq!(view.slots.len(), 3);
        assert_eq!(view.slots[0].selector, ".lb-row.gold");
        assert_eq!(view.slots[0].badge(), "#1");
        match &view.slots[0].content {
            SlotContent::Filled(standing) => {
                assert_eq!(standing.handle(), "@alice");
                assert_eq!(standing.xp_display(), "20,000");
                assert_eq!(standing.tier, GOLD);
            }
            SlotContent::Empty => panic!("slot 1 should be filled"),
        }
        match &view.slots[1].content {
            SlotContent::Filled(standing) => assert_eq!(standing.tier, ROOKIE),
            SlotContent::Empty => panic!("slot 2 should be filled"),
        }
        assert_eq!(view.slots[2].content, SlotContent::Empty);
        assert_eq!(view.slots[2].selector, ".lb-row.bronze");
    }

    #[test]
    fn no_entries_means_all_placeholders() {
        let view = build(&[], &ScoringTable::default());
        assert!(view.slots.iter().all(|s| s.content == SlotContent::Empty));
        let ranks: Vec<_> = view.slots.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, [1, 2, 3]);
    }
}
