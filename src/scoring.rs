//! Point values, XP multiplier and reward tiers.

/// Points awarded per matched label keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointTable {
    pub level3: u64,
    pub level2: u64,
    pub level1: u64,
    /// Awarded when no label on a merged PR matched a level keyword.
    pub default: u64,
}

impl PointTable {
    /// Keywords in the order they are tried against a single label.
    pub fn keywords(&self) -> [(&'static str, u64); 3] {
        [
            ("level 3", self.level3),
            ("level 2", self.level2),
            ("level 1", self.level1),
        ]
    }
}

/// A reward bracket reached once a contributor's XP meets `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub threshold: u64,
    pub name: &'static str,
    pub perk: &'static str,
    pub color: &'static str,
}

pub const GOLD: Tier = Tier {
    threshold: 15_000,
    name: "Gold",
    perk: "🏆 Access to Core Team",
    color: "#FFD700",
};

pub const SILVER: Tier = Tier {
    threshold: 7_500,
    name: "Silver",
    perk: "👕 Exclusive Merch",
    color: "#C0C0C0",
};

pub const BRONZE: Tier = Tier {
    threshold: 3_000,
    name: "Bronze",
    perk: "👾 Discord VIP Badge",
    color: "#CD7F32",
};

pub const ROOKIE: Tier = Tier {
    threshold: 0,
    name: "Rookie",
    perk: "🌱 Contributor Role",
    color: "#00aaff",
};

/// Everything the scorer, ranker and renderer need to turn PRs into a
/// leaderboard. Built once at start-up and shared by reference.
#[derive(Debug, Clone)]
pub struct ScoringTable {
    pub points: PointTable,
    pub xp_multiplier: u64,
    /// Sorted by descending threshold; the last entry has threshold 0.
    pub tiers: [Tier; 4],
    /// Number of leaderboard places.
    pub podium: usize,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            points: PointTable {
                level3: 11,
                level2: 5,
                level1: 2,
                default: 1,
            },
            xp_multiplier: 100,
            tiers: [GOLD, SILVER, BRONZE, ROOKIE],
            podium: 3,
        }
    }
}

impl ScoringTable {
    pub fn xp(&self, points: u64) -> u64 {
        points.saturating_mul(self.xp_multiplier)
    }

    /// Highest tier whose threshold is at or below `xp`.
    pub fn tier_for(&self, xp: u64) -> &Tier {
        self.tiers
            .iter()
            .find(|tier| xp >= tier.threshold)
            .unwrap_or(&self.tiers[self.tiers.len() - 1])
    }
}
