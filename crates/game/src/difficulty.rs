//! Difficulty tiers and per-tier settings.
//!
//! Entities opt in explicitly by implementing [`DifficultyConfigurable`];
//! [`Level::apply_difficulty`](crate::level::Level::apply_difficulty) walks
//! its entity lists once at setup. Tiered values are resolved where they are
//! used with [`Tiered::resolve`].

use serde::{Deserialize, Serialize};

/// Difficulty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Self::Easy => 1 << 0,
            Self::Medium => 1 << 1,
            Self::Hard => 1 << 2,
        }
    }
}

/// One value per difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tiered<T> {
    pub easy: T,
    pub medium: T,
    pub hard: T,
}

impl<T: Copy> Tiered<T> {
    pub const fn new(easy: T, medium: T, hard: T) -> Self {
        Self { easy, medium, hard }
    }

    /// Value for the given tier.
    #[inline]
    pub fn resolve(&self, difficulty: Difficulty) -> T {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    /// Check every tier's value with `check`.
    pub fn all(&self, mut check: impl FnMut(T) -> bool) -> bool {
        check(self.easy) && check(self.medium) && check(self.hard)
    }
}

/// Set of tiers an entity appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllowedTiers(u8);

impl AllowedTiers {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b111);

    /// Only the given tiers.
    pub fn only(tiers: &[Difficulty]) -> Self {
        Self(tiers.iter().fold(0, |bits, tier| bits | tier.bit()))
    }

    /// The given tier and every harder one.
    pub fn from_tier(lowest: Difficulty) -> Self {
        let start = Difficulty::ALL
            .iter()
            .position(|&d| d == lowest)
            .unwrap_or(0);
        Self::only(&Difficulty::ALL[start..])
    }

    #[inline]
    pub fn contains(self, difficulty: Difficulty) -> bool {
        self.0 & difficulty.bit() != 0
    }
}

impl Default for AllowedTiers {
    fn default() -> Self {
        Self::ALL
    }
}

/// An entity whose presence and tuning depend on the difficulty tier.
pub trait DifficultyConfigurable {
    fn allowed_tiers(&self) -> AllowedTiers;

    fn set_allowed_tiers(&mut self, tiers: AllowedTiers);

    /// Resolve every tiered setting for `difficulty`.
    ///
    /// Only called on entities that are allowed on that tier.
    fn apply_difficulty(&mut self, difficulty: Difficulty);

    fn is_allowed(&self, difficulty: Difficulty) -> bool {
        self.allowed_tiers().contains(difficulty)
    }
}
