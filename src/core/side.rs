//! Side identity and per-side data storage.
//!
//! ## Side
//!
//! The auction always has exactly two sides: the `Player`, whose bid is
//! supplied by the caller, and the `Ai`, whose bid comes from a bid oracle.
//! Everything that differs per side is indexed by `Side` so adjudication and
//! payment code never branch on labels.
//!
//! ## Sides
//!
//! A fixed two-slot container indexable by `Side`. Serializes as
//! `{ "player": .., "ai": .. }`, which is also the state transfer shape.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two auction participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Side A, bid supplied by the driving loop.
    #[serde(rename = "PLAYER")]
    Player,
    /// Side B, bid supplied by the bid oracle.
    #[serde(rename = "AI")]
    Ai,
}

impl Side {
    /// Both sides, in a stable order.
    pub const ALL: [Side; 2] = [Side::Player, Side::Ai];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Wire label (`"PLAYER"` / `"AI"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Side::Player => "PLAYER",
            Side::Ai => "AI",
        }
    }

    /// Parse a wire label. Unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PLAYER" => Some(Side::Player),
            "AI" => Some(Side::Ai),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use allpay_duel::core::{Side, Sides};
///
/// let mut money = Sides::with_value(100u64);
/// money[Side::Ai] -= 20;
///
/// assert_eq!(money[Side::Player], 100);
/// assert_eq!(money[Side::Ai], 80);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sides<T> {
    pub player: T,
    pub ai: T,
}

impl<T> Sides<T> {
    /// Create from explicit values.
    pub const fn new(player: T, ai: T) -> Self {
        Self { player, ai }
    }

    /// Create with values from a factory function.
    pub fn from_fn(mut factory: impl FnMut(Side) -> T) -> Self {
        Self {
            player: factory(Side::Player),
            ai: factory(Side::Ai),
        }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            player: value.clone(),
            ai: value,
        }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    /// Map both entries into a new container.
    pub fn map<U>(&self, mut f: impl FnMut(Side, &T) -> U) -> Sides<U> {
        Sides {
            player: f(Side::Player, &self.player),
            ai: f(Side::Ai, &self.ai),
        }
    }

    /// Iterate over (Side, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Player, &self.player), (Side::Ai, &self.ai)].into_iter()
    }

    /// Sides whose entry satisfies the predicate.
    pub fn sides_where(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<Side> {
        self.iter()
            .filter(|(_, v)| predicate(v))
            .map(|(side, _)| side)
            .collect()
    }
}

impl<T> Index<Side> for Sides<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for Sides<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
