//! Money and score ledger for one side.

use serde::{Deserialize, Serialize};

/// One participant's ledger.
///
/// Money only ever goes down (maintenance and bids); score only ever goes up,
/// by at most one point per round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Display identifier (`"PLAYER"` / `"AI"` by default).
    pub name: String,

    /// Remaining money.
    pub money: u64,

    /// Rounds won so far.
    pub score: u32,
}

impl Participant {
    /// Create a participant with zero score.
    pub fn new(name: impl Into<String>, money: u64) -> Self {
        Self {
            name: name.into(),
            money,
            score: 0,
        }
    }

    /// Can this participant pay `amount` in full?
    #[must_use]
    pub fn can_afford(&self, amount: u64) -> bool {
        self.money >= amount
    }

    /// Pay `amount`, flooring money at zero.
    pub fn pay(&mut self, amount: u64) {
        self.money = self.money.saturating_sub(amount);
    }

    /// Award one point.
    pub fn award_point(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    /// Is this participant out of money?
    #[must_use]
    pub fn is_bankrupt(&self) -> bool {
        self.money == 0
    }
}
