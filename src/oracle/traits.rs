//! Bid oracle interface.
//!
//! The engine never decides the automated side's bid itself. It hands a
//! `BidRequest` to a `BidOracle` and consumes the returned `BidDecision`.
//!
//! Contract for implementations:
//! - `final_bid` is in `[0, my_money]`
//! - `rationale` is non-empty
//! - `decide` is a pure function of the request (plus any fixed seed); no
//!   round-specific state is kept between calls

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{OracleError, RoundRecord, Side};
use crate::rules::MaintenanceOutlook;

/// Ordered rationale lines. Most decisions fit inline.
pub type Rationale = SmallVec<[String; 8]>;

/// Behavioral tag influencing the oracle's risk appetite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Neutral,
    Aggressive,
    Conservative,
    Chaotic,
}

impl std::fmt::Display for Personality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Personality::Neutral => "neutral",
            Personality::Aggressive => "aggressive",
            Personality::Conservative => "conservative",
            Personality::Chaotic => "chaotic",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" => Ok(Personality::Neutral),
            "aggressive" => Ok(Personality::Aggressive),
            "conservative" => Ok(Personality::Conservative),
            "chaotic" => Ok(Personality::Chaotic),
            other => Err(format!("unknown personality: {other}")),
        }
    }
}

/// Compact view of a past round for the oracle's lookback window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub player_bid: u64,
    pub ai_bid: u64,
    pub winner: Option<Side>,
    pub fee: u64,
    pub p_after: u64,
    pub a_after: u64,
}

impl RoundSummary {
    /// Bid made by `side` in this round.
    #[must_use]
    pub fn bid(&self, side: Side) -> u64 {
        match side {
            Side::Player => self.player_bid,
            Side::Ai => self.ai_bid,
        }
    }

    /// Money `side` held after this round.
    #[must_use]
    pub fn money_after(&self, side: Side) -> u64 {
        match side {
            Side::Player => self.p_after,
            Side::Ai => self.a_after,
        }
    }
}

impl From<&RoundRecord> for RoundSummary {
    fn from(record: &RoundRecord) -> Self {
        Self {
            round: record.round,
            player_bid: record.bids.player,
            ai_bid: record.bids.ai,
            winner: record.winner,
            fee: record.maintenance_fee,
            p_after: record.ledger.player.money_after_bid,
            a_after: record.ledger.ai.money_after_bid,
        }
    }
}

/// Everything an oracle sees when deciding a bid.
///
/// Money values are after this round's maintenance has been collected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRequest {
    /// Side the oracle is bidding for.
    pub side: Side,
    pub round: u32,
    /// Maintenance already paid this round.
    pub maintenance_fee: u64,
    /// Advisory fees for the next three rounds.
    pub outlook: MaintenanceOutlook,
    pub my_money: u64,
    pub opp_money: u64,
    pub my_score: u32,
    pub opp_score: u32,
    /// Most recent rounds, oldest first.
    pub last_rounds: Vec<RoundSummary>,
    pub personality: Personality,
}

/// An oracle's answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidDecision {
    pub final_bid: u64,
    pub rationale: Rationale,
}

/// Supplies the automated side's bid.
#[async_trait]
pub trait BidOracle: Send + Sync {
    /// Decide a bid for `request.side`.
    ///
    /// Failures propagate to the caller; the engine does not substitute a bid.
    async fn decide(&self, request: &BidRequest) -> Result<BidDecision, OracleError>;
}

/// Replays a fixed bid per round (baseline for testing and scripted games).
///
/// Round `r` uses `bids[r - 1]`, clamped to the oracle's money. Rounds past
/// the end of the script fail with `OracleError::Unavailable`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedOracle {
    bids: Vec<u64>,
}

impl ScriptedOracle {
    /// Create a scripted oracle.
    pub fn new(bids: impl Into<Vec<u64>>) -> Self {
        Self { bids: bids.into() }
    }

    /// The same bid every round.
    pub fn constant(bid: u64, rounds: usize) -> Self {
        Self::new(vec![bid; rounds])
    }
}

#[async_trait]
impl BidOracle for ScriptedOracle {
    async fn decide(&self, request: &BidRequest) -> Result<BidDecision, OracleError> {
        let index = request.round.saturating_sub(1) as usize;
        let scripted = self
            .bids
            .get(index)
            .copied()
            .ok_or_else(|| OracleError::Unavailable {
                message: format!("no scripted bid for round {}", request.round),
            })?;

        let final_bid = scripted.min(request.my_money);
        let mut rationale = Rationale::new();
        rationale.push(format!("Scripted bid ${scripted} -> final bid ${final_bid}"));

        Ok(BidDecision {
            final_bid,
            rationale,
        })
    }
}
