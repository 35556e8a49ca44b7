//! Summary statistics for report generation.
//!
//! Pure aggregation over the round history. Safe to build mid-game.

use serde::{Deserialize, Serialize};

use crate::core::{EngineResult, GameState, RoundRecord, Side, Sides};

/// Round wins per side. `ties = rounds - player - ai`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinCounts {
    pub player: usize,
    pub ai: usize,
    pub ties: usize,
}

/// Bid statistics over every recorded round, walkover rounds included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BidStats {
    pub player_avg: f64,
    pub ai_avg: f64,
    pub player_max: u64,
    pub ai_max: u64,
    pub player_total: u64,
    pub ai_total: u64,
}

/// One row of the per-round history summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub round: u32,
    pub player_bid: u64,
    pub ai_bid: u64,
    pub winner: Option<Side>,
    pub maintenance_fee: u64,
    pub p_money_after: u64,
    pub a_money_after: u64,
}

impl HistoryEntry {
    /// Automatic point with no bidding.
    #[must_use]
    pub fn is_walkover(&self) -> bool {
        self.winner.is_some() && self.player_bid == 0 && self.ai_bid == 0
    }

    #[must_use]
    pub fn bid(&self, side: Side) -> u64 {
        match side {
            Side::Player => self.player_bid,
            Side::Ai => self.ai_bid,
        }
    }

    #[must_use]
    pub fn money_after(&self, side: Side) -> u64 {
        match side {
            Side::Player => self.p_money_after,
            Side::Ai => self.a_money_after,
        }
    }
}

impl From<&RoundRecord> for HistoryEntry {
    fn from(record: &RoundRecord) -> Self {
        Self {
            round: record.round,
            player_bid: record.bids.player,
            ai_bid: record.bids.ai,
            winner: record.winner,
            maintenance_fee: record.maintenance_fee,
            p_money_after: record.ledger.player.money_after_bid,
            a_money_after: record.ledger.ai.money_after_bid,
        }
    }
}

/// Input handed to a `ReportGenerator`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportContext {
    /// Completed rounds (history length), not `current_round`.
    pub rounds: usize,
    pub scores: Sides<u32>,
    pub money_final: Sides<u64>,
    pub wins: WinCounts,
    pub bids: BidStats,
    /// Maintenance collected per participant.
    pub maintenance_total_paid: u64,
    pub starting_money: u64,
    pub history: Vec<HistoryEntry>,
}

impl ReportContext {
    /// Aggregate the state's history.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let history: Vec<HistoryEntry> = state.history().iter().map(HistoryEntry::from).collect();
        let rounds = history.len();

        let wins_for = |side| history.iter().filter(|h| h.winner == Some(side)).count();
        let player_wins = wins_for(Side::Player);
        let ai_wins = wins_for(Side::Ai);

        let player_bids: Vec<u64> = history.iter().map(|h| h.player_bid).collect();
        let ai_bids: Vec<u64> = history.iter().map(|h| h.ai_bid).collect();

        let bids = BidStats {
            player_avg: average(&player_bids),
            ai_avg: average(&ai_bids),
            player_max: player_bids.iter().copied().max().unwrap_or(0),
            ai_max: ai_bids.iter().copied().max().unwrap_or(0),
            player_total: total(&player_bids),
            ai_total: total(&ai_bids),
        };

        let maintenance_total_paid = history
            .iter()
            .fold(0u64, |acc, h| acc.saturating_add(h.maintenance_fee));

        Self {
            rounds,
            scores: state.participants().map(|_, p| p.score),
            money_final: state.participants().map(|_, p| p.money),
            wins: WinCounts {
                player: player_wins,
                ai: ai_wins,
                ties: rounds - player_wins - ai_wins,
            },
            bids,
            maintenance_total_paid,
            starting_money: state.starting_money(),
            history,
        }
    }

    /// Serialize for an external generator.
    pub fn to_json_pretty(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn total(values: &[u64]) -> u64 {
    values.iter().fold(0u64, |acc, v| acc.saturating_add(*v))
}

fn average(values: &[u64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64
    }
}
