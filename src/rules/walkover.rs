//! Forced walkover sequence after one side is eliminated.
//!
//! The survivor keeps paying maintenance alone and scores one point for every
//! round it can afford. The first round it cannot pay ends the game; that
//! attempt leaves no record. The fee schedule is non-decreasing and unbounded
//! while money only shrinks, so the loop always ends.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::maintenance::MaintenanceSchedule;
use crate::core::{GameState, Ledger, RoundRecord, Side, Sides};

/// What a walkover run did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkoverSummary {
    /// Side that scored the automatic points.
    pub survivor: Side,
    /// First round attempted.
    pub start_round: u32,
    /// Rounds the survivor could afford (records produced).
    pub rounds_awarded: u32,
    /// Round whose fee the survivor could not pay.
    pub stopped_at: u32,
}

/// Runs walkover sequences against a fee schedule.
#[derive(Clone, Copy, Debug, Default)]
pub struct WalkoverEngine {
    schedule: MaintenanceSchedule,
}

impl WalkoverEngine {
    /// Create a walkover engine.
    pub fn new(schedule: MaintenanceSchedule) -> Self {
        Self { schedule }
    }

    /// Award automatic points to `survivor` from `start_round` until it
    /// cannot pay maintenance.
    ///
    /// Leaves `current_round` at the round that could not be paid.
    pub fn run(&self, state: &mut GameState, survivor: Side, start_round: u32) -> WalkoverSummary {
        let mut round = start_round;
        let mut rounds_awarded = 0u32;

        loop {
            let fee = self.schedule.fee(round);
            state.set_maintenance_fee_current(fee);

            if !state.participant(survivor).can_afford(fee) {
                break;
            }

            let participants = state.participants_mut();
            let before = participants.map(|_, p| p.money);
            participants[survivor].pay(fee);
            participants[survivor].award_point();

            let ledger = participants.map(|side, p| Ledger {
                score: p.score,
                money_before_maintenance: before[side],
                money_before_bid: p.money,
                money_after_bid: p.money,
            });

            state.record(RoundRecord {
                round,
                bids: Sides::with_value(0),
                winner: Some(survivor),
                maintenance_fee: fee,
                ledger,
            });
            rounds_awarded += 1;
            debug!(round, fee, survivor = %survivor, "walkover point awarded");

            match round.checked_add(1) {
                Some(next) => round = next,
                None => break,
            }
        }

        state.set_current_round(round);
        info!(
            survivor = %survivor,
            start_round,
            rounds_awarded,
            stopped_at = round,
            "walkover finished"
        );

        WalkoverSummary {
            survivor,
            start_round,
            rounds_awarded,
            stopped_at: round,
        }
    }
}
