//! Plan finalization with liquidity guardrails.
//!
//! `GuardedOracle` wraps a `BidPlanner` and turns its plan into one bid:
//!
//! 1. Validate the plan (monotonic forecast, non-empty notes).
//! 2. Reserve next round's maintenance. If next round is unaffordable no
//!    matter what, spend freely this round instead.
//! 3. Clamp the planned range to the spendable amount.
//! 4. Draw the final bid uniformly from the range.
//!
//! The draw uses a stream derived from the seed, side and round, so the same
//! request always yields the same bid and the oracle holds no mutable state.

use async_trait::async_trait;
use tracing::debug;

use super::plan::BidPlanner;
use super::traits::{BidDecision, BidOracle, BidRequest, Rationale};
use crate::core::{GameRng, OracleError};

/// Maximum planner notes carried into the rationale.
const MAX_NOTES: usize = 6;

/// Bid oracle that finalizes a planner's proposal.
#[derive(Clone, Debug)]
pub struct GuardedOracle<P: BidPlanner> {
    planner: P,
    rng: GameRng,
}

impl<P: BidPlanner> GuardedOracle<P> {
    /// Create a guarded oracle with a seeded bid selection stream.
    pub fn new(planner: P, seed: u64) -> Self {
        Self {
            planner,
            rng: GameRng::new(seed),
        }
    }

    /// The wrapped planner.
    pub fn planner(&self) -> &P {
        &self.planner
    }
}

#[async_trait]
impl<P: BidPlanner> BidOracle for GuardedOracle<P> {
    async fn decide(&self, request: &BidRequest) -> Result<BidDecision, OracleError> {
        let plan = self.planner.plan(request).await?;
        plan.validate()?;

        let my_money = request.my_money;
        let forecast = plan.forecast.clamped(request.opp_money);
        let read = plan.opponent;

        let mut rationale = Rationale::new();
        rationale.push(format!(
            "Intent: {} | Personality: {}",
            plan.intent, request.personality
        ));
        rationale.push(format!(
            "Opponent read: {} (aggr={:.2}, tilt={:.2}, vol={:.2})",
            read.style_label, read.aggression, read.tilt, read.volatility
        ));
        rationale.push(format!(
            "Forecast q25/q50/q75: {}/{}/{} (opp money={})",
            forecast.q25, forecast.q50, forecast.q75, request.opp_money
        ));
        rationale.extend(plan.notes.iter().take(MAX_NOTES).cloned());

        let next_fee = request.outlook.next_round;
        let doomed_next = next_fee > my_money;
        let spendable = if doomed_next {
            my_money
        } else {
            my_money - next_fee
        };

        rationale.push(if doomed_next {
            format!("Guardrail: next maintenance ${next_fee} is unaffordable -> SPIKE mode (spend now).")
        } else {
            format!("Guardrail: reserved next maintenance ${next_fee}, spendable={spendable}.")
        });

        let bid_min = plan.bid_min.min(spendable);
        let bid_max = plan.bid_max.min(spendable).max(bid_min);

        let mut rng = self
            .rng
            .for_context(&format!("{}:{}", request.side, request.round));
        let final_bid = rng.gen_inclusive(bid_min, bid_max).min(my_money);

        rationale.push(format!(
            "Planned range [{bid_min},{bid_max}] -> final bid ${final_bid} (intent={})",
            plan.intent
        ));

        debug!(
            side = %request.side,
            round = request.round,
            bid_min,
            bid_max,
            final_bid,
            "finalized bid plan"
        );

        Ok(BidDecision {
            final_bid,
            rationale,
        })
    }
}
