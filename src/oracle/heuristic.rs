//! Local heuristic planner (baseline, no network).
//!
//! Reads the opponent from the lookback window and sizes a bid band from the
//! personality tag:
//!
//! | personality  | intent   | band (share of own money) |
//! |--------------|----------|---------------------------|
//! | conservative | save     | 0% - 15%                  |
//! | neutral      | balanced | 10% - 25%                 |
//! | aggressive   | balanced | 25% - 40%                 |
//! | chaotic      | balanced | 0% - 100%                 |
//!
//! A neutral planner facing an aggressive opponent baits (0% - 10%). When next
//! round's maintenance is unaffordable regardless, the plan is a spike
//! (50% - 100%). With no history the opponent is assumed to bid around 15% of
//! their bankroll.

use async_trait::async_trait;

use super::plan::{BidForecast, BidPlan, BidPlanner, Intent, OpponentRead, StyleLabel};
use super::traits::{BidRequest, Personality, RoundSummary};
use crate::core::{OracleError, Side};

/// Opponent bid share assumed before any round has been seen.
const COLD_START_SHARE: f64 = 0.15;

/// Cold-start forecast shares for q10..q90.
const COLD_START_QUANTILES: [f64; 5] = [0.05, 0.10, 0.15, 0.20, 0.30];

/// Deterministic heuristic planner.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicPlanner;

impl HeuristicPlanner {
    /// Create a planner.
    pub fn new() -> Self {
        Self
    }

    /// Build a plan synchronously.
    #[must_use]
    pub fn plan_for(&self, request: &BidRequest) -> BidPlan {
        let opponent = request.side.opponent();
        let shares = bid_shares(&request.last_rounds, opponent);
        let read = read_opponent(&request.last_rounds, &shares, request.side);
        let forecast = forecast(&shares, request.opp_money);

        let (intent, low, high) = if request.outlook.next_round > request.my_money {
            (Intent::Spike, 0.5, 1.0)
        } else {
            match request.personality {
                Personality::Conservative => (Intent::Save, 0.0, 0.15),
                Personality::Neutral if read.style_label == StyleLabel::Aggressive => {
                    (Intent::Bait, 0.0, 0.10)
                }
                Personality::Neutral => (Intent::Balanced, 0.10, 0.25),
                Personality::Aggressive => (Intent::Balanced, 0.25, 0.40),
                Personality::Chaotic => (Intent::Balanced, 0.0, 1.0),
            }
        };

        let notes = vec![
            format!(
                "Opponent median forecast ${} of ${}",
                forecast.q50, request.opp_money
            ),
            format!(
                "Score {}-{} after {} observed rounds",
                request.my_score,
                request.opp_score,
                request.last_rounds.len()
            ),
            format!(
                "Maintenance ahead: ${} / ${} / ${}",
                request.outlook.next_round, request.outlook.in_2_rounds, request.outlook.in_3_rounds
            ),
        ];

        BidPlan {
            intent,
            opponent: read,
            forecast,
            bid_min: share_of(request.my_money, low),
            bid_max: share_of(request.my_money, high),
            notes,
        }
    }
}

#[async_trait]
impl BidPlanner for HeuristicPlanner {
    async fn plan(&self, request: &BidRequest) -> Result<BidPlan, OracleError> {
        Ok(self.plan_for(request))
    }
}

fn share_of(money: u64, share: f64) -> u64 {
    ((money as f64) * share).floor() as u64
}

/// Per-round share of pre-bid money that `side` bid, oldest first.
///
/// Rounds where `side` had nothing to bid with are skipped.
fn bid_shares(rounds: &[RoundSummary], side: Side) -> Vec<Option<f64>> {
    rounds
        .iter()
        .map(|r| {
            let bid = r.bid(side);
            let before = r.money_after(side).saturating_add(bid);
            (before > 0).then(|| bid as f64 / before as f64)
        })
        .collect()
}

fn read_opponent(rounds: &[RoundSummary], shares: &[Option<f64>], me: Side) -> OpponentRead {
    let observed: Vec<f64> = shares.iter().flatten().copied().collect();
    if observed.is_empty() {
        return OpponentRead {
            style_label: StyleLabel::Neutral,
            aggression: COLD_START_SHARE,
            tilt: 0.0,
            volatility: 0.0,
        };
    }

    let n = observed.len() as f64;
    let mean = observed.iter().sum::<f64>() / n;
    let variance = observed.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

    // Escalation after a loss: opponent lost round i and bid a larger share in i + 1.
    let mut losses = 0u32;
    let mut escalations = 0u32;
    for (i, window) in shares.windows(2).enumerate() {
        if rounds[i].winner != Some(me) {
            continue;
        }
        if let [Some(before), Some(after)] = window {
            losses += 1;
            if after > before {
                escalations += 1;
            }
        }
    }
    let tilt = if losses == 0 {
        0.0
    } else {
        f64::from(escalations) / f64::from(losses)
    };

    let style_label = if mean < 0.12 {
        StyleLabel::Conservative
    } else if mean > 0.30 {
        StyleLabel::Aggressive
    } else {
        StyleLabel::Neutral
    };

    OpponentRead {
        style_label,
        aggression: mean.clamp(0.0, 1.0),
        tilt,
        volatility: variance.sqrt().clamp(0.0, 1.0),
    }
}

fn forecast(shares: &[Option<f64>], opp_money: u64) -> BidForecast {
    let mut observed: Vec<f64> = shares.iter().flatten().copied().collect();
    let quantiles = if observed.is_empty() {
        COLD_START_QUANTILES
    } else {
        observed.sort_by(f64::total_cmp);
        [0.10, 0.25, 0.50, 0.75, 0.90].map(|q| nearest_rank(&observed, q))
    };

    let [q10, q25, q50, q75, q90] = quantiles.map(|share| share_of(opp_money, share));
    BidForecast {
        q10,
        q25,
        q50,
        q75,
        q90,
    }
}

/// Nearest-rank quantile of a sorted, non-empty slice.
fn nearest_rank(sorted: &[f64], q: f64) -> f64 {
    let rank = (q * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}
