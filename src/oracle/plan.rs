//! Bid plans produced by a planner.
//!
//! A planner (a language model, a heuristic, a human) proposes a bid *range*
//! together with a read of the opponent and a forecast of the opponent's bid.
//! `GuardedOracle` turns a validated plan into one concrete bid.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::traits::BidRequest;
use crate::core::OracleError;

/// What the plan is trying to achieve this round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Preserve liquidity.
    Save,
    /// Bid low to draw the opponent into overpaying.
    Bait,
    /// Spend heavily now.
    Spike,
    #[default]
    Balanced,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Intent::Save => "save",
            Intent::Bait => "bait",
            Intent::Spike => "spike",
            Intent::Balanced => "balanced",
        };
        f.write_str(name)
    }
}

/// Observed opponent style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleLabel {
    Conservative,
    #[default]
    Neutral,
    Aggressive,
}

impl std::fmt::Display for StyleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StyleLabel::Conservative => "conservative",
            StyleLabel::Neutral => "neutral",
            StyleLabel::Aggressive => "aggressive",
        };
        f.write_str(name)
    }
}

/// Read of the opponent. Scores are in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OpponentRead {
    pub style_label: StyleLabel,
    pub aggression: f64,
    pub tilt: f64,
    pub volatility: f64,
}

/// Quantile forecast of the opponent's next bid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidForecast {
    pub q10: u64,
    pub q25: u64,
    pub q50: u64,
    pub q75: u64,
    pub q90: u64,
}

impl BidForecast {
    /// Are the quantiles non-decreasing?
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.q10 <= self.q25 && self.q25 <= self.q50 && self.q50 <= self.q75 && self.q75 <= self.q90
    }

    /// Clamp every quantile to `[0, max]`. Monotonicity is preserved.
    #[must_use]
    pub fn clamped(self, max: u64) -> Self {
        Self {
            q10: self.q10.min(max),
            q25: self.q25.min(max),
            q50: self.q50.min(max),
            q75: self.q75.min(max),
            q90: self.q90.min(max),
        }
    }
}

/// A planner's proposal for one round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BidPlan {
    pub intent: Intent,
    pub opponent: OpponentRead,
    pub forecast: BidForecast,
    pub bid_min: u64,
    pub bid_max: u64,
    /// Short actionable bullets, at least one.
    pub notes: Vec<String>,
}

impl BidPlan {
    /// Check the structural guarantees a plan must carry.
    pub fn validate(&self) -> Result<(), OracleError> {
        if !self.forecast.is_monotonic() {
            return Err(OracleError::MalformedPlan {
                message: format!(
                    "forecast quantiles must be monotonic: {}/{}/{}/{}/{}",
                    self.forecast.q10,
                    self.forecast.q25,
                    self.forecast.q50,
                    self.forecast.q75,
                    self.forecast.q90
                ),
            });
        }
        if self.notes.is_empty() {
            return Err(OracleError::MalformedPlan {
                message: "plan carries no notes".to_string(),
            });
        }
        let scores = [
            self.opponent.aggression,
            self.opponent.tilt,
            self.opponent.volatility,
        ];
        if scores.iter().any(|s| !(0.0..=1.0).contains(s)) {
            return Err(OracleError::MalformedPlan {
                message: "opponent read scores must be within [0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

/// Proposes a bid plan for a request.
///
/// Usually backed by a language-model call. Failures surface as
/// `OracleError` and leave the game state untouched.
#[async_trait]
pub trait BidPlanner: Send + Sync {
    async fn plan(&self, request: &BidRequest) -> Result<BidPlan, OracleError>;
}
