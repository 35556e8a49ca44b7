//! Game configuration.
//!
//! Everything a driving loop needs to set up a game: starting money, the
//! maintenance schedule, which side the caller plays, and the context handed
//! to the bid oracle (lookback window, personality, seed).
//!
//! Deserializes with defaults for missing fields, so a config file only needs
//! the values it changes.

use serde::{Deserialize, Serialize};

use super::error::{EngineResult, GameError};
use super::side::Side;
use super::state::DEFAULT_STARTING_MONEY;
use crate::oracle::Personality;
use crate::rules::{MaintenanceSchedule, MAX_INTERVAL};

/// Default number of recent rounds shown to the bid oracle.
pub const DEFAULT_LOOKBACK: usize = 6;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Money each side starts with.
    pub starting_money: u64,

    /// Maintenance fee schedule.
    pub maintenance: MaintenanceSchedule,

    /// Number of most recent rounds exposed to the oracle.
    pub lookback: usize,

    /// Risk appetite tag passed to the oracle.
    pub personality: Personality,

    /// Side whose bid the caller supplies. The oracle plays the other one.
    pub human_side: Side,

    /// Seed for the oracle's bid selection.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: DEFAULT_STARTING_MONEY,
            maintenance: MaintenanceSchedule::default(),
            lookback: DEFAULT_LOOKBACK,
            personality: Personality::default(),
            human_side: Side::Player,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Create a default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set starting money.
    #[must_use]
    pub fn with_starting_money(mut self, money: u64) -> Self {
        self.starting_money = money;
        self
    }

    /// Set the maintenance schedule.
    #[must_use]
    pub fn with_maintenance(mut self, schedule: MaintenanceSchedule) -> Self {
        self.maintenance = schedule;
        self
    }

    /// Set the oracle lookback window.
    #[must_use]
    pub fn with_lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback;
        self
    }

    /// Set the oracle personality.
    #[must_use]
    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    /// Set the side the caller plays.
    #[must_use]
    pub fn with_human_side(mut self, side: Side) -> Self {
        self.human_side = side;
        self
    }

    /// Set the oracle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Side played by the bid oracle.
    #[must_use]
    pub fn oracle_side(&self) -> Side {
        self.human_side.opponent()
    }

    /// Reject configurations that cannot produce a game.
    pub fn validate(&self) -> EngineResult<()> {
        if self.starting_money == 0 {
            return Err(GameError::InvalidConfig {
                field: "starting_money".to_string(),
                value: "0".to_string(),
            });
        }
        if self.maintenance.interval() > MAX_INTERVAL {
            return Err(GameError::InvalidConfig {
                field: "maintenance.interval".to_string(),
                value: self.maintenance.interval().to_string(),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(text: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}
