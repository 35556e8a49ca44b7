//! Round-indexed maintenance fees.
//!
//! `fee(round) = floor(max(0, round - 1) / interval) * increment`
//!
//! With the defaults (interval 2, increment 5) rounds 1-2 are free, rounds 3-4
//! cost 5, rounds 5-6 cost 10, and so on. Both parameters are non-zero, so the
//! fee grows without bound and every walkover eventually ends.

use std::num::{NonZeroU32, NonZeroU64};

use serde::{Deserialize, Serialize};

use crate::core::{EngineResult, GameError};

/// Default number of rounds between fee steps.
pub const DEFAULT_INTERVAL: u32 = 2;

/// Default fee added at each step.
pub const DEFAULT_INCREMENT: u64 = 5;

/// Longest accepted interval. Bounds the free rounds a walkover can award.
pub const MAX_INTERVAL: u32 = 1_000;

const DEFAULT_INTERVAL_NZ: NonZeroU32 = match NonZeroU32::new(DEFAULT_INTERVAL) {
    Some(v) => v,
    None => panic!("default interval must be non-zero"),
};

const DEFAULT_INCREMENT_NZ: NonZeroU64 = match NonZeroU64::new(DEFAULT_INCREMENT) {
    Some(v) => v,
    None => panic!("default increment must be non-zero"),
};

/// Pure maintenance fee schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    interval: NonZeroU32,
    increment: NonZeroU64,
}

impl Default for MaintenanceSchedule {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL_NZ,
            increment: DEFAULT_INCREMENT_NZ,
        }
    }
}

impl MaintenanceSchedule {
    /// Create a schedule. Zero increment, and an interval outside
    /// `1..=MAX_INTERVAL`, are rejected.
    pub fn new(interval: u32, increment: u64) -> EngineResult<Self> {
        let interval = NonZeroU32::new(interval)
            .filter(|i| i.get() <= MAX_INTERVAL)
            .ok_or_else(|| GameError::InvalidConfig {
                field: "maintenance.interval".to_string(),
                value: interval.to_string(),
            })?;
        let increment = NonZeroU64::new(increment).ok_or_else(|| GameError::InvalidConfig {
            field: "maintenance.increment".to_string(),
            value: increment.to_string(),
        })?;
        Ok(Self {
            interval,
            increment,
        })
    }

    /// Rounds between fee steps.
    #[must_use]
    pub fn interval(&self) -> u32 {
        self.interval.get()
    }

    /// Fee added at each step.
    #[must_use]
    pub fn increment(&self) -> u64 {
        self.increment.get()
    }

    /// Fee owed by each participant in `round`.
    #[must_use]
    pub fn fee(&self, round: u32) -> u64 {
        let steps = round.saturating_sub(1) / self.interval.get();
        u64::from(steps).saturating_mul(self.increment.get())
    }

    /// Fees for the three rounds after `round`.
    ///
    /// Advisory planning context for bid oracles; the engine never reads it.
    #[must_use]
    pub fn outlook(&self, round: u32) -> MaintenanceOutlook {
        MaintenanceOutlook {
            next_round: self.fee(round.saturating_add(1)),
            in_2_rounds: self.fee(round.saturating_add(2)),
            in_3_rounds: self.fee(round.saturating_add(3)),
        }
    }
}

/// Forward-looking maintenance fees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceOutlook {
    pub next_round: u64,
    pub in_2_rounds: u64,
    pub in_3_rounds: u64,
}
