//! Game rules: maintenance fees, round resolution and walkovers.
//!
//! The rules never decide a bid themselves. `RoundEngine` takes the human
//! bid as an argument and asks a `BidOracle` for the other one; everything
//! else (fees, adjudication, elimination, walkovers) is deterministic.

pub mod maintenance;
pub mod walkover;
pub mod engine;

pub use maintenance::{
    MaintenanceOutlook, MaintenanceSchedule, DEFAULT_INCREMENT, DEFAULT_INTERVAL, MAX_INTERVAL,
};
pub use walkover::{WalkoverEngine, WalkoverSummary};
pub use engine::{adjudicate, EndReason, GameEnd, MatchResult, RoundEngine, RoundOutcome};
