//! Bid oracles for the automated side.
//!
//! ## Overview
//!
//! - **Traits**: `BidOracle` (what the engine calls), `BidPlanner` (what a
//!   guarded oracle calls)
//! - **Finalization**: `GuardedOracle` applies liquidity guardrails and a
//!   seeded draw to a planner's proposal
//! - **Baselines**: `HeuristicPlanner` for local play, `ScriptedOracle` for
//!   tests and replays
//!
//! ## Usage
//!
//! ```rust,ignore
//! use allpay_duel::oracle::{GuardedOracle, HeuristicPlanner};
//!
//! // Built once, passed into the engine, reused for every round
//! let oracle = GuardedOracle::new(HeuristicPlanner::new(), seed);
//! let engine = RoundEngine::new(oracle, &config);
//! ```

pub mod traits;
pub mod plan;
pub mod guarded;
pub mod heuristic;

pub use traits::{
    BidDecision, BidOracle, BidRequest, Personality, Rationale, RoundSummary, ScriptedOracle,
};
pub use plan::{BidForecast, BidPlan, BidPlanner, Intent, OpponentRead, StyleLabel};
pub use guarded::GuardedOracle;
pub use heuristic::HeuristicPlanner;
