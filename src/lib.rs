//! # allpay-duel
//!
//! A two-sided, repeated sealed-bid all-pay auction with rising maintenance
//! fees and walkover elimination.
//!
//! ## Rules
//!
//! 1. **All-Pay**: both sides pay their bid every round; only the higher bid
//!    scores a point, ties score nothing.
//!
//! 2. **Maintenance**: before bidding, each side pays a fee that grows in
//!    steps as rounds pass. A side that cannot pay is eliminated.
//!
//! 3. **Walkover**: once one side is eliminated, the survivor keeps paying
//!    maintenance alone and scores a point for every round it can afford.
//!
//! ## Architecture
//!
//! - **Injected Oracle**: the engine never decides a bid itself. The
//!   automated side's bid comes from a `BidOracle`, so the rules can be
//!   driven by a language model, a heuristic, or a script.
//!
//! - **Persistent History**: O(1) state snapshots via `im-rs`. The history
//!   is append-only and the sole source for lookback and reports.
//!
//! - **Commit On Success**: a round is computed on a scratch copy and only
//!   written back once the oracle has answered.
//!
//! ## Modules
//!
//! - `core`: sides, participants, state, configuration, RNG, errors
//! - `rules`: maintenance schedule, round engine, walkover engine
//! - `oracle`: bid oracle interface, guarded finalization, baseline planners
//! - `report`: report context and capital-profile reporting
//! - `session`: game session driver with save/load

pub mod core;
pub mod rules;
pub mod oracle;
pub mod report;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Side, Sides, Participant,
    GameRng, GameConfig,
    GameState, Ledger, RoundRecord,
    EngineResult, GameError, OracleError, ReportError,
};

pub use crate::rules::{
    MaintenanceSchedule, MaintenanceOutlook,
    RoundEngine, RoundOutcome, GameEnd, EndReason, MatchResult,
    WalkoverEngine, WalkoverSummary,
};

pub use crate::oracle::{
    BidOracle, BidRequest, BidDecision, Personality, Rationale, RoundSummary,
    BidPlanner, BidPlan, GuardedOracle, HeuristicPlanner, ScriptedOracle,
};

pub use crate::report::{ReportContext, ReportGenerator, ProfileReporter, CapitalProfile};

pub use crate::session::GameSession;
