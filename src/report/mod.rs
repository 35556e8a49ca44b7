//! End-of-game reporting.
//!
//! `ReportContext` aggregates the history into summary statistics; a
//! `ReportGenerator` turns that into text. `ProfileReporter` is the built-in
//! generator and classifies one side's bidding into a capital profile.

pub mod context;
pub mod profile;
pub mod generator;

pub use context::{BidStats, HistoryEntry, ReportContext, WinCounts};
pub use profile::{
    Adaptability, BiddingMetrics, CapitalEfficiency, CapitalProfile, EmotionalDiscipline,
    LiquidityManagement, ProfileLevel, RiskPosture,
};
pub use generator::{ProfileReporter, ReportGenerator};
