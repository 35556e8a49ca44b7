//! Capital profile of one side's bidding.
//!
//! Five categories, each with four levels from safest to riskiest:
//!
//! | category             | measured as                                        |
//! |----------------------|----------------------------------------------------|
//! | Risk Posture         | mean share of available money bid                  |
//! | Capital Efficiency   | total bid / bid-round points, relative to bankroll |
//! | Emotional Discipline | how often a lost round is followed by escalation   |
//! | Liquidity Management | lowest money held relative to starting money       |
//! | Adaptability         | how often bid share shifts between rounds          |
//!
//! Walkover rounds carry no bidding decision and are ignored except for
//! liquidity.

use std::fmt;

use serde::Serialize;

use super::context::{HistoryEntry, ReportContext};
use crate::core::Side;
use crate::rules::MatchResult;

/// Share change between consecutive rounds that counts as a strategy shift.
const SHIFT_THRESHOLD: f64 = 0.10;

/// Share increase after a loss that counts as escalation.
const ESCALATION_THRESHOLD: f64 = 0.05;

/// A level within one profile category.
pub trait ProfileLevel: Copy {
    fn label(&self) -> &'static str;
    fn description(&self) -> &'static str;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RiskPosture {
    ConservativePreserver,
    MeasuredAllocator,
    AggressiveDeployer,
    AllInOpportunist,
}

impl ProfileLevel for RiskPosture {
    fn label(&self) -> &'static str {
        match self {
            RiskPosture::ConservativePreserver => "Conservative Preserver",
            RiskPosture::MeasuredAllocator => "Measured Allocator",
            RiskPosture::AggressiveDeployer => "Aggressive Deployer",
            RiskPosture::AllInOpportunist => "All-In Opportunist",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            RiskPosture::ConservativePreserver => {
                "Bids a small fraction of capital, prioritizing survival and optionality"
            }
            RiskPosture::MeasuredAllocator => {
                "Risks capital proportionally, balancing control and flexibility"
            }
            RiskPosture::AggressiveDeployer => "Commits large portions of capital to secure wins",
            RiskPosture::AllInOpportunist => {
                "Frequently risks outsized amounts, accepting bankruptcy risk"
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CapitalEfficiency {
    HighlyEfficient,
    FairValuePayer,
    Overpayer,
    CapitalBurner,
}

impl ProfileLevel for CapitalEfficiency {
    fn label(&self) -> &'static str {
        match self {
            CapitalEfficiency::HighlyEfficient => "Highly Efficient",
            CapitalEfficiency::FairValuePayer => "Fair Value Payer",
            CapitalEfficiency::Overpayer => "Overpayer",
            CapitalEfficiency::CapitalBurner => "Capital Burner",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            CapitalEfficiency::HighlyEfficient => "Consistently wins with minimal excess spending",
            CapitalEfficiency::FairValuePayer => "Pays a reasonable premium for results",
            CapitalEfficiency::Overpayer => "Regularly spends more than necessary to win",
            CapitalEfficiency::CapitalBurner => "Converts large capital outlays into limited results",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EmotionalDiscipline {
    Unshakeable,
    Composed,
    Reactive,
    TiltProne,
}

impl ProfileLevel for EmotionalDiscipline {
    fn label(&self) -> &'static str {
        match self {
            EmotionalDiscipline::Unshakeable => "Unshakeable",
            EmotionalDiscipline::Composed => "Composed",
            EmotionalDiscipline::Reactive => "Reactive",
            EmotionalDiscipline::TiltProne => "Tilt-Prone",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            EmotionalDiscipline::Unshakeable => "Maintains stable behavior regardless of outcome",
            EmotionalDiscipline::Composed => "Minor adjustments, but avoids emotional swings",
            EmotionalDiscipline::Reactive => "Noticeable bid increases after losses",
            EmotionalDiscipline::TiltProne => "Strong post-loss escalation and revenge bidding",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LiquidityManagement {
    LiquidityGuardian,
    BufferAware,
    ThinIce,
    BankruptcyDancer,
}

impl ProfileLevel for LiquidityManagement {
    fn label(&self) -> &'static str {
        match self {
            LiquidityManagement::LiquidityGuardian => "Liquidity Guardian",
            LiquidityManagement::BufferAware => "Buffer Aware",
            LiquidityManagement::ThinIce => "Thin Ice",
            LiquidityManagement::BankruptcyDancer => "Bankruptcy Dancer",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            LiquidityManagement::LiquidityGuardian => "Maintains a strong capital buffer throughout",
            LiquidityManagement::BufferAware => "Occasionally dips but avoids danger",
            LiquidityManagement::ThinIce => "Frequently operates near critical capital levels",
            LiquidityManagement::BankruptcyDancer => "Regularly risks running out of money",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Adaptability {
    RigidExecutor,
    DelayedAdapter,
    SituationalAdapter,
    HighlyAdaptive,
}

impl ProfileLevel for Adaptability {
    fn label(&self) -> &'static str {
        match self {
            Adaptability::RigidExecutor => "Rigid Executor",
            Adaptability::DelayedAdapter => "Delayed Adapter",
            Adaptability::SituationalAdapter => "Situational Adapter",
            Adaptability::HighlyAdaptive => "Highly Adaptive",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Adaptability::RigidExecutor => "Sticks to one strategy regardless of outcomes",
            Adaptability::DelayedAdapter => "Changes behavior only after sustained losses",
            Adaptability::SituationalAdapter => "Adjusts strategy based on game context",
            Adaptability::HighlyAdaptive => "Proactively shifts approach as conditions change",
        }
    }
}

/// Raw measurements behind a profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BiddingMetrics {
    /// Bid rounds played (walkovers excluded).
    pub bid_rounds: usize,
    /// Mean share of available money bid, if any round had money to bid.
    pub mean_share: Option<f64>,
    /// Bid-round points won.
    pub points: usize,
    /// Total bid in bid rounds.
    pub spent: u64,
    /// Lost rounds followed by escalation / lost rounds with a next round.
    pub escalation_rate: Option<f64>,
    /// Consecutive-round shifts / consecutive-round pairs.
    pub shift_rate: Option<f64>,
    /// Lowest money held after any round, relative to starting money.
    pub lowest_liquidity: f64,
    /// Money reached $0 at some point.
    pub hit_zero: bool,
}

impl BiddingMetrics {
    /// Measure `side` over the context's history.
    #[must_use]
    pub fn measure(context: &ReportContext, side: Side) -> Self {
        let bid_rounds: Vec<&HistoryEntry> =
            context.history.iter().filter(|h| !h.is_walkover()).collect();

        let shares: Vec<Option<f64>> = bid_rounds
            .iter()
            .map(|h| {
                let bid = h.bid(side);
                let before = h.money_after(side).saturating_add(bid);
                (before > 0).then(|| bid as f64 / before as f64)
            })
            .collect();

        let observed: Vec<f64> = shares.iter().flatten().copied().collect();
        let mean_share =
            (!observed.is_empty()).then(|| observed.iter().sum::<f64>() / observed.len() as f64);

        let points = bid_rounds.iter().filter(|h| h.winner == Some(side)).count();
        let spent = bid_rounds
            .iter()
            .fold(0u64, |acc, h| acc.saturating_add(h.bid(side)));

        let mut losses = 0u32;
        let mut escalations = 0u32;
        let mut pairs = 0u32;
        let mut shifts = 0u32;
        for i in 1..shares.len() {
            let (Some(prev), Some(next)) = (shares[i - 1], shares[i]) else {
                continue;
            };
            pairs += 1;
            if (next - prev).abs() > SHIFT_THRESHOLD {
                shifts += 1;
            }
            if bid_rounds[i - 1].winner == Some(side.opponent()) {
                losses += 1;
                if next - prev > ESCALATION_THRESHOLD {
                    escalations += 1;
                }
            }
        }

        let starting = context.starting_money.max(1) as f64;
        let lowest = context
            .history
            .iter()
            .map(|h| h.money_after(side))
            .chain(std::iter::once(context.money_final[side]))
            .min()
            .unwrap_or(context.starting_money);

        Self {
            bid_rounds: bid_rounds.len(),
            mean_share,
            points,
            spent,
            escalation_rate: ratio(escalations, losses),
            shift_rate: ratio(shifts, pairs),
            lowest_liquidity: lowest as f64 / starting,
            hit_zero: lowest == 0,
        }
    }

    /// Dollars bid per bid-round point.
    #[must_use]
    pub fn cost_per_point(&self) -> Option<f64> {
        (self.points > 0).then(|| self.spent as f64 / self.points as f64)
    }
}

fn ratio(numerator: u32, denominator: u32) -> Option<f64> {
    (denominator > 0).then(|| f64::from(numerator) / f64::from(denominator))
}

/// Classified profile for one side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CapitalProfile {
    pub side: Side,
    pub risk_posture: RiskPosture,
    pub capital_efficiency: CapitalEfficiency,
    pub emotional_discipline: EmotionalDiscipline,
    pub liquidity_management: LiquidityManagement,
    pub adaptability: Adaptability,
    pub archetype: &'static str,
    pub key_takeaway: String,
    pub suggestions: Vec<&'static str>,
    pub metrics: BiddingMetrics,
}

impl CapitalProfile {
    /// Classify `side` from a report context.
    #[must_use]
    pub fn from_context(context: &ReportContext, side: Side) -> Self {
        let metrics = BiddingMetrics::measure(context, side);

        let risk_posture = match metrics.mean_share {
            None => RiskPosture::ConservativePreserver,
            Some(s) if s < 0.15 => RiskPosture::ConservativePreserver,
            Some(s) if s < 0.30 => RiskPosture::MeasuredAllocator,
            Some(s) if s < 0.50 => RiskPosture::AggressiveDeployer,
            Some(_) => RiskPosture::AllInOpportunist,
        };

        let bankroll = context.starting_money.max(1) as f64;
        let capital_efficiency = match metrics.cost_per_point() {
            None if metrics.spent == 0 => CapitalEfficiency::FairValuePayer,
            None => CapitalEfficiency::CapitalBurner,
            Some(cost) if cost / bankroll < 0.10 => CapitalEfficiency::HighlyEfficient,
            Some(cost) if cost / bankroll < 0.20 => CapitalEfficiency::FairValuePayer,
            Some(cost) if cost / bankroll < 0.35 => CapitalEfficiency::Overpayer,
            Some(_) => CapitalEfficiency::CapitalBurner,
        };

        let emotional_discipline = match metrics.escalation_rate {
            None => EmotionalDiscipline::Unshakeable,
            Some(r) if r < 0.25 => EmotionalDiscipline::Unshakeable,
            Some(r) if r < 0.50 => EmotionalDiscipline::Composed,
            Some(r) if r < 0.75 => EmotionalDiscipline::Reactive,
            Some(_) => EmotionalDiscipline::TiltProne,
        };

        let liquidity_management = if metrics.hit_zero {
            LiquidityManagement::BankruptcyDancer
        } else if metrics.lowest_liquidity >= 0.50 {
            LiquidityManagement::LiquidityGuardian
        } else if metrics.lowest_liquidity >= 0.25 {
            LiquidityManagement::BufferAware
        } else {
            LiquidityManagement::ThinIce
        };

        let adaptability = match metrics.shift_rate {
            None => Adaptability::RigidExecutor,
            Some(r) if r <= 0.0 => Adaptability::RigidExecutor,
            Some(r) if r < 0.25 => Adaptability::DelayedAdapter,
            Some(r) if r < 0.50 => Adaptability::SituationalAdapter,
            Some(_) => Adaptability::HighlyAdaptive,
        };

        let archetype = archetype(risk_posture, liquidity_management, emotional_discipline);
        let key_takeaway = key_takeaway(context, side, &metrics);

        let mut profile = Self {
            side,
            risk_posture,
            capital_efficiency,
            emotional_discipline,
            liquidity_management,
            adaptability,
            archetype,
            key_takeaway,
            suggestions: Vec::new(),
            metrics,
        };
        profile.suggestions = profile.pick_suggestions(context);
        profile
    }

    /// Three suggestions, weakest categories first.
    fn pick_suggestions(&self, context: &ReportContext) -> Vec<&'static str> {
        let mut picks = Vec::with_capacity(6);

        if matches!(
            self.liquidity_management,
            LiquidityManagement::ThinIce | LiquidityManagement::BankruptcyDancer
        ) {
            picks.push("Keep at least the next two maintenance fees in reserve before sizing a bid.");
        }
        if matches!(
            self.capital_efficiency,
            CapitalEfficiency::Overpayer | CapitalEfficiency::CapitalBurner
        ) {
            picks.push("Size bids just above the opponent's recent range; a $1 margin scores the same as $30.");
        }
        if matches!(
            self.emotional_discipline,
            EmotionalDiscipline::Reactive | EmotionalDiscipline::TiltProne
        ) {
            picks.push("After a lost round, hold your bid size for one round before escalating.");
        }
        if self.risk_posture == RiskPosture::AllInOpportunist {
            picks.push("Cap single-round exposure; all-pay losses are never refunded.");
        }
        let losing = context.scores[self.side] < context.scores[self.side.opponent()];
        if self.risk_posture == RiskPosture::ConservativePreserver && losing {
            picks.push("Concede cheap rounds on purpose, but contest a few rounds decisively.");
        }
        if matches!(
            self.adaptability,
            Adaptability::RigidExecutor | Adaptability::DelayedAdapter
        ) {
            picks.push("Vary bid sizes when the opponent's pattern changes; a fixed size is easy to exploit.");
        }

        for fallback in [
            "Let the opponent overpay for rounds you do not need.",
            "Treat cash as optionality: later rounds cost more just to enter.",
            "Bid near the opponent's median recent bid when you need the point.",
        ] {
            picks.push(fallback);
        }

        picks.truncate(3);
        picks
    }
}

fn archetype(
    risk: RiskPosture,
    liquidity: LiquidityManagement,
    discipline: EmotionalDiscipline,
) -> &'static str {
    match (risk, liquidity, discipline) {
        (_, _, EmotionalDiscipline::TiltProne) => "The Revenge Trader",
        (RiskPosture::AllInOpportunist, LiquidityManagement::BankruptcyDancer, _) => {
            "The High-Wire Gambler"
        }
        (RiskPosture::ConservativePreserver, LiquidityManagement::LiquidityGuardian, _) => {
            "The Vault Keeper"
        }
        (RiskPosture::ConservativePreserver, _, _) => "The Cautious Compounder",
        (RiskPosture::MeasuredAllocator, _, _) => "The Portfolio Balancer",
        (RiskPosture::AggressiveDeployer, _, _) => "The Momentum Buyer",
        (RiskPosture::AllInOpportunist, _, _) => "The Conviction Bettor",
    }
}

fn key_takeaway(context: &ReportContext, side: Side, metrics: &BiddingMetrics) -> String {
    let standing = match MatchResult::from_scores(context.scores) {
        MatchResult::Draw => "a draw".to_string(),
        result if result.is_winner(side) => "a win".to_string(),
        _ => "a loss".to_string(),
    };

    let opening = format!(
        "You finished {}-{} ({standing}) with ${} of ${} left.",
        context.scores[side],
        context.scores[side.opponent()],
        context.money_final[side],
        context.starting_money
    );

    match metrics.cost_per_point() {
        Some(cost) => format!("{opening} Each contested point cost about ${cost:.1}."),
        None => format!("{opening} No contested round was won."),
    }
}

fn line(f: &mut fmt::Formatter<'_>, name: &str, level: impl ProfileLevel) -> fmt::Result {
    writeln!(f, "{name}: {} - {}", level.label(), level.description())
}

impl fmt::Display for CapitalProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your Capital Profile:")?;
        line(f, "Risk Posture", self.risk_posture)?;
        line(f, "Capital Efficiency", self.capital_efficiency)?;
        line(f, "Emotional Discipline", self.emotional_discipline)?;
        line(f, "Liquidity Management", self.liquidity_management)?;
        line(f, "Adaptability", self.adaptability)?;
        writeln!(f)?;
        writeln!(f, "Overall Archetype:")?;
        writeln!(f, "{}", self.archetype)?;
        writeln!(f)?;
        writeln!(f, "Key Takeaway:")?;
        writeln!(f, "{}", self.key_takeaway)?;
        writeln!(f)?;
        writeln!(f, "Player Suggestions:")?;
        for suggestion in &self.suggestions {
            writeln!(f, "- {suggestion}")?;
        }
        Ok(())
    }
}
