//! Game state and the round history.
//!
//! ## RoundRecord
//!
//! Immutable snapshot of one processed round (bid round or walkover round):
//! both bids, the winner, the maintenance fee, and for each side the score
//! after the round plus money before maintenance, before the bid and after
//! the bid.
//!
//! ## GameState
//!
//! - Both participants
//! - Round counter (always the next round to be attempted)
//! - Most recently computed maintenance fee
//! - Append-only history, the only source for statistics and lookback
//!
//! The history is an `im::Vector`, so cloning a `GameState` is O(1) and
//! callers can hold snapshots without aliasing the live state.
//!
//! ## State transfer
//!
//! Serializes to `starting_money, current_round, maintenance_fee_current,
//! player, ai, history[]`. `GameState::hydrate` reads that shape leniently:
//! missing or malformed numbers fall back to defaults instead of failing.

use im::Vector;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::EngineResult;
use super::participant::Participant;
use super::side::{Side, Sides};

/// Default starting money for both participants.
pub const DEFAULT_STARTING_MONEY: u64 = 100;

/// One side's ledger for a single round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Score after the round.
    pub score: u32,
    /// Money before maintenance was collected.
    pub money_before_maintenance: u64,
    /// Money after maintenance, before the bid was paid.
    pub money_before_bid: u64,
    /// Money after the bid was paid.
    pub money_after_bid: u64,
}

/// Immutable snapshot of one processed round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RoundRecordWire", into = "RoundRecordWire")]
pub struct RoundRecord {
    /// Round number this record was produced at.
    pub round: u32,
    /// Bid paid by each side (zero in walkover rounds).
    pub bids: Sides<u64>,
    /// Side that scored, `None` for a tie.
    pub winner: Option<Side>,
    /// Maintenance fee collected from each side this round.
    pub maintenance_fee: u64,
    /// Per-side money and score snapshot.
    pub ledger: Sides<Ledger>,
}

impl RoundRecord {
    /// Was this a walkover round (no bidding, automatic point)?
    #[must_use]
    pub fn is_walkover(&self) -> bool {
        self.winner.is_some() && self.bids.player == 0 && self.bids.ai == 0
    }

    /// Money each side holds after the round.
    #[must_use]
    pub fn money_after(&self) -> Sides<u64> {
        self.ledger.map(|_, l| l.money_after_bid)
    }
}

/// Flat serialized form of `RoundRecord`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RoundRecordWire {
    round: u32,
    player_bid: u64,
    ai_bid: u64,
    winner: Option<Side>,
    maintenance_fee_of_round: u64,

    p_score: u32,
    p_money_before_m: u64,
    p_money_before_b: u64,
    p_money_after_b: u64,

    a_score: u32,
    a_money_before_m: u64,
    a_money_before_b: u64,
    a_money_after_b: u64,
}

impl From<RoundRecord> for RoundRecordWire {
    fn from(r: RoundRecord) -> Self {
        let p = r.ledger.player;
        let a = r.ledger.ai;
        Self {
            round: r.round,
            player_bid: r.bids.player,
            ai_bid: r.bids.ai,
            winner: r.winner,
            maintenance_fee_of_round: r.maintenance_fee,
            p_score: p.score,
            p_money_before_m: p.money_before_maintenance,
            p_money_before_b: p.money_before_bid,
            p_money_after_b: p.money_after_bid,
            a_score: a.score,
            a_money_before_m: a.money_before_maintenance,
            a_money_before_b: a.money_before_bid,
            a_money_after_b: a.money_after_bid,
        }
    }
}

impl From<RoundRecordWire> for RoundRecord {
    fn from(w: RoundRecordWire) -> Self {
        Self {
            round: w.round,
            bids: Sides::new(w.player_bid, w.ai_bid),
            winner: w.winner,
            maintenance_fee: w.maintenance_fee_of_round,
            ledger: Sides::new(
                Ledger {
                    score: w.p_score,
                    money_before_maintenance: w.p_money_before_m,
                    money_before_bid: w.p_money_before_b,
                    money_after_bid: w.p_money_after_b,
                },
                Ledger {
                    score: w.a_score,
                    money_before_maintenance: w.a_money_before_m,
                    money_before_bid: w.a_money_before_b,
                    money_after_bid: w.a_money_after_b,
                },
            ),
        }
    }
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    starting_money: u64,
    current_round: u32,
    maintenance_fee_current: u64,
    #[serde(flatten)]
    participants: Sides<Participant>,
    history: Vector<RoundRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(DEFAULT_STARTING_MONEY)
    }
}

impl GameState {
    /// Fresh game: both sides at `starting_money`, zero score, round 1.
    #[must_use]
    pub fn new(starting_money: u64) -> Self {
        Self {
            starting_money,
            current_round: 1,
            maintenance_fee_current: 0,
            participants: Sides::from_fn(|side| Participant::new(side.label(), starting_money)),
            history: Vector::new(),
        }
    }

    /// Override one side's money (scenario setup and restores).
    #[must_use]
    pub fn with_money(mut self, side: Side, money: u64) -> Self {
        self.participants[side].money = money;
        self
    }

    /// Start from a later round (scenario setup and restores).
    #[must_use]
    pub fn at_round(mut self, round: u32) -> Self {
        self.current_round = round.max(1);
        self
    }

    /// Money both sides started with.
    #[must_use]
    pub fn starting_money(&self) -> u64 {
        self.starting_money
    }

    /// The next round to be attempted.
    #[must_use]
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Maintenance fee computed for the most recent round attempt.
    #[must_use]
    pub fn maintenance_fee_current(&self) -> u64 {
        self.maintenance_fee_current
    }

    /// One side's participant.
    #[must_use]
    pub fn participant(&self, side: Side) -> &Participant {
        &self.participants[side]
    }

    /// Both participants.
    #[must_use]
    pub fn participants(&self) -> &Sides<Participant> {
        &self.participants
    }

    /// Full round history, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<RoundRecord> {
        &self.history
    }

    /// The most recent `n` records, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &RoundRecord> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip)
    }

    /// Most recent record, if any.
    #[must_use]
    pub fn last_record(&self) -> Option<&RoundRecord> {
        self.history.last()
    }

    // === Engine mutation ===

    pub(crate) fn participants_mut(&mut self) -> &mut Sides<Participant> {
        &mut self.participants
    }

    pub(crate) fn set_current_round(&mut self, round: u32) {
        self.current_round = round;
    }

    pub(crate) fn set_maintenance_fee_current(&mut self, fee: u64) {
        self.maintenance_fee_current = fee;
    }

    /// Append a record. History is never edited or reordered.
    pub(crate) fn record(&mut self, record: RoundRecord) {
        self.history.push_back(record);
    }

    // === State transfer ===

    /// Serialize to the plain state transfer shape.
    pub fn to_json_pretty(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse JSON text and rehydrate leniently.
    ///
    /// Only invalid JSON is an error; any JSON value yields a playable state.
    pub fn from_json_str(text: &str) -> EngineResult<Self> {
        let raw: Value = serde_json::from_str(text)?;
        Ok(Self::hydrate(&raw))
    }

    /// Rebuild a state from a loosely-shaped JSON value.
    ///
    /// - missing/malformed numbers default to 0
    /// - participant money defaults to `starting_money` (itself default 100)
    /// - `current_round` defaults to 1 and is never below 1
    /// - missing or unknown `winner` means a tie
    /// - history entries that are not objects are skipped
    #[must_use]
    pub fn hydrate(raw: &Value) -> Self {
        let starting_money = lenient_u64(raw.get("starting_money"), DEFAULT_STARTING_MONEY);

        let participants = Sides::from_fn(|side| {
            let key = match side {
                Side::Player => "player",
                Side::Ai => "ai",
            };
            hydrate_participant(raw.get(key), side, starting_money)
        });

        let history = raw
            .get("history")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| entry.is_object())
                    .map(hydrate_record)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            starting_money,
            current_round: lenient_u32(raw.get("current_round"), 1).max(1),
            maintenance_fee_current: lenient_u64(raw.get("maintenance_fee_current"), 0),
            participants,
            history,
        }
    }
}

fn hydrate_participant(raw: Option<&Value>, side: Side, starting_money: u64) -> Participant {
    let name = raw
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .unwrap_or(side.label());

    Participant {
        name: name.to_string(),
        money: lenient_u64(raw.and_then(|p| p.get("money")), starting_money),
        score: lenient_u32(raw.and_then(|p| p.get("score")), 0),
    }
}

fn hydrate_record(raw: &Value) -> RoundRecord {
    let num = |key: &str| lenient_u64(raw.get(key), 0);
    let score = |key: &str| lenient_u32(raw.get(key), 0);

    RoundRecord {
        round: score("round"),
        bids: Sides::new(num("player_bid"), num("ai_bid")),
        winner: raw
            .get("winner")
            .and_then(Value::as_str)
            .and_then(Side::from_label),
        maintenance_fee: num("maintenance_fee_of_round"),
        ledger: Sides::new(
            Ledger {
                score: score("p_score"),
                money_before_maintenance: num("p_money_before_m"),
                money_before_bid: num("p_money_before_b"),
                money_after_bid: num("p_money_after_b"),
            },
            Ledger {
                score: score("a_score"),
                money_before_maintenance: num("a_money_before_m"),
                money_before_bid: num("a_money_before_b"),
                money_after_bid: num("a_money_after_b"),
            },
        ),
    }
}

/// Read a non-negative integer from numbers or numeric strings.
fn lenient_u64(value: Option<&Value>, default: u64) -> u64 {
    fn from_f64(f: f64) -> Option<u64> {
        (f.is_finite() && f >= 0.0 && f <= u64::MAX as f64).then(|| f.trunc() as u64)
    }

    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(from_f64)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_f64))
        }
        _ => None,
    };
    parsed.unwrap_or(default)
}

fn lenient_u32(value: Option<&Value>, default: u32) -> u32 {
    u32::try_from(lenient_u64(value, u64::from(default))).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> RoundRecord {
        RoundRecord {
            round: 1,
            bids: Sides::new(30, 20),
            winner: Some(Side::Player),
            maintenance_fee: 0,
            ledger: Sides::new(
                Ledger {
                    score: 1,
                    money_before_maintenance: 100,
                    money_before_bid: 100,
                    money_after_bid: 70,
                },
                Ledger {
                    score: 0,
                    money_before_maintenance: 100,
                    money_before_bid: 100,
                    money_after_bid: 80,
                },
            ),
        }
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(100);
        assert_eq!(state.current_round(), 1);
        assert_eq!(state.maintenance_fee_current(), 0);
        assert_eq!(state.participant(Side::Player).money, 100);
        assert_eq!(state.participant(Side::Ai).money, 100);
        assert_eq!(state.participant(Side::Ai).name, "AI");
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_recent_lookback() {
        let mut state = GameState::new(100);
        for round in 1..=5 {
            state.record(RoundRecord {
                round,
                ..sample_record()
            });
        }

        let rounds: Vec<_> = state.recent(3).map(|r| r.round).collect();
        assert_eq!(rounds, vec![3, 4, 5]);

        let all: Vec<_> = state.recent(10).map(|r| r.round).collect();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);

        assert_eq!(state.recent(0).count(), 0);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut state = GameState::new(100);
        let snapshot = state.clone();
        state.record(sample_record());

        assert_eq!(snapshot.history().len(), 0);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_record_wire_shape() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(
            json,
            json!({
                "round": 1,
                "player_bid": 30,
                "ai_bid": 20,
                "winner": "PLAYER",
                "maintenance_fee_of_round": 0,
                "p_score": 1,
                "p_money_before_m": 100,
                "p_money_before_b": 100,
                "p_money_after_b": 70,
                "a_score": 0,
                "a_money_before_m": 100,
                "a_money_before_b": 100,
                "a_money_after_b": 80
            })
        );
    }

    #[test]
    fn test_state_wire_shape() {
        let state = GameState::new(100);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            json!({
                "starting_money": 100,
                "current_round": 1,
                "maintenance_fee_current": 0,
                "player": {"name": "PLAYER", "money": 100, "score": 0},
                "ai": {"name": "AI", "money": 100, "score": 0},
                "history": []
            })
        );
    }

    #[test]
    fn test_hydrate_round_trip() {
        let mut state = GameState::new(100).with_money(Side::Player, 70);
        state.record(sample_record());
        state.set_current_round(2);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(GameState::hydrate(&json), state);
    }

    #[test]
    fn test_hydrate_empty_object() {
        let state = GameState::hydrate(&json!({}));
        assert_eq!(state, GameState::new(DEFAULT_STARTING_MONEY));
    }

    #[test]
    fn test_hydrate_money_defaults_to_starting_money() {
        let state = GameState::hydrate(&json!({
            "starting_money": 250,
            "player": {"score": 2},
            "ai": {"money": "oops"}
        }));
        assert_eq!(state.participant(Side::Player).money, 250);
        assert_eq!(state.participant(Side::Player).score, 2);
        assert_eq!(state.participant(Side::Ai).money, 250);
    }

    #[test]
    fn test_hydrate_lenient_numbers() {
        let state = GameState::hydrate(&json!({
            "current_round": "4",
            "maintenance_fee_current": 5.0,
            "player": {"money": -3},
            "ai": {"money": "42"}
        }));
        assert_eq!(state.current_round(), 4);
        assert_eq!(state.maintenance_fee_current(), 5);
        assert_eq!(state.participant(Side::Player).money, 100);
        assert_eq!(state.participant(Side::Ai).money, 42);
    }

    #[test]
    fn test_hydrate_round_never_zero() {
        let state = GameState::hydrate(&json!({"current_round": 0}));
        assert_eq!(state.current_round(), 1);
    }

    #[test]
    fn test_hydrate_history_defaults() {
        let state = GameState::hydrate(&json!({
            "history": [
                {"round": 1, "player_bid": 10, "winner": "TIE"},
                "garbage",
                {"round": 2, "ai_bid": "7", "winner": "AI", "a_score": 1}
            ]
        }));

        let history = state.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].winner, None);
        assert_eq!(history[0].bids, Sides::new(10, 0));
        assert_eq!(history[0].ledger.player.money_after_bid, 0);
        assert_eq!(history[1].winner, Some(Side::Ai));
        assert_eq!(history[1].bids.ai, 7);
        assert_eq!(history[1].ledger.ai.score, 1);
    }

    #[test]
    fn test_from_json_str_rejects_invalid_json() {
        assert!(GameState::from_json_str("{not json").is_err());
        assert!(GameState::from_json_str("[]").is_ok());
    }

    #[test]
    fn test_is_walkover() {
        let mut record = sample_record();
        assert!(!record.is_walkover());

        record.bids = Sides::new(0, 0);
        record.winner = None;
        assert!(!record.is_walkover());

        record.winner = Some(Side::Ai);
        assert!(record.is_walkover());
    }
}
