//! Property tests for fees, money and scoring.

use proptest::prelude::*;

use allpay_duel::core::{GameConfig, GameState, Side, Sides};
use allpay_duel::oracle::ScriptedOracle;
use allpay_duel::rules::{MaintenanceSchedule, RoundEngine};
use allpay_duel::session::GameSession;

fn play_game(starting_money: u64, player_bids: Vec<u64>, ai_bids: Vec<u64>) -> GameState {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    runtime.block_on(async move {
        let config = GameConfig::default().with_starting_money(starting_money);
        let mut session = GameSession::new(ScriptedOracle::new(ai_bids), config).unwrap();
        session.play_out(player_bids).await.unwrap();
        session.snapshot()
    })
}

fn bids() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..80, 1..40)
}

proptest! {
    #[test]
    fn fee_matches_formula(interval in 1u32..10, increment in 1u64..50, round in 1u32..1000) {
        let schedule = MaintenanceSchedule::new(interval, increment).unwrap();
        let expected = u64::from((round - 1) / interval) * increment;
        prop_assert_eq!(schedule.fee(round), expected);
        prop_assert!(schedule.fee(round + 1) >= schedule.fee(round));
    }

    #[test]
    fn money_never_increases(
        starting_money in 1u64..300,
        player_bids in bids(),
        ai_bids in bids(),
    ) {
        let rounds = player_bids.len().min(ai_bids.len());
        let state = play_game(
            starting_money,
            player_bids[..rounds].to_vec(),
            ai_bids[..rounds].to_vec(),
        );

        let mut previous = Sides::with_value(starting_money);
        for record in state.history().iter() {
            for side in Side::ALL {
                let ledger = record.ledger[side];
                prop_assert!(ledger.money_before_maintenance <= previous[side]);
                prop_assert!(ledger.money_before_bid <= ledger.money_before_maintenance);
                prop_assert!(ledger.money_after_bid <= ledger.money_before_bid);
                previous[side] = ledger.money_after_bid;
            }
        }
        for side in Side::ALL {
            prop_assert!(state.participant(side).money <= previous[side]);
        }
    }

    #[test]
    fn at_most_one_point_per_round(
        starting_money in 1u64..300,
        player_bids in bids(),
        ai_bids in bids(),
    ) {
        let rounds = player_bids.len().min(ai_bids.len());
        let state = play_game(
            starting_money,
            player_bids[..rounds].to_vec(),
            ai_bids[..rounds].to_vec(),
        );

        let mut previous = Sides::with_value(0u32);
        for record in state.history().iter() {
            let gained = record.ledger.map(|side, l| l.score - previous[side]);
            match record.winner {
                Some(side) => {
                    prop_assert_eq!(gained[side], 1);
                    prop_assert_eq!(gained[side.opponent()], 0);
                }
                None => prop_assert_eq!(gained, Sides::with_value(0)),
            }
            previous = record.ledger.map(|_, l| l.score);
        }
    }

    #[test]
    fn recorded_fees_follow_schedule(
        starting_money in 1u64..300,
        player_bids in bids(),
        ai_bids in bids(),
    ) {
        let rounds = player_bids.len().min(ai_bids.len());
        let state = play_game(
            starting_money,
            player_bids[..rounds].to_vec(),
            ai_bids[..rounds].to_vec(),
        );

        let schedule = MaintenanceSchedule::default();
        let mut expected_round = 1;
        for record in state.history().iter() {
            prop_assert_eq!(record.round, expected_round);
            prop_assert_eq!(record.maintenance_fee, schedule.fee(record.round));
            expected_round += 1;
        }
    }

    #[test]
    fn double_insolvency_adds_nothing(
        player_money in 0u64..5,
        ai_money in 0u64..5,
        round in 3u32..5,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let engine = RoundEngine::new(ScriptedOracle::default(), &GameConfig::default());
        let mut state = GameState::new(100)
            .with_money(Side::Player, player_money)
            .with_money(Side::Ai, ai_money)
            .at_round(round);

        let outcome = runtime.block_on(engine.play_round(&mut state, 0)).unwrap();

        prop_assert!(outcome.is_ended());
        prop_assert!(state.history().is_empty());
        prop_assert_eq!(state.current_round(), round);
    }
}
