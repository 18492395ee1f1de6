//! Go/stop, instant endings, nagari, chongtong and settlement.

use crate::domain::engine::test_hooks::CardSpec;
use crate::domain::engine::GameManager;
use crate::domain::rules::{BakResolution, RuleConfig};
use crate::domain::state::{ChongtongInfo, ChongtongTiming, EndReason, GameStateKind, TurnEvent};
use crate::domain::test_state_helpers::{animal, bright, junk, play, ribbon, scripted};
use crate::errors::domain::{DomainError, ValidationKind};

const START_MONEY: i64 = 100_000;

/// Seat 0 holds four points and two brights; playing the 8 bright onto the
/// table 8 brings the score to exactly 7.
fn near_win(rules: RuleConfig, hand: &[CardSpec]) -> GameManager {
    let mut gm = scripted(
        rules,
        [hand, &[junk(10), junk(12)]],
        &[junk(8), junk(11)],
        &[junk(4), junk(6)],
    );
    gm.set_captured(
        0,
        &[
            ribbon(1),
            ribbon(2),
            ribbon(3),
            ribbon(4),
            ribbon(5),
            bright(1),
            bright(3),
        ],
    );
    gm
}

#[test]
fn reaching_min_score_asks_go_stop() {
    let mut gm = near_win(RuleConfig::default(), &[bright(8), junk(2)]);
    assert_eq!(gm.player(0).score, 4);

    play(&mut gm, bright(8));

    assert_eq!(gm.player(0).score, 7);
    assert_eq!(gm.state_kind(), GameStateKind::AskingGoStop);
    assert_eq!(gm.current_seat(), 0);
}

#[test]
fn stop_settles_score_and_money() {
    let mut gm = near_win(RuleConfig::default(), &[bright(8), junk(2)]);
    play(&mut gm, bright(8));
    gm.respond_go_stop(false).unwrap();

    assert_eq!(gm.state_kind(), GameStateKind::Ended);
    let outcome = gm.outcome().expect("round ended");
    assert_eq!(outcome.reason, EndReason::Stop);
    assert_eq!(outcome.winner, Some(0));
    assert_eq!(outcome.final_score, 14);
    assert_eq!(outcome.money_transfer, 1_400);
    let penalty = outcome.penalty.as_ref().expect("penalty computed");
    assert!(penalty.is_gwangbak);
    assert_eq!(penalty.score_formula, "(7) x Gwangbak(x2) = 14");
    assert_eq!(gm.player(0).money, START_MONEY + 1_400);
    assert_eq!(gm.player(1).money, START_MONEY - 1_400);
}

#[test]
fn go_records_and_passes_the_turn() {
    let mut gm = near_win(RuleConfig::default(), &[bright(8), junk(2)]);
    play(&mut gm, bright(8));
    let summary = gm.respond_go_stop(true).unwrap();

    assert_eq!(summary.events, vec![TurnEvent::Go { count: 1 }]);
    let p0 = gm.player(0);
    assert_eq!(p0.go_count, 1);
    assert_eq!(p0.last_go_score, 7);
    assert!(gm.player(1).is_pi_mungbak, "opponent had no pi");
    assert_eq!(gm.current_seat(), 1);
    assert_eq!(gm.state_kind(), GameStateKind::Playing);
}

#[test]
fn empty_hand_forces_stop() {
    let mut gm = near_win(RuleConfig::default(), &[bright(8)]);
    play(&mut gm, bright(8));

    assert_eq!(gm.state_kind(), GameStateKind::Ended);
    let outcome = gm.outcome().expect("round ended");
    assert_eq!(outcome.reason, EndReason::Stop);
    assert_eq!(outcome.winner, Some(0));
}

#[test]
fn fifth_go_ends_the_round() {
    let mut rules = RuleConfig::default();
    rules.endgame.max_round_score = 0;
    let mut gm = near_win(rules, &[bright(8), junk(2)]);
    gm.player_mut(0).go_count = 4;
    gm.player_mut(0).last_go_score = 6;

    play(&mut gm, bright(8));
    assert_eq!(gm.state_kind(), GameStateKind::AskingGoStop);
    gm.respond_go_stop(true).unwrap();

    let outcome = gm.outcome().expect("round ended");
    assert_eq!(outcome.reason, EndReason::MaxGo);
    let penalty = outcome.penalty.as_ref().expect("penalty computed");
    assert_eq!(penalty.go_addition, 4);
    assert_eq!(penalty.go_multiplier, 8);
    assert_eq!(outcome.final_score, 176);
    assert_eq!(penalty.score_formula, "(7 + Go 4) x Gwangbak(x2) x 5Go(x8) = 176");
}

#[test]
fn no_prompt_without_new_points_since_last_go() {
    let mut gm = near_win(RuleConfig::default(), &[bright(8), junk(2)]);
    gm.player_mut(0).last_go_score = 7;
    play(&mut gm, bright(8));
    assert_eq!(gm.state_kind(), GameStateKind::Playing);
    assert_eq!(gm.current_seat(), 1);
}

#[test]
fn max_round_score_ends_immediately() {
    let mut gm = near_win(RuleConfig::default(), &[bright(8), junk(2)]);
    gm.player_mut(0).shake_count = 3;
    play(&mut gm, bright(8));

    let outcome = gm.outcome().expect("round ended");
    assert_eq!(outcome.reason, EndReason::MaxScore);
    assert_eq!(outcome.final_score, 112);
}

#[test]
fn configured_instant_bak_ends_immediately() {
    let mut rules = RuleConfig::default();
    rules.endgame.max_round_score = 0;
    rules.endgame.instant_end_on_bak.gwangbak = true;
    let mut gm = near_win(rules, &[bright(8), junk(2)]);
    play(&mut gm, bright(8));

    let outcome = gm.outcome().expect("round ended");
    assert_eq!(outcome.reason, EndReason::InstantBak);
    assert_eq!(outcome.winner, Some(0));
}

#[test]
fn empty_deck_is_nagari() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7)]],
        &[junk(9)],
        &[junk(2)],
    );
    play(&mut gm, junk(1));

    assert_eq!(gm.state_kind(), GameStateKind::Ended);
    let outcome = gm.outcome().expect("round ended");
    assert_eq!(outcome.reason, EndReason::Nagari);
    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.money_transfer, 0);
    assert_eq!(gm.player(0).money, START_MONEY);
    assert!(gm.out_of_play().is_empty());
}

#[test]
fn spent_hands_move_leftovers_out_of_play() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1)], &[]],
        &[junk(9)],
        &[junk(4), junk(2)],
    );
    play(&mut gm, junk(1));

    assert_eq!(gm.outcome().map(|o| o.reason), Some(EndReason::Nagari));
    assert_eq!(gm.out_of_play().len(), 4);
    assert!(gm.table().is_empty());
    assert!(gm.deck().is_empty());
}

#[test]
fn initial_chongtong_wins_for_the_leader_first() {
    let mut gm = scripted(RuleConfig::default(), [&[], &[]], &[junk(9)], &[junk(2)]);
    gm.set_hand(0, &[junk(3), junk(3), ribbon(3), bright(3), junk(8)]);
    gm.set_hand(1, &[junk(5), junk(5), ribbon(5), animal(5)]);

    assert!(gm.force_chongtong_check(ChongtongTiming::Initial).unwrap());

    let outcome = gm.outcome().expect("round ended");
    assert_eq!(outcome.reason, EndReason::Chongtong);
    assert_eq!(outcome.winner, Some(0));
    assert_eq!(outcome.final_score, 10);
    assert_eq!(
        outcome.chongtong,
        Some(ChongtongInfo {
            month: 3,
            timing: ChongtongTiming::Initial
        })
    );
    assert_eq!(gm.player(0).money, START_MONEY + 1_000);
}

#[test]
fn chongtong_disabled_is_ignored() {
    let mut gm = scripted(RuleConfig::minimal(), [&[], &[]], &[junk(9)], &[junk(2)]);
    gm.set_hand(0, &[junk(3), junk(3), ribbon(3), bright(3)]);
    assert!(!gm.force_chongtong_check(ChongtongTiming::Initial).unwrap());
    assert_eq!(gm.state_kind(), GameStateKind::Playing);
}

#[test]
fn midgame_chongtong_on_turn_change() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7), junk(7), ribbon(7), animal(7), junk(12)]],
        &[junk(9)],
        &[junk(4), junk(2)],
    );
    play(&mut gm, junk(1));

    let outcome = gm.outcome().expect("round ended");
    assert_eq!(outcome.reason, EndReason::Chongtong);
    assert_eq!(outcome.winner, Some(1));
    assert_eq!(outcome.chongtong.map(|c| c.timing), Some(ChongtongTiming::Midgame));
}

#[test]
fn next_round_keeps_money_and_winner_leads() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7), junk(7), ribbon(7), animal(7), junk(12)]],
        &[junk(9)],
        &[junk(4), junk(2)],
    );
    play(&mut gm, junk(1));
    let round = gm.round_no();

    gm.setup_game();

    assert_eq!(gm.state_kind(), GameStateKind::Ready);
    assert_eq!(gm.round_no(), round + 1);
    assert_eq!(gm.current_seat(), 1);
    assert_eq!(gm.player(1).money, START_MONEY + 1_000);
    assert!(gm.player(1).captured.is_empty());
    assert_eq!(gm.player(0).hand.len(), 10);
    assert_eq!(gm.card_count(), 48);
    assert!(gm.outcome().is_none());
}

#[test]
fn four_of_a_month_on_the_table_voids_the_deal() {
    let mut gm = scripted(RuleConfig::default(), [&[junk(1)], &[junk(2)]], &[], &[junk(3)]);
    gm.set_table(&[junk(5), junk(5), ribbon(5), animal(5)]);
    gm.set_state(GameStateKind::Ready).unwrap();

    let summary = gm.start_game().unwrap();

    assert_eq!(summary.state, GameStateKind::Ended);
    assert_eq!(gm.outcome().map(|o| o.reason), Some(EndReason::Nagari));
}

#[test]
fn start_is_only_accepted_when_ready() {
    let mut gm = scripted(RuleConfig::default(), [&[junk(1)], &[junk(2)]], &[], &[junk(3)]);
    match gm.start_game().unwrap_err() {
        DomainError::Validation(kind, _) => assert_eq!(kind, ValidationKind::PhaseMismatch),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn pi_transfer_bak_moves_cards_instead_of_multiplying() {
    let mut rules = RuleConfig::default();
    rules.penalties.pibak.resolution_type = BakResolution::PiTransfer;
    rules.penalties.pibak.transfer_pi = 2;
    let mut gm = scripted(rules, [&[junk(1)], &[junk(2)]], &[], &[junk(3)]);
    let mut winner: Vec<CardSpec> = (1..=10).map(junk).collect();
    winner.extend([animal(2), animal(4), animal(8), animal(5), animal(6)]);
    gm.set_captured(0, &winner);
    gm.set_captured(1, &[junk(11), junk(12), junk(7)]);
    assert_eq!(gm.player(0).score, 7);

    gm.mock_game_over().unwrap();

    let outcome = gm.outcome().expect("round ended");
    let penalty = outcome.penalty.as_ref().expect("penalty computed");
    assert!(penalty.is_pibak);
    assert_eq!(penalty.penalty_multiplier, 1);
    assert_eq!(outcome.final_score, 9, "two more pi for the winner");
    assert_eq!(gm.player(1).captured.len(), 1);
    assert!(gm
        .last_events()
        .contains(&TurnEvent::PiTransferred { from: 1, to: 0, count: 2 }));
}

#[test]
fn ended_round_rejects_play() {
    let mut gm = near_win(RuleConfig::default(), &[bright(8)]);
    play(&mut gm, bright(8));
    let card = gm.player(1).hand[0].id;
    assert!(gm.play_turn(card).is_err());
    assert_eq!(gm.state_kind(), GameStateKind::Ended);
}
