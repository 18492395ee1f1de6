//! Turn-level engine behavior: captures, suspensions and special moves.

use crate::ai::{ActorError, ActorView, ComputerActor};
use crate::domain::cards_types::{Card, CardId, Category, FlexRole, Month};
use crate::domain::engine::test_hooks::CardSpec;
use crate::domain::engine::StackOrigin;
use crate::domain::rules::{RoleChoiceTiming, RuleConfig};
use crate::domain::scoring::pi_count;
use crate::domain::snapshot::snapshot;
use crate::domain::state::{GameState, GameStateKind, TurnEvent};
use crate::domain::test_state_helpers::{
    animal, bright, double_junk, dummy, hand_card, junk, play, ribbon, scripted, table_card,
};
use crate::errors::domain::{DomainError, ValidationKind};

fn kind_of(err: DomainError) -> ValidationKind {
    match err {
        DomainError::Validation(kind, _) => kind,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn single_match_captures_pair_and_draw_is_placed() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(5)], &[junk(7), junk(8)]],
        &[ribbon(1), junk(3)],
        &[junk(11), junk(4)],
    );
    play(&mut gm, junk(1));

    assert_eq!(gm.player(0).captured.len(), 2);
    assert_eq!(gm.table().len(), 2);
    assert_eq!(gm.table().month_count(4), 1);
    assert_eq!(gm.month_owners().get(&4), Some(&0));
    assert_eq!(gm.current_seat(), 1);
    assert_eq!(gm.state_kind(), GameStateKind::Playing);
}

#[test]
fn card_not_in_hand_is_rejected_without_mutation() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1)], &[junk(7)]],
        &[junk(3)],
        &[junk(4)],
    );
    let before = snapshot(&gm);
    let err = gm.play_turn(CardId(9_999)).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::CardNotInHand);
    assert_eq!(snapshot(&gm), before);
}

#[test]
fn bomb_captures_four_and_hands_out_dummies() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[bright(3), ribbon(3), junk(3), junk(6)], &[junk(7)]],
        &[junk(3), junk(9)],
        &[junk(2), junk(10)],
    );
    gm.set_captured(1, &[junk(11), junk(12)]);

    let summary = gm.play_turn(hand_card(&gm, 0, bright(3))).unwrap();

    let p0 = gm.player(0);
    assert_eq!(p0.bomb_count, 1);
    assert_eq!(p0.shake_count, 1);
    assert_eq!(p0.dummy_card_count, 2);
    assert_eq!(p0.hand.iter().filter(|c| c.is_dummy()).count(), 2);
    assert_eq!(p0.hand.len(), 3);
    assert_eq!(p0.captured.len(), 5, "3 hand + 1 table + 1 stolen pi");
    assert_eq!(gm.player(1).captured.len(), 1);
    assert_eq!(gm.table().month_count(3), 0);
    assert!(summary.events.contains(&TurnEvent::Bomb { month: 3 }));
    assert!(summary.events.contains(&TurnEvent::PiTransferred { from: 1, to: 0, count: 1 }));
}

#[test]
fn dummy_play_only_draws() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[dummy(), junk(8)], &[junk(7)]],
        &[junk(9), junk(2)],
        &[junk(3), junk(9)],
    );
    assert_eq!(gm.player(0).dummy_card_count, 1);

    let summary = gm.play_turn(hand_card(&gm, 0, dummy())).unwrap();

    let p0 = gm.player(0);
    assert_eq!(p0.dummy_card_count, 0);
    assert_eq!(p0.hand.len(), 1);
    assert_eq!(p0.captured.len(), 2, "drawn 9 took the table 9");
    assert!(p0.captured.iter().all(|c| !c.is_dummy()));
    assert_eq!(summary.events, vec![TurnEvent::DummyPlayed]);
}

#[test]
fn shake_suspends_then_plays_the_stashed_card() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(4), junk(4), ribbon(4), junk(6)], &[junk(7)]],
        &[junk(9)],
        &[junk(11), junk(2)],
    );
    let card = hand_card(&gm, 0, junk(4));
    gm.play_turn(card).unwrap();
    assert_eq!(gm.state(), &GameState::AskingShake { card, month: 4 });
    assert_eq!(gm.player(0).hand.len(), 4, "nothing moved yet");

    let err = gm.play_turn(hand_card(&gm, 0, junk(6))).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::PhaseMismatch);

    let err = gm.respond_to_shake(5, true).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::MonthMismatch);
    assert_eq!(gm.state_kind(), GameStateKind::AskingShake);

    let summary = gm.respond_to_shake(4, true).unwrap();
    assert_eq!(summary.events.first(), Some(&TurnEvent::Shake { month: 4 }));
    let p0 = gm.player(0);
    assert_eq!(p0.shake_count, 1);
    assert!(p0.shaken_months.contains(&4));
    assert_eq!(p0.hand.len(), 3);
    assert_eq!(gm.table().month_count(4), 1);
    assert_eq!(gm.current_seat(), 1);
}

#[test]
fn declined_shake_is_not_asked_again() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(4), junk(4), ribbon(4), animal(4)], &[junk(7), junk(8)]],
        &[bright(4), junk(9)],
        &[junk(11), junk(12), junk(2), junk(10)],
    );
    gm.play_turn(hand_card(&gm, 0, junk(4))).unwrap();
    gm.respond_to_shake(4, false).unwrap();
    assert_eq!(gm.player(0).shake_count, 0);
    assert_eq!(gm.table().month_count(4), 0);

    play(&mut gm, junk(7));
    assert_eq!(gm.current_seat(), 0);

    // Three month-4 cards still in hand, but the prompt was answered.
    play(&mut gm, ribbon(4));
    assert_eq!(gm.state_kind(), GameStateKind::Playing);
    assert_eq!(gm.current_seat(), 1);
}

#[test]
fn response_without_pending_decision_is_rejected() {
    let mut gm = scripted(RuleConfig::default(), [&[junk(1)], &[junk(2)]], &[], &[junk(3)]);
    let err = gm.respond_to_shake(1, true).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::NoPendingDecision);
    let err = gm.respond_to_capture(CardId(0)).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::NoPendingDecision);
    let err = gm.respond_to_chrysanthemum_choice(FlexRole::Animal).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::NoPendingDecision);
    let err = gm.respond_go_stop(true).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::NoPendingDecision);
}

#[test]
fn ttadak_steals_when_play_and_draw_both_capture() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7)]],
        &[ribbon(1), junk(2), junk(9)],
        &[junk(5), animal(2)],
    );
    gm.set_captured(1, &[junk(11)]);

    let summary = gm.play_turn(hand_card(&gm, 0, junk(1))).unwrap();

    assert_eq!(gm.player(0).ttadak_count, 1);
    assert_eq!(gm.player(0).sweep_count, 0);
    assert!(gm.player(1).captured.is_empty());
    assert_eq!(gm.player(0).captured.len(), 5);
    assert!(summary.events.contains(&TurnEvent::Ttadak));
}

#[test]
fn jjok_when_draw_takes_back_the_played_card() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7)]],
        &[junk(9)],
        &[junk(5), ribbon(1)],
    );
    gm.set_captured(1, &[junk(11)]);

    let summary = gm.play_turn(hand_card(&gm, 0, junk(1))).unwrap();

    assert_eq!(gm.player(0).jjok_count, 1);
    assert_eq!(gm.player(0).ttadak_count, 0);
    assert!(summary.events.contains(&TurnEvent::Jjok));
    assert!(gm.player(1).captured.is_empty());
}

#[test]
fn seolsa_on_the_opponents_leave() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[ribbon(5), junk(8)], &[junk(7)]],
        &[junk(5), junk(9)],
        &[junk(3), junk(2)],
    );
    gm.set_month_owner(5, 1);
    gm.set_captured(1, &[junk(11)]);

    let summary = gm.play_turn(hand_card(&gm, 0, ribbon(5))).unwrap();

    assert_eq!(gm.player(0).seolsa_count, 1);
    assert!(summary.events.contains(&TurnEvent::Seolsa { month: 5 }));
    assert!(gm.player(1).captured.is_empty());
    assert_eq!(gm.month_owners().get(&5), None);
}

#[test]
fn own_leave_is_not_seolsa() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[ribbon(5), junk(8)], &[junk(7)]],
        &[junk(5), junk(9)],
        &[junk(3), junk(2)],
    );
    gm.set_month_owner(5, 0);
    gm.play_turn(hand_card(&gm, 0, ribbon(5))).unwrap();
    assert_eq!(gm.player(0).seolsa_count, 0);
}

#[test]
fn sweep_when_the_table_is_cleared() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7)]],
        &[ribbon(1), junk(2)],
        &[junk(5), animal(2)],
    );
    gm.set_captured(1, &[junk(10), junk(11), junk(12)]);

    let summary = gm.play_turn(hand_card(&gm, 0, junk(1))).unwrap();

    assert!(gm.table().is_empty());
    assert_eq!(gm.player(0).sweep_count, 1);
    assert_eq!(gm.player(0).ttadak_count, 1);
    assert!(summary.events.contains(&TurnEvent::Sweep));
    assert_eq!(gm.player(1).captured.len(), 1, "ttadak and sweep each take one");
}

#[test]
fn no_sweep_from_an_empty_table() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7)]],
        &[],
        &[junk(5), junk(1)],
    );
    gm.play_turn(hand_card(&gm, 0, junk(1))).unwrap();
    assert!(gm.table().is_empty());
    assert_eq!(gm.player(0).sweep_count, 0);
}

#[test]
fn two_matches_suspend_for_a_choice() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(5), junk(8)], &[junk(7)]],
        &[ribbon(5), animal(5), junk(9)],
        &[junk(3), junk(2)],
    );
    gm.play_turn(hand_card(&gm, 0, junk(5))).unwrap();

    assert_eq!(gm.state_kind(), GameStateKind::ChoosingCapture);
    assert_eq!(gm.table().len(), 4, "played card waits on the table");
    let snap = snapshot(&gm);
    assert_eq!(snap.pending_capture_options.len(), 2);

    let before = snapshot(&gm);
    let err = gm.respond_to_capture(table_card(&gm, junk(9))).unwrap_err();
    assert_eq!(kind_of(err), ValidationKind::InvalidChoice);
    assert_eq!(snapshot(&gm), before);

    let chosen = table_card(&gm, animal(5));
    gm.respond_to_capture(chosen).unwrap();

    let p0 = gm.player(0);
    assert!(p0.captured.iter().any(|c| c.id == chosen));
    assert_eq!(p0.captured.len(), 2);
    assert_eq!(gm.table().month_count(5), 1);
    assert_eq!(gm.current_seat(), 1);
}

#[test]
fn three_matches_take_the_whole_month() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(5), junk(8)], &[junk(7)]],
        &[ribbon(5), animal(5), junk(5), junk(9)],
        &[junk(3), junk(2)],
    );
    gm.play_turn(hand_card(&gm, 0, junk(5))).unwrap();
    assert_eq!(gm.player(0).captured.len(), 4);
    assert_eq!(gm.table().month_count(5), 0);
}

#[test]
fn ppeok_is_created_then_eaten_by_the_opponent() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(6), junk(8)], &[junk(6), junk(7)]],
        &[ribbon(6), junk(9)],
        &[junk(10), junk(3), animal(6)],
    );
    gm.set_captured(0, &[junk(11), junk(12)]);

    let summary = gm.play_turn(hand_card(&gm, 0, junk(6))).unwrap();
    assert!(summary.events.contains(&TurnEvent::PpeokCreated { month: 6 }));
    assert!(summary.events.contains(&TurnEvent::PiTransferred { from: 0, to: 1, count: 1 }));
    assert_eq!(gm.table().month_count(6), 3);
    assert_eq!(gm.stacks().get(&6), Some(&StackOrigin::Created(0)));
    assert_eq!(gm.player(0).ppeok_count, 1);
    assert_eq!(gm.player(0).captured.len(), 1);
    assert_eq!(gm.player(1).captured.len(), 1);

    let summary = gm.play_turn(hand_card(&gm, 1, junk(6))).unwrap();
    assert!(summary.events.contains(&TurnEvent::PpeokEaten { month: 6 }));
    assert!(summary.events.contains(&TurnEvent::PiTransferred { from: 0, to: 1, count: 1 }));
    assert_eq!(gm.table().month_count(6), 0);
    assert!(gm.stacks().get(&6).is_none());
    assert!(gm.player(0).captured.is_empty());
    assert_eq!(gm.player(1).captured.len(), 6);
}

#[test]
fn eating_your_own_ppeok_pays_more() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(6), junk(8)], &[junk(7)]],
        &[ribbon(6), animal(6), junk(6), junk(9)],
        &[junk(3), junk(2)],
    );
    gm.set_stack_origin(6, StackOrigin::Created(0));
    gm.set_captured(1, &[junk(10), junk(11), junk(12)]);

    gm.play_turn(hand_card(&gm, 0, junk(6))).unwrap();

    assert_eq!(gm.player(1).captured.len(), 1, "self-eat steals two");
}

#[test]
fn chrysanthemum_capture_asks_for_role() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[animal(9), junk(8)], &[junk(7)]],
        &[junk(9)],
        &[junk(3), junk(2)],
    );
    gm.play_turn(hand_card(&gm, 0, animal(9))).unwrap();
    assert_eq!(gm.state_kind(), GameStateKind::ChoosingChrysanthemumRole);
    assert!(snapshot(&gm).pending_chrysanthemum_card.is_some());

    gm.respond_to_chrysanthemum_choice(FlexRole::DoublePi).unwrap();

    let captured = &gm.player(0).captured;
    let card = captured
        .iter()
        .find(|c| c.is_chrysanthemum())
        .expect("chrysanthemum captured");
    assert_eq!(card.selected_role, Some(FlexRole::DoublePi));
    assert_eq!(pi_count(captured, gm.rules()), 3);
    assert_eq!(gm.current_seat(), 1);
}

#[test]
fn chrysanthemum_never_asks_when_timing_is_never() {
    let mut rules = RuleConfig::default();
    rules.chrysanthemum.choice_timing = RoleChoiceTiming::Never;
    let mut gm = scripted(rules, [&[animal(9), junk(8)], &[junk(7)]], &[junk(9)], &[junk(3), junk(2)]);
    gm.play_turn(hand_card(&gm, 0, animal(9))).unwrap();
    assert_eq!(gm.state_kind(), GameStateKind::Playing);
    assert_eq!(gm.current_seat(), 1);
}

#[test]
fn pi_is_stolen_junk_first() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7)]],
        &[junk(9)],
        &[junk(5), ribbon(1)],
    );
    gm.set_captured(1, &[double_junk(11), junk(12)]);
    gm.play_turn(hand_card(&gm, 0, junk(1))).unwrap();

    let left = &gm.player(1).captured;
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].category, Category::DoubleJunk);
}

#[test]
fn chrysanthemum_held_as_double_pi_can_be_stolen() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7)]],
        &[junk(9)],
        &[junk(5), ribbon(1)],
    );
    let chrysanthemum = CardSpec {
        selected_role: Some(FlexRole::DoublePi),
        ..animal(9)
    };
    gm.set_captured(1, &[chrysanthemum]);

    let summary = gm.play_turn(hand_card(&gm, 0, junk(1))).unwrap();

    assert!(gm.player(1).captured.is_empty());
    assert!(gm
        .player(0)
        .captured
        .iter()
        .any(|c| c.month == Some(9) && c.category == Category::Animal));
    assert!(summary
        .events
        .contains(&TurnEvent::PiTransferred { from: 1, to: 0, count: 1 }));
}

#[test]
fn chrysanthemum_held_as_animal_is_not_stolen() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7)]],
        &[junk(9)],
        &[junk(5), ribbon(1)],
    );
    let chrysanthemum = CardSpec {
        selected_role: Some(FlexRole::Animal),
        ..animal(9)
    };
    gm.set_captured(1, &[chrysanthemum]);

    gm.play_turn(hand_card(&gm, 0, junk(1))).unwrap();

    assert_eq!(gm.player(1).captured.len(), 1);
}

#[test]
fn computer_seat_answers_automatically() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7), junk(12)]],
        &[junk(9)],
        &[junk(5), junk(6), junk(4), junk(3)],
    );
    gm.set_computer(1, true);
    gm.play_turn(hand_card(&gm, 0, junk(1))).unwrap();

    assert_eq!(gm.current_seat(), 0);
    assert_eq!(gm.player(1).hand.len(), 1);
    assert_eq!(gm.state_kind(), GameStateKind::Playing);
}

struct BrokenActor;

impl ComputerActor for BrokenActor {
    fn choose_play(&self, _: &ActorView<'_>) -> Result<CardId, ActorError> {
        Err(ActorError::Internal("broken".into()))
    }

    fn choose_capture(&self, _: &ActorView<'_>, _: &[&Card]) -> Result<CardId, ActorError> {
        Err(ActorError::Internal("broken".into()))
    }

    fn choose_shake(&self, _: &ActorView<'_>, _: Month) -> Result<bool, ActorError> {
        Err(ActorError::Internal("broken".into()))
    }

    fn choose_chrysanthemum_role(&self, _: &ActorView<'_>) -> Result<FlexRole, ActorError> {
        Err(ActorError::Internal("broken".into()))
    }

    fn choose_go(&self, _: &ActorView<'_>) -> Result<bool, ActorError> {
        Err(ActorError::Internal("broken".into()))
    }
}

#[test]
fn failing_computer_keeps_the_human_move() {
    let mut gm = scripted(
        RuleConfig::default(),
        [&[junk(1), junk(8)], &[junk(7), junk(12)]],
        &[junk(9)],
        &[junk(5), junk(6), junk(4), junk(3)],
    )
    .with_actor(Box::new(BrokenActor));
    gm.set_computer(1, true);

    let summary = gm.play_turn(hand_card(&gm, 0, junk(1))).unwrap();

    assert_eq!(summary.state, GameStateKind::Playing);
    assert_eq!(gm.player(0).hand.len(), 1);
    assert_eq!(gm.player(1).hand.len(), 2);
    assert_eq!(gm.current_seat(), 1);
    assert_eq!(gm.state_kind(), GameStateKind::Playing);
}
