//! Play phase, draw phase and the responses that resume them.

use tracing::{debug, warn};

use super::{no_pending, GameManager, PlayKind, StackOrigin, TurnContext};
use crate::domain::cards_types::{Card, CardId, FlexRole, Month};
use crate::domain::player::{opponent_of, Seat};
use crate::domain::state::{require_state, CaptureStage, GameState, GameStateKind, TurnEvent};
use crate::domain::table::{perform_table_capture, CaptureOutcome};
use crate::errors::domain::{DomainError, ValidationKind};

impl GameManager {
    pub(super) fn play_turn_inner(&mut self, card_id: CardId) -> Result<(), DomainError> {
        require_state(&self.state, GameStateKind::Playing)?;
        let seat = self.current;
        let player = &self.players[seat];
        let Some(card) = player.hand.iter().find(|c| c.id == card_id) else {
            warn!(seat, card = %card_id, "card not in hand");
            return Err(DomainError::validation(
                ValidationKind::CardNotInHand,
                format!("card {card_id} is not in seat {seat}'s hand"),
            ));
        };

        let Some(month) = card.month else {
            return self.play_dummy(seat, card_id);
        };

        let in_hand = player.hand_month_count(month);
        let on_table = self.table.month_count(month);
        let moves = &self.rules.special_moves;
        if moves.bomb.enabled && in_hand == 3 && on_table == 1 {
            return self.play_bomb(seat, month, card_id);
        }
        if moves.shake.enabled && in_hand >= 3 && !player.shake_answered_months.contains(&month) {
            debug!(seat, month, "asking shake");
            self.state = GameState::AskingShake { card: card_id, month };
            return Ok(());
        }
        self.play_card(seat, card_id, Vec::new())
    }

    pub(super) fn respond_to_shake_inner(&mut self, month: Month, did_shake: bool) -> Result<(), DomainError> {
        let GameState::AskingShake { card, month: pending } = self.state else {
            return Err(no_pending("shake", &self.state));
        };
        if month != pending {
            return Err(DomainError::validation(
                ValidationKind::MonthMismatch,
                format!("shake pending for month {pending}, got {month}"),
            ));
        }

        let seat = self.current;
        let player = &mut self.players[seat];
        player.shake_answered_months.insert(month);
        let mut events = Vec::new();
        if did_shake {
            player.shake_count += 1;
            player.shaken_months.insert(month);
            events.push(TurnEvent::Shake { month });
        }
        debug!(seat, month, did_shake, "shake answered");
        self.state = GameState::Playing;
        self.play_card(seat, card, events)
    }

    pub(super) fn respond_to_capture_inner(&mut self, choice: CardId) -> Result<(), DomainError> {
        let GameState::ChoosingCapture { stage, card, options } = &self.state else {
            return Err(no_pending("capture", &self.state));
        };
        if !options.contains(&choice) {
            return Err(DomainError::validation(
                ValidationKind::InvalidChoice,
                format!("card {choice} is not one of the capture options"),
            ));
        }
        let (stage, card) = (*stage, *card);
        let waiting = self
            .table
            .take(card)
            .ok_or_else(|| DomainError::invariant(format!("waiting card {card} left the table")))?;
        self.state = GameState::Playing;
        self.resolve_capture(stage, waiting, Some(choice))
    }

    pub(super) fn respond_to_chrysanthemum_inner(&mut self, role: FlexRole) -> Result<(), DomainError> {
        let GameState::ChoosingChrysanthemumRole { card } = self.state else {
            return Err(no_pending("chrysanthemum role", &self.state));
        };
        let seat = self.current;
        let target = self.players[seat]
            .captured
            .iter_mut()
            .find(|c| c.id == card)
            .ok_or_else(|| DomainError::invariant(format!("chrysanthemum {card} not captured")))?;
        target.selected_role = Some(role);
        debug!(seat, ?role, "chrysanthemum role chosen");
        self.recompute_scores();
        self.state = GameState::Playing;
        self.finish_turn()
    }

    /// Normal play of a month card from hand.
    fn play_card(&mut self, seat: Seat, card_id: CardId, events: Vec<TurnEvent>) -> Result<(), DomainError> {
        let card = self.players[seat]
            .take_from_hand(card_id)
            .ok_or_else(|| DomainError::invariant(format!("card {card_id} vanished from hand")))?;
        let month = card
            .month
            .ok_or_else(|| DomainError::invariant("month card without month"))?;

        let mut ctx = TurnContext::new(seat, card_id, Some(month), PlayKind::Normal, self.table.is_empty());
        ctx.events = events;
        ctx.play.matched_before = self.table.month_count(month);
        ctx.play.owner_before = self.month_owners.get(&month).copied();
        if ctx.play.matched_before == 3 {
            ctx.play.stack = Some(self.stacks.get(&month).copied().unwrap_or(StackOrigin::Dealt));
        }
        debug!(seat, card = %card, matches = ctx.play.matched_before, "play phase");
        self.turn = Some(ctx);
        self.resolve_capture(CaptureStage::Play, card, None)
    }

    /// Three of a month onto its single table card.
    fn play_bomb(&mut self, seat: Seat, month: Month, card_id: CardId) -> Result<(), DomainError> {
        let mut ctx = TurnContext::new(seat, card_id, Some(month), PlayKind::Bomb, self.table.is_empty());
        let from_hand = self.players[seat].take_month_from_hand(month);
        let from_table = self.table.take_month(month);
        ctx.play.matched_before = from_table.len();
        ctx.play.owner_before = self.month_owners.remove(&month);
        self.stacks.remove(&month);
        ctx.play.captured = from_hand.iter().chain(&from_table).map(|c| c.id).collect();
        ctx.events.push(TurnEvent::Bomb { month });

        let dummy_count = self.rules.special_moves.bomb.dummy_card_count;
        let dummies: Vec<Card> = (0..dummy_count).map(|_| Card::dummy(self.ids.next_id())).collect();

        let player = &mut self.players[seat];
        player.captured.extend(from_hand);
        player.captured.extend(from_table);
        player.bomb_count += 1;
        player.shake_count += 1;
        player.shaken_months.insert(month);
        player.shake_answered_months.insert(month);
        player.give_dummies(dummies);
        debug!(seat, month, dummies = dummy_count, "bomb");

        self.turn = Some(ctx);
        self.draw_phase()
    }

    /// A bomb placeholder vanishes; only the draw happens.
    fn play_dummy(&mut self, seat: Seat, card_id: CardId) -> Result<(), DomainError> {
        self.players[seat]
            .take_from_hand(card_id)
            .ok_or_else(|| DomainError::invariant(format!("dummy {card_id} vanished from hand")))?;
        let mut ctx = TurnContext::new(seat, card_id, None, PlayKind::Dummy, self.table.is_empty());
        ctx.events.push(TurnEvent::DummyPlayed);
        debug!(seat, "dummy played");
        self.turn = Some(ctx);
        self.draw_phase()
    }

    /// Apply the capture rule and continue with the next phase.
    pub(super) fn resolve_capture(
        &mut self,
        stage: CaptureStage,
        card: Card,
        chosen: Option<CardId>,
    ) -> Result<(), DomainError> {
        let card_id = card.id;
        let month = card
            .month
            .ok_or_else(|| DomainError::invariant("capture of a card without month"))?;
        let outcome = perform_table_capture(&mut self.table, card, chosen);

        let ctx = self
            .turn
            .as_mut()
            .ok_or_else(|| DomainError::invariant("no turn in progress"))?;
        let seat = ctx.seat;
        let phase = match stage {
            CaptureStage::Play => &mut ctx.play,
            CaptureStage::Draw => &mut ctx.draw,
        };
        match outcome {
            CaptureOutcome::Placed => {
                phase.left_on_table = true;
                self.month_owners.insert(month, seat);
            }
            CaptureOutcome::Captured(cards) => {
                phase.captured.extend(cards.iter().map(|c| c.id));
                if self.table.month_count(month) == 0 {
                    self.month_owners.remove(&month);
                    self.stacks.remove(&month);
                }
                debug!(seat, ?stage, taken = cards.len(), "captured");
                self.players[seat].captured.extend(cards);
            }
            CaptureOutcome::NeedsChoice(options) => {
                debug!(seat, ?stage, "two matches, waiting for a choice");
                self.state = GameState::ChoosingCapture {
                    stage,
                    card: card_id,
                    options,
                };
                return Ok(());
            }
        }

        match stage {
            CaptureStage::Play => self.draw_phase(),
            CaptureStage::Draw => self.settle_turn(),
        }
    }

    fn draw_phase(&mut self) -> Result<(), DomainError> {
        let Some(drawn) = self.deck.draw() else {
            debug!("deck empty, no draw");
            return self.settle_turn();
        };
        let month = drawn
            .month
            .ok_or_else(|| DomainError::invariant("drawn card without month"))?;
        let matched_before = self.table.month_count(month);
        let owner_before = self.month_owners.get(&month).copied();
        let stack = self.stacks.get(&month).copied();
        let ppeok_enabled = self.rules.special_moves.ppeok.enabled;

        let ctx = self.turn_ctx_mut()?;
        ctx.drawn = Some(drawn.id);
        let makes_ppeok = ppeok_enabled
            && ctx.kind == PlayKind::Normal
            && ctx.month == Some(month)
            && ctx.play.matched_before == 1
            && ctx.play.captured.len() == 2;
        if makes_ppeok {
            return self.create_ppeok(drawn);
        }

        ctx.draw.matched_before = matched_before;
        ctx.draw.owner_before = owner_before;
        if matched_before == 3 {
            ctx.draw.stack = Some(stack.unwrap_or(StackOrigin::Dealt));
        }
        debug!(card = %drawn, matches = matched_before, "draw phase");
        self.resolve_capture(CaptureStage::Draw, drawn, None)
    }

    /// The played pair and the drawn card stay on the table as a stack.
    fn create_ppeok(&mut self, drawn: Card) -> Result<(), DomainError> {
        let ctx = self.turn_ctx_mut()?;
        let seat = ctx.seat;
        let month = ctx
            .month
            .ok_or_else(|| DomainError::invariant("ppeok without month"))?;
        let pair = std::mem::take(&mut ctx.play.captured);
        ctx.events.push(TurnEvent::PpeokCreated { month });

        for id in pair {
            let card = self.players[seat]
                .take_captured(id)
                .ok_or_else(|| DomainError::invariant(format!("ppeok card {id} not captured")))?;
            self.table.place(card);
        }
        self.table.place(drawn);
        self.stacks.insert(month, StackOrigin::Created(seat));
        self.month_owners.remove(&month);
        self.players[seat].ppeok_count += 1;
        debug!(seat, month, "ppeok");

        let penalty = self.rules.special_moves.ppeok.creation_penalty_pi;
        let mut events = Vec::new();
        self.steal_pi(seat, opponent_of(seat), penalty, &mut events);
        self.turn_ctx_mut()?.events.extend(events);
        self.settle_turn()
    }
}

