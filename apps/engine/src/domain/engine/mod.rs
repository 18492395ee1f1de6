//! Turn engine: owns deck, table and players and is the only place that
//! mutates them.
//!
//! Every public operation validates before it mutates, runs to a consistent
//! state, and then lets a computer-controlled seat act until a human
//! decision is needed or the round ends.

mod round_end;
mod settle;
#[cfg(any(test, feature = "test-hooks"))]
pub mod test_hooks;
mod turn;

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, error, info};

use crate::ai::{ActorError, ActorView, ComputerActor, SimpleActor};
use crate::domain::cards_types::{Card, CardId, CardIdAllocator, Category, FlexRole, Month};
use crate::domain::dealing::{deal_round, Deal, Deck};
use crate::domain::player::{Player, Seat};
use crate::domain::rules::RuleConfig;
use crate::domain::seed_derivation::derive_dealing_seed;
use crate::domain::scoring::total_score;
use crate::domain::state::{
    require_state, ChongtongTiming, GameState, GameStateKind, RoundOutcome, TurnEvent,
};
use crate::domain::table::Table;
use crate::errors::domain::{DomainError, ValidationKind};

/// Upper bound on consecutive computer decisions per public call.
const MAX_COMPUTER_STEPS: usize = 512;

/// Who put a three-card stack on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOrigin {
    Dealt,
    Created(Seat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayKind {
    Normal,
    Bomb,
    Dummy,
}

/// Bookkeeping for one capture step (play or draw).
#[derive(Debug, Clone, Default)]
struct PhaseCapture {
    /// Table cards of the month before the card arrived.
    matched_before: usize,
    captured: Vec<CardId>,
    left_on_table: bool,
    owner_before: Option<Seat>,
    stack: Option<StackOrigin>,
}

/// In-flight turn, kept across suspensions.
#[derive(Debug, Clone)]
struct TurnContext {
    seat: Seat,
    card: CardId,
    month: Option<Month>,
    kind: PlayKind,
    table_was_empty: bool,
    play: PhaseCapture,
    drawn: Option<CardId>,
    draw: PhaseCapture,
    events: Vec<TurnEvent>,
}

impl TurnContext {
    fn new(seat: Seat, card: CardId, month: Option<Month>, kind: PlayKind, table_was_empty: bool) -> Self {
        Self {
            seat,
            card,
            month,
            kind,
            table_was_empty,
            play: PhaseCapture::default(),
            drawn: None,
            draw: PhaseCapture::default(),
            events: Vec::new(),
        }
    }

    fn captured_this_turn(&self) -> impl Iterator<Item = &CardId> {
        self.play.captured.iter().chain(self.draw.captured.iter())
    }
}

/// Result of a public turn or response call, taken before any computer
/// follow-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSummary {
    pub state: GameStateKind,
    pub events: Vec<TurnEvent>,
}

pub struct GameManager {
    rules: RuleConfig,
    base_seed: u64,
    round_no: u32,
    ids: CardIdAllocator,
    deck: Deck,
    table: Table,
    players: [Player; 2],
    out_of_play: Vec<Card>,
    current: Seat,
    leader: Seat,
    state: GameState,
    turn: Option<TurnContext>,
    month_owners: BTreeMap<Month, Seat>,
    stacks: BTreeMap<Month, StackOrigin>,
    outcome: Option<RoundOutcome>,
    last_events: Vec<TurnEvent>,
    actor: Box<dyn ComputerActor>,
}

impl GameManager {
    /// New game with an entropy-seeded base seed. Dealt and `ready`.
    pub fn new(rules: RuleConfig) -> Self {
        Self::with_seed(rules, rand::rng().random())
    }

    /// New game whose every deal is reproducible from `seed`.
    pub fn with_seed(rules: RuleConfig, seed: u64) -> Self {
        let money = rules.money.starting_money;
        let mut gm = Self {
            rules,
            base_seed: seed,
            round_no: 0,
            ids: CardIdAllocator::default(),
            deck: Deck::default(),
            table: Table::default(),
            players: [
                Player::new(0, "Player 1", false, money),
                Player::new(1, "Computer", true, money),
            ],
            out_of_play: Vec::new(),
            current: 0,
            leader: 0,
            state: GameState::Ready,
            turn: None,
            month_owners: BTreeMap::new(),
            stacks: BTreeMap::new(),
            outcome: None,
            last_events: Vec::new(),
            actor: Box::new(SimpleActor),
        };
        gm.setup_game();
        gm
    }

    pub fn with_actor(mut self, actor: Box<dyn ComputerActor>) -> Self {
        self.actor = actor;
        self
    }

    /// Hand a seat to the computer actor or back to a human.
    pub fn set_computer(&mut self, seat: Seat, is_computer: bool) {
        if let Some(p) = self.players.get_mut(seat) {
            p.is_computer = is_computer;
        }
    }

    // -- accessors ---------------------------------------------------------

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_kind(&self) -> GameStateKind {
        self.state.kind()
    }

    pub fn round_no(&self) -> u32 {
        self.round_no
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    pub fn current_seat(&self) -> Seat {
        self.current
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat]
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn out_of_play(&self) -> &[Card] {
        &self.out_of_play
    }

    pub fn month_owners(&self) -> &BTreeMap<Month, Seat> {
        &self.month_owners
    }

    pub fn stacks(&self) -> &BTreeMap<Month, StackOrigin> {
        &self.stacks
    }

    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.outcome.as_ref()
    }

    /// Events of the most recent turn, or of the turn in flight.
    pub fn last_events(&self) -> &[TurnEvent] {
        match &self.turn {
            Some(ctx) => &ctx.events,
            None => &self.last_events,
        }
    }

    /// First hand card of the current seat matching month and category.
    pub fn find_hand_card(&self, month: Option<Month>, category: Category) -> Option<CardId> {
        self.players[self.current]
            .hand
            .iter()
            .find(|c| c.month == month && c.category == category)
            .map(|c| c.id)
    }

    /// Real cards across every zone; 48 in any consistent state.
    pub fn card_count(&self) -> usize {
        let real = |cards: &[Card]| cards.iter().filter(|c| !c.is_dummy()).count();
        real(self.deck.cards())
            + real(self.table.cards())
            + self.players.iter().map(|p| real(&p.hand) + real(&p.captured)).sum::<usize>()
            + real(&self.out_of_play)
    }

    // -- lifecycle ---------------------------------------------------------

    /// Deal a fresh round from a newly shuffled deck. State becomes `ready`.
    pub fn setup_game(&mut self) {
        self.round_no += 1;
        let seed = derive_dealing_seed(self.base_seed, self.round_no);
        let Deal {
            hands: [first, second],
            table,
            deck,
        } = deal_round(&mut self.ids, seed);

        self.players[0].reset_for_round(first);
        self.players[1].reset_for_round(second);
        self.table = Table::from_cards(table);
        self.deck = deck;
        self.out_of_play.clear();
        self.month_owners.clear();
        self.stacks = self
            .table
            .stacked_months()
            .into_iter()
            .map(|m| (m, StackOrigin::Dealt))
            .collect();
        self.turn = None;
        self.outcome = None;
        self.last_events.clear();
        self.current = self.leader;
        self.state = GameState::Ready;
        debug!(round = self.round_no, seed, leader = self.leader, "round dealt");
    }

    /// Leave `ready`: check deal-time endings, then hand over to the leader.
    pub fn start_game(&mut self) -> Result<TurnSummary, DomainError> {
        require_state(&self.state, GameStateKind::Ready)?;
        self.state = GameState::Playing;
        info!(round = self.round_no, leader = self.current, "round started");

        if self.rules.nagari.table_four_of_a_kind {
            if let Some(month) = self.table.four_of_a_kind() {
                info!(month, "four of a month on the table");
                self.end_nagari();
                return Ok(self.summary());
            }
        }
        if self.check_chongtong(ChongtongTiming::Initial)? {
            return Ok(self.summary());
        }
        self.run_computer()?;
        Ok(self.summary())
    }

    // -- public turn operations --------------------------------------------

    pub fn play_turn(&mut self, card: CardId) -> Result<TurnSummary, DomainError> {
        self.play_turn_inner(card)?;
        self.finish_call()
    }

    pub fn respond_to_shake(&mut self, month: Month, did_shake: bool) -> Result<TurnSummary, DomainError> {
        self.respond_to_shake_inner(month, did_shake)?;
        self.finish_call()
    }

    pub fn respond_to_capture(&mut self, choice: CardId) -> Result<TurnSummary, DomainError> {
        self.respond_to_capture_inner(choice)?;
        self.finish_call()
    }

    pub fn respond_to_chrysanthemum_choice(&mut self, role: FlexRole) -> Result<TurnSummary, DomainError> {
        self.respond_to_chrysanthemum_inner(role)?;
        self.finish_call()
    }

    pub fn respond_go_stop(&mut self, is_go: bool) -> Result<TurnSummary, DomainError> {
        self.respond_go_stop_inner(is_go)?;
        self.finish_call()
    }

    /// The caller's move has already been applied when the computer runs, so
    /// a failing actor never turns it into an error. The game stays where the
    /// actor stopped, waiting on the computer seat.
    fn finish_call(&mut self) -> Result<TurnSummary, DomainError> {
        let summary = self.summary();
        if let Err(err) = self.run_computer() {
            error!(error = %err, seat = self.current, "computer seat left the game waiting");
        }
        Ok(summary)
    }

    fn summary(&self) -> TurnSummary {
        TurnSummary {
            state: self.state.kind(),
            events: self.last_events().to_vec(),
        }
    }

    // -- computer seat -----------------------------------------------------

    fn view(&self, seat: Seat) -> ActorView<'_> {
        let me = &self.players[seat];
        ActorView {
            hand: &me.hand,
            table: self.table.cards(),
            captured: &me.captured,
            rules: &self.rules,
        }
    }

    /// Answer every decision that belongs to a computer seat.
    fn run_computer(&mut self) -> Result<(), DomainError> {
        for _ in 0..MAX_COMPUTER_STEPS {
            let seat = self.current;
            if !self.players[seat].is_computer {
                return Ok(());
            }
            match self.state.clone() {
                GameState::Playing => {
                    let card = self.actor.choose_play(&self.view(seat)).map_err(actor_error)?;
                    debug!(seat, card = %card, "computer plays");
                    self.play_turn_inner(card)?;
                }
                GameState::AskingShake { month, .. } => {
                    let yes = self.actor.choose_shake(&self.view(seat), month).map_err(actor_error)?;
                    self.respond_to_shake_inner(month, yes)?;
                }
                GameState::ChoosingCapture { options, .. } => {
                    let offered: Vec<&Card> = self
                        .table
                        .cards()
                        .iter()
                        .filter(|c| options.contains(&c.id))
                        .collect();
                    let choice = self
                        .actor
                        .choose_capture(&self.view(seat), &offered)
                        .map_err(actor_error)?;
                    self.respond_to_capture_inner(choice)?;
                }
                GameState::ChoosingChrysanthemumRole { .. } => {
                    let role = self
                        .actor
                        .choose_chrysanthemum_role(&self.view(seat))
                        .map_err(actor_error)?;
                    self.respond_to_chrysanthemum_inner(role)?;
                }
                GameState::AskingGoStop => {
                    let go = self.actor.choose_go(&self.view(seat)).map_err(actor_error)?;
                    self.respond_go_stop_inner(go)?;
                }
                GameState::Ready | GameState::Ended => return Ok(()),
            }
        }
        error!(steps = MAX_COMPUTER_STEPS, "computer seat did not yield");
        Err(DomainError::invariant("computer seat did not yield"))
    }

    fn recompute_scores(&mut self) {
        for p in &mut self.players {
            p.score = total_score(&p.captured, &self.rules);
        }
    }

    fn turn_ctx(&self) -> Result<&TurnContext, DomainError> {
        self.turn
            .as_ref()
            .ok_or_else(|| DomainError::invariant("no turn in progress"))
    }

    fn turn_ctx_mut(&mut self) -> Result<&mut TurnContext, DomainError> {
        self.turn
            .as_mut()
            .ok_or_else(|| DomainError::invariant("no turn in progress"))
    }
}

fn actor_error(err: ActorError) -> DomainError {
    error!(error = %err, "computer actor failed");
    DomainError::invariant(format!("computer actor: {err}"))
}

fn no_pending(expected: &str, state: &GameState) -> DomainError {
    DomainError::validation(
        ValidationKind::NoPendingDecision,
        format!("no {expected} decision pending, game is {:?}", state.kind()),
    )
}
