//! Simplest legal-move heuristic.

use super::trait_def::{ActorError, ActorView, ComputerActor};
use crate::domain::cards_types::{Card, CardId, Category, FlexRole, Month};
use crate::domain::scoring::pi_count;

/// Plays a matching card when it has one, always shakes, always stops.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleActor;

fn value(card: &Card) -> u8 {
    match card.category {
        Category::Bright => 5,
        Category::Animal => 4,
        Category::Ribbon => 3,
        Category::DoubleJunk => 2,
        Category::Junk => 1,
        Category::Dummy => 0,
    }
}

impl ComputerActor for SimpleActor {
    fn choose_play(&self, view: &ActorView<'_>) -> Result<CardId, ActorError> {
        let matching = view
            .hand
            .iter()
            .filter(|c| c.month.is_some_and(|m| view.table.iter().any(|t| t.is_month(m))))
            .max_by_key(|c| value(c));
        let dummy = view.hand.iter().find(|c| c.is_dummy());
        matching
            .or(dummy)
            .or_else(|| view.hand.iter().min_by_key(|c| value(c)))
            .map(|c| c.id)
            .ok_or_else(|| ActorError::NoOption("empty hand".into()))
    }

    fn choose_capture(&self, _view: &ActorView<'_>, options: &[&Card]) -> Result<CardId, ActorError> {
        options
            .iter()
            .max_by_key(|c| value(c))
            .map(|c| c.id)
            .ok_or_else(|| ActorError::NoOption("no capture options".into()))
    }

    fn choose_shake(&self, _view: &ActorView<'_>, _month: Month) -> Result<bool, ActorError> {
        Ok(true)
    }

    fn choose_chrysanthemum_role(&self, view: &ActorView<'_>) -> Result<FlexRole, ActorError> {
        // Two pi are worth more once junk is close to scoring.
        let pi = pi_count(view.captured, view.rules);
        if pi + 2 >= view.rules.scoring.junk.count.min_count {
            Ok(FlexRole::DoublePi)
        } else {
            Ok(FlexRole::Animal)
        }
    }

    fn choose_go(&self, _view: &ActorView<'_>) -> Result<bool, ActorError> {
        Ok(false)
    }
}
