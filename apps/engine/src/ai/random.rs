//! Seeded random legal moves, used to drive whole games in tests.

use std::sync::Mutex;

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::trait_def::{ActorError, ActorView, ComputerActor};
use crate::domain::cards_types::{Card, CardId, FlexRole, Month};

/// Chooses uniformly among legal options.
///
/// `&self` trait methods need interior mutability for the RNG.
pub struct RandomActor {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomActor {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> Result<T, ActorError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| ActorError::Internal(format!("rng lock poisoned: {e}")))?;
        Ok(f(&mut rng))
    }
}

impl ComputerActor for RandomActor {
    fn choose_play(&self, view: &ActorView<'_>) -> Result<CardId, ActorError> {
        self.with_rng(|rng| view.hand.choose(rng).map(|c| c.id))?
            .ok_or_else(|| ActorError::NoOption("empty hand".into()))
    }

    fn choose_capture(&self, _view: &ActorView<'_>, options: &[&Card]) -> Result<CardId, ActorError> {
        self.with_rng(|rng| options.choose(rng).map(|c| c.id))?
            .ok_or_else(|| ActorError::NoOption("no capture options".into()))
    }

    fn choose_shake(&self, _view: &ActorView<'_>, _month: Month) -> Result<bool, ActorError> {
        self.with_rng(|rng| rng.random_bool(0.5))
    }

    fn choose_chrysanthemum_role(&self, _view: &ActorView<'_>) -> Result<FlexRole, ActorError> {
        self.with_rng(|rng| {
            if rng.random_bool(0.5) {
                FlexRole::Animal
            } else {
                FlexRole::DoublePi
            }
        })
    }

    fn choose_go(&self, _view: &ActorView<'_>) -> Result<bool, ActorError> {
        self.with_rng(|rng| rng.random_bool(0.3))
    }
}
