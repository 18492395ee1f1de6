//! Computer-controlled seat.

mod random;
mod simple;
mod trait_def;

pub use random::RandomActor;
pub use simple::SimpleActor;
pub use trait_def::{ActorError, ActorView, ComputerActor};
