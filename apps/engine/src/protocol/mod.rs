//! Line-oriented JSON surface over the engine.
//!
//! One request object per line in, one response object per line out.
//! Payloads are checked here; the engine only ever sees typed calls.

pub mod messages;
pub mod session;

pub use messages::{Action, ProtocolError, Request, Response};
pub use session::Session;
