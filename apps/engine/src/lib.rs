#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod config;
pub mod domain;
pub mod errors;
pub mod protocol;

// Re-exports for public API
pub use config::rules_file::{load_rules, try_load};
pub use domain::engine::GameManager;
pub use domain::rules::RuleConfig;
pub use domain::snapshot::{snapshot, GameSnapshot};
pub use errors::{DomainError, ErrorCode, ValidationKind};
pub use protocol::session::Session;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    engine_test_support::logging::init();
}
