//! Rules document loading.
//!
//! The rules file is JSON shaped like [`RuleConfig`]; any section or field
//! left out takes its standard value. A file that cannot be used never stops
//! the process: [`load_rules`] logs the failure and plays by
//! [`RuleConfig::minimal`].

use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::domain::rules::RuleConfig;
use crate::errors::domain::DomainError;

/// Read and parse a rules file.
pub fn try_load(path: &Path) -> Result<RuleConfig, DomainError> {
    let text = fs::read_to_string(path)
        .map_err(|e| DomainError::config(format!("cannot read {}: {e}", path.display())))?;
    parse_rules(&text).map_err(|e| match e {
        DomainError::Config(msg) => DomainError::config(format!("{}: {msg}", path.display())),
        other => other,
    })
}

pub fn parse_rules(text: &str) -> Result<RuleConfig, DomainError> {
    serde_json::from_str(text).map_err(|e| DomainError::config(e.to_string()))
}

/// Rules for this process. `None` or any load failure yields the minimal
/// fallback rules.
pub fn load_rules(path: Option<&Path>) -> RuleConfig {
    let Some(path) = path else {
        error!("critical: no rules file given, playing with minimal rules");
        return RuleConfig::minimal();
    };
    match try_load(path) {
        Ok(rules) => {
            info!(path = %path.display(), "rules loaded");
            rules
        }
        Err(err) => {
            error!(error = %err, "critical: rules file unusable, playing with minimal rules");
            RuleConfig::minimal()
        }
    }
}
