//! Lean getters configuration
//!
//! Enablement for a query resolves in order:
//! 1. the query's own `lean({ getters })` option
//! 2. the installation default (`defaultLeanOptions.getters`)
//! 3. `false`

use serde::{Deserialize, Serialize};

use super::errors::HookResult;

/// Per-query lean options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeanOptions {
    /// Whether getters run on this query's results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getters: Option<bool>,
}

impl LeanOptions {
    /// Lean options with an explicit getters choice
    pub fn getters(enabled: bool) -> Self {
        Self {
            getters: Some(enabled),
        }
    }
}

/// Installation-level options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeanGettersOptions {
    /// Lean options assumed when a query does not set its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_lean_options: Option<LeanOptions>,
}

impl LeanGettersOptions {
    /// Getters off unless a query asks for them
    pub fn disabled_by_default() -> Self {
        Self::default()
    }

    /// Getters on unless a query opts out
    pub fn enabled_by_default() -> Self {
        Self {
            default_lean_options: Some(LeanOptions::getters(true)),
        }
    }

    /// Parses `{"defaultLeanOptions": {"getters": true}}`
    pub fn from_json_str(raw: &str) -> HookResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The installation default for getters
    pub fn default_getters(&self) -> bool {
        self.default_lean_options
            .and_then(|lean| lean.getters)
            .unwrap_or(false)
    }

    /// Resolves enablement for a query
    pub fn resolve(&self, query: Option<bool>) -> bool {
        query.unwrap_or_else(|| self.default_getters())
    }
}
