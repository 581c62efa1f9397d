//! Engine configuration: the time reference and the search budgets.
//!
//! Both are bound to a [`Recurrence`](crate::Recurrence) when it is built.
//! Nothing here is process-wide.
//!
//! ```
//! use cadence_engine::EngineConfig;
//!
//! let config: EngineConfig =
//!     serde_json::from_str(r#"{"reference": "Europe/Paris", "limits": {"search_attempts": 50}}"#)
//!         .unwrap();
//! assert_eq!(config.limits.search_attempts, 50);
//! assert_eq!(config.limits.all_attempts, 1_000_000);
//! ```

use serde::Deserialize;

use crate::calendar::TimeReference;
use crate::schedule::DEFAULT_RESOLVE_ATTEMPTS;

/// Iteration budgets. Running out is never an error: a search simply
/// returns what it found so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Passes allowed to a compiled schedule resolving its next valid instant.
    pub resolve_attempts: usize,
    /// Candidates examined by `next`, `prev`, `next_range` and `prev_range`.
    pub search_attempts: usize,
    /// Candidates examined by `all`.
    pub all_attempts: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            resolve_attempts: DEFAULT_RESOLVE_ATTEMPTS,
            search_attempts: 1_000,
            all_attempts: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How calendar fields are read. Defaults to UTC.
    pub reference: TimeReference,
    pub limits: SearchLimits,
}

impl EngineConfig {
    /// Default budgets under the given time reference.
    pub fn with_reference(reference: TimeReference) -> Self {
        EngineConfig {
            reference,
            ..EngineConfig::default()
        }
    }
}
