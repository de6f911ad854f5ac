//! Engine configuration.
//!
//! With the `serde` feature, [`EngineConfig`] deserializes from JSON/YAML so
//! the ranking and matcher choice can live next to the rest of an
//! application's settings. Missing fields take their defaults.
//!
//! ```json
//! { "ranking": "absolute_value", "mode": "trie" }
//! ```

use crate::{MatchMode, RankingStrategy};

/// Tunables applied by [`Assembler::with_config`](crate::Assembler::with_config).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct EngineConfig {
    /// How rule groups are ordered.
    pub ranking: RankingStrategy,
    /// Which query algorithm the built engine starts in.
    pub mode: MatchMode,
}

impl EngineConfig {
    /// Set the ranking strategy (builder pattern).
    #[must_use]
    pub fn with_ranking(mut self, ranking: RankingStrategy) -> Self {
        self.ranking = ranking;
        self
    }

    /// Set the match mode (builder pattern).
    #[must_use]
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }
}
