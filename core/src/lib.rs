//! prio - Multi-dimensional priority rule matching
//!
//! Given N independent comparison dimensions (region, tier, category, ...),
//! every non-empty ordered subset of them is a candidate *rule group*.
//! Configurations are indexed under the rule group formed by the dimensions
//! they carry a key for; a query walks the rule groups in priority order and
//! returns the configurations of the most specific group that matches.
//!
//! # Architecture
//!
//! - [`Dimension`]: Weighted comparison axis, two [`KeyInput`]s plus an optional [`KeyMatcher`]
//! - [`combinations`]: Every non-empty subset of the dimensions, largest first
//! - [`RankingStrategy`]: Orders rule groups (Match-Count or Absolute-Value)
//! - [`RuleGroup`]: One ordered subset with a deterministic [`RuleGroupId`]
//! - [`Assembler`]: Validates, ranks, indexes and prunes in one pass
//! - [`Engine`]: Frozen matcher running in [`MatchMode::Level`] or [`MatchMode::Trie`]
//!
//! # Key Design Insights
//!
//! 1. **Weight is identity**: weights are exactly `0..N`, so a dimension's
//!    weight is also its slot in every index node's child array.
//!
//! 2. **Absent key → not applicable**: a configuration without a key is not
//!    indexed under that dimension; a request without a key skips every rule
//!    group that needs it. Neither is an error.
//!
//! 3. **Two matchers, one answer**: the level and trie matchers return the
//!    same results in the same order for every request.
//!
//! 4. **Unused groups are pruned**: rule groups no configuration populates
//!    never reach a query.
//!
//! # Example
//!
//! ```
//! use prio::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! struct Offer {
//!     name: &'static str,
//!     region: Option<&'static str>,
//!     tier: Option<&'static str>,
//!     category: Option<&'static str>,
//!     product: Option<&'static str>,
//! }
//!
//! struct Request {
//!     region: &'static str,
//!     tier: &'static str,
//!     category: &'static str,
//!     product: &'static str,
//! }
//!
//! let offer = |name, region, tier, category, product| Offer { name, region, tier, category, product };
//!
//! let engine = Assembler::new()
//!     .dimension("region", |r: &Request| Some(r.region), |o: &Offer| o.region)
//!     .dimension("tier", |r: &Request| Some(r.tier), |o: &Offer| o.tier)
//!     .dimension("category", |r: &Request| Some(r.category), |o: &Offer| o.category)
//!     .dimension("product", |r: &Request| Some(r.product), |o: &Offer| o.product)
//!     .configs(vec![
//!         offer("A", Some("US"), Some("premium"), Some("electronics"), Some("phone")),
//!         offer("B", Some("US"), Some("premium"), Some("electronics"), None),
//!         offer("C", Some("US"), None, None, None),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! let request = |region, tier, category, product| Request { region, tier, category, product };
//!
//! let hit = engine.evaluate(&request("US", "premium", "electronics", "phone")).unwrap();
//! assert_eq!((hit.configs()[0].name, hit.level()), ("A", 4));
//!
//! let hit = engine.evaluate(&request("US", "premium", "electronics", "tablet")).unwrap();
//! assert_eq!((hit.configs()[0].name, hit.level()), ("B", 3));
//!
//! let hit = engine.evaluate(&request("US", "basic", "food", "apple")).unwrap();
//! assert_eq!((hit.configs()[0].name, hit.level()), ("C", 1));
//!
//! assert!(engine.evaluate(&request("JP", "premium", "electronics", "phone")).is_none());
//!
//! // The trie matcher answers identically.
//! let engine = engine.into_trie();
//! let all = engine.evaluate_with(&request("US", "premium", "electronics", "phone"), true);
//! let names: Vec<_> = all.iter().map(|m| m.configs()[0].name).collect();
//! assert_eq!(names, ["A", "B", "C"]);
//! ```
//!
//! # Extensions
//!
//! - [`prio-test`](https://docs.rs/prio-test): String-map test domain and YAML conformance fixtures (internal)

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod assembler;
mod combination;
mod config;
mod dimension;
mod engine;
mod index;
mod key_input;
mod key_match;
mod level;
mod ranking;
mod rule_group;
mod trie;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use assembler::Assembler;
pub use dimension::{Dimension, DimensionId};
pub use engine::{AssemblyReport, Engine, MatchMode, MatchResult};
pub use key_input::KeyInput;
pub use key_match::{KeyMatchSpec, KeyMatcher};
pub use rule_group::{RuleGroup, RuleGroupId};

// Ranking
pub use combination::{combinations, combinations_of_size};
pub use ranking::RankingStrategy;

// Config
pub use config::EngineConfig;

// Concrete key matchers
pub use key_match::{AnyKey, ContainsKey, EndsWith, ExactKey, StartsWith};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use prio::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Concrete key matchers
        AnyKey,
        // Core types
        Assembler,
        ContainsKey,
        Dimension,
        DimensionId,
        EndsWith,
        Engine,
        // Config types
        EngineConfig,
        // Errors
        EngineError,
        ExactKey,
        // Traits
        KeyInput,
        KeyMatchSpec,
        KeyMatcher,
        MatchMode,
        MatchResult,
        RankingStrategy,
        RuleGroup,
        RuleGroupId,
        StartsWith,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of dimensions in one [`Engine`].
///
/// Assembly generates `2^N - 1` rule groups, so the bound keeps both the
/// ranking pass and the trie within a few tens of thousands of entries.
/// Checked by [`Assembler::build`].
pub const MAX_DIMENSIONS: usize = 16;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from dimension construction and engine assembly.
///
/// Queries never fail; every error surfaces before the engine exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A dimension was constructed with a weight below zero.
    #[error("dimension priority is {priority}, but priorities must be >= 0 (0 is most significant)")]
    NegativePriority {
        /// The rejected weight.
        priority: i64,
    },

    /// [`Assembler::build`] was called without a configuration list.
    #[error("no configuration list supplied: call `configs(..)` before `build()` (an empty list is allowed)")]
    MissingConfigs,

    /// [`Assembler::build`] was called with no dimensions.
    #[error("no dimensions registered: add at least one dimension before `build()`")]
    NoDimensions,

    /// More than [`MAX_DIMENSIONS`] dimensions were registered.
    #[error("{count} dimensions registered, but maximum allowed is {max}")]
    TooManyDimensions {
        /// Registered dimensions.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A weight does not fit the child array of an engine with `count` dimensions.
    #[error(
        "dimension {} has priority {priority}, but with {count} dimensions priorities must be in 0..{count}",
        .name.as_deref().unwrap_or("<unnamed>")
    )]
    PriorityOutOfRange {
        /// Name of the offending dimension, if it has one.
        name: Option<String>,
        /// The out-of-range weight.
        priority: usize,
        /// Number of registered dimensions.
        count: usize,
    },

    /// Two dimensions share a weight.
    #[error("priority {priority} is used by more than one dimension; each priority must be unique")]
    DuplicatePriority {
        /// The shared weight.
        priority: usize,
    },
}
