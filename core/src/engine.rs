//! `Engine`: The assembled, read-only matcher
//!
//! An engine owns its dimensions, the ranked and pruned rule groups, and the
//! configuration index. Queries borrow it immutably and return results that
//! point back into it, so a shared engine never clones configurations.

use crate::index::Index;
use crate::level::LevelMatcher;
use crate::trie::TrieMatcher;
use crate::{Dimension, DimensionId, RankingStrategy, RuleGroup, RuleGroupId};
use std::fmt;
use std::hash::Hash;

/// Which query algorithm an engine runs.
///
/// Both return the same results in the same order; they differ only in how
/// much of the index a query revisits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchMode {
    /// Scan the ranked rule groups one at a time.
    #[default]
    Level,
    /// Descend a prefix tree of the rule groups, sharing common prefixes.
    Trie,
}

/// One matched rule group and the configurations stored under it.
///
/// Borrowed from the [`Engine`] that produced it.
#[derive(Debug, PartialEq)]
pub struct MatchResult<'a, Cfg> {
    group: &'a RuleGroup,
    level: usize,
    configs: &'a [Cfg],
}

impl<'a, Cfg> MatchResult<'a, Cfg> {
    pub(crate) fn new(group: &'a RuleGroup, level: usize, configs: &'a [Cfg]) -> Self {
        Self {
            group,
            level,
            configs,
        }
    }

    /// The matched rule group.
    #[must_use]
    pub fn group(&self) -> &'a RuleGroup {
        self.group
    }

    /// Identity of the matched rule group.
    #[must_use]
    pub fn id(&self) -> &'a RuleGroupId {
        self.group.id()
    }

    /// Display name of the matched rule group.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.group.name()
    }

    /// Number of dimensions traversed to reach the configurations.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// The matched configurations, in load order. Never empty.
    #[must_use]
    pub fn configs(&self) -> &'a [Cfg] {
        self.configs
    }
}

impl<Cfg> Clone for MatchResult<'_, Cfg> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Cfg> Copy for MatchResult<'_, Cfg> {}

/// Counts gathered while assembling an engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssemblyReport {
    /// Registered dimensions.
    pub dimensions: usize,
    /// Rule groups generated before pruning (`2^dimensions - 1`).
    pub generated_groups: usize,
    /// Rule groups that received at least one configuration.
    pub retained_groups: usize,
    /// Configurations stored in the index.
    pub indexed_configs: usize,
    /// Configurations with no key on any dimension, left out of the index.
    pub skipped_configs: usize,
}

#[derive(Debug, Clone)]
enum Strategy {
    Level(LevelMatcher),
    Trie(TrieMatcher),
}

/// Request-scoped view over an engine, with the request's keys extracted once.
pub(crate) struct Query<'a, Req, Cfg, K> {
    dimensions: &'a [Dimension<Req, Cfg, K>],
    groups: &'a [RuleGroup],
    index: &'a Index<K, Cfg>,
    keys: Vec<Option<K>>,
}

impl<'a, Req, Cfg, K> Query<'a, Req, Cfg, K> {
    /// Request key for `id`, if the request has one.
    pub(crate) fn key(&self, id: DimensionId) -> Option<&K> {
        self.keys[id.index()].as_ref()
    }

    pub(crate) fn dimension(&self, id: DimensionId) -> &'a Dimension<Req, Cfg, K> {
        &self.dimensions[id.index()]
    }

    /// Ranked, pruned rule groups; a group's position is its rank.
    pub(crate) fn groups(&self) -> &'a [RuleGroup] {
        self.groups
    }

    pub(crate) fn index(&self) -> &'a Index<K, Cfg> {
        self.index
    }
}

/// A frozen multi-dimensional priority matcher.
///
/// Built by [`Assembler`](crate::Assembler). Immutable after construction and
/// `Send + Sync` whenever `Cfg` and `K` are, so one engine can serve many
/// threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use prio::Assembler;
///
/// struct Req { region: &'static str, tier: &'static str }
/// struct Offer { name: &'static str, region: Option<&'static str>, tier: &'static str }
///
/// let engine = Assembler::new()
///     .dimension("region", |r: &Req| Some(r.region), |o: &Offer| o.region)
///     .dimension("tier", |r: &Req| Some(r.tier), |o: &Offer| Some(o.tier))
///     .configs(vec![
///         Offer { name: "gold", region: Some("US"), tier: "premium" },
///         Offer { name: "any-premium", region: None, tier: "premium" },
///     ])
///     .build()
///     .unwrap();
///
/// let best = engine.evaluate(&Req { region: "US", tier: "premium" }).unwrap();
/// assert_eq!(best.name(), "region_tier");
/// assert_eq!(best.configs()[0].name, "gold");
///
/// let all = engine.evaluate_with(&Req { region: "EU", tier: "premium" }, true);
/// assert_eq!(all.len(), 1);
/// assert_eq!(all[0].configs()[0].name, "any-premium");
/// ```
pub struct Engine<Req, Cfg, K> {
    dimensions: Vec<Dimension<Req, Cfg, K>>,
    groups: Vec<RuleGroup>,
    index: Index<K, Cfg>,
    ranking: RankingStrategy,
    strategy: Strategy,
    report: AssemblyReport,
}

impl<Req, Cfg, K> Engine<Req, Cfg, K> {
    pub(crate) fn new(
        dimensions: Vec<Dimension<Req, Cfg, K>>,
        groups: Vec<RuleGroup>,
        index: Index<K, Cfg>,
        ranking: RankingStrategy,
        report: AssemblyReport,
    ) -> Self {
        Self {
            dimensions,
            groups,
            index,
            ranking,
            strategy: Strategy::Level(LevelMatcher),
            report,
        }
    }

    /// Switch to the trie matcher, building the trie if needed.
    #[must_use]
    pub fn into_trie(mut self) -> Self {
        if let Strategy::Level(_) = self.strategy {
            self.strategy = Strategy::Trie(TrieMatcher::build(&self.groups));
        }
        self
    }

    /// Switch to the level matcher, dropping the trie.
    #[must_use]
    pub fn into_level(mut self) -> Self {
        self.strategy = Strategy::Level(LevelMatcher);
        self
    }

    /// Switch to `mode`.
    #[must_use]
    pub fn with_mode(self, mode: MatchMode) -> Self {
        match mode {
            MatchMode::Level => self.into_level(),
            MatchMode::Trie => self.into_trie(),
        }
    }

    /// The active query algorithm.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        match self.strategy {
            Strategy::Level(_) => MatchMode::Level,
            Strategy::Trie(_) => MatchMode::Trie,
        }
    }

    /// The ranking strategy the rule groups were ordered with.
    #[must_use]
    pub fn ranking(&self) -> RankingStrategy {
        self.ranking
    }

    /// Registered dimensions, in weight order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension<Req, Cfg, K>] {
        &self.dimensions
    }

    /// Ranked rule groups that hold at least one configuration.
    #[must_use]
    pub fn rule_groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// Counts gathered during assembly.
    #[must_use]
    pub fn report(&self) -> AssemblyReport {
        self.report
    }

    /// Number of nodes in the trie, or `None` in level mode.
    #[must_use]
    pub fn trie_size(&self) -> Option<usize> {
        match &self.strategy {
            Strategy::Level(_) => None,
            Strategy::Trie(trie) => Some(trie.node_count()),
        }
    }
}

impl<Req, Cfg, K: Hash + Eq> Engine<Req, Cfg, K> {
    /// The single highest-priority match, or `None`.
    ///
    /// The first non-empty configuration list found along the ranked rule
    /// groups wins.
    #[must_use]
    pub fn evaluate(&self, request: &Req) -> Option<MatchResult<'_, Cfg>> {
        self.evaluate_with(request, false).into_iter().next()
    }

    /// Evaluate `request`.
    ///
    /// With `all_priority` set, every matching rule group contributes, in
    /// priority order. Otherwise at most one result is returned. A fuzzy
    /// dimension can make one rule group match several times, once per
    /// accepted key.
    #[must_use]
    pub fn evaluate_with(&self, request: &Req, all_priority: bool) -> Vec<MatchResult<'_, Cfg>> {
        let query = Query {
            dimensions: &self.dimensions,
            groups: &self.groups,
            index: &self.index,
            keys: self
                .dimensions
                .iter()
                .map(|d| d.extract_from_request(request))
                .collect(),
        };

        let results = match &self.strategy {
            Strategy::Level(level) => level.evaluate(&query, all_priority),
            Strategy::Trie(trie) => trie.evaluate(&query, all_priority),
        };

        for result in &results {
            tracing::trace!(
                group = %result.group,
                level = result.level,
                configs = result.configs.len(),
                "rule group matched"
            );
        }
        results
    }
}

impl<Req, Cfg, K> fmt::Debug for Engine<Req, Cfg, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("dimensions", &self.dimensions)
            .field("rule_groups", &self.groups.len())
            .field("ranking", &self.ranking)
            .field("mode", &self.mode())
            .field("report", &self.report)
            .finish()
    }
}
