//! `Assembler`: One-shot engine construction
//!
//! Collects dimensions and configurations, then [`build()`](Assembler::build)
//! runs the whole pipeline once:
//!
//! 1. validate the dimension set and sort it by weight
//! 2. generate every rule group and rank them
//! 3. index each configuration along its present keys, counting usage per
//!    rule group identity
//! 4. drop rule groups no configuration used
//! 5. switch into the configured match mode
//!
//! The usage counter lives only inside `build()`.

use crate::engine::{AssemblyReport, Engine, MatchMode};
use crate::index::Index;
use crate::{
    combinations, Dimension, DimensionId, EngineConfig, EngineError, KeyInput, KeyMatcher,
    RankingStrategy, RuleGroup, RuleGroupId, MAX_DIMENSIONS,
};
use std::collections::HashMap;
use std::hash::Hash;

/// Builder for an [`Engine`].
///
/// Dimensions registered with [`dimension()`](Self::dimension) or
/// [`fuzzy_dimension()`](Self::fuzzy_dimension) take their registration
/// position as weight. Use [`add()`](Self::add) with
/// [`Dimension::new`] for explicit weights; mixing both is fine as long as
/// the final weights are exactly `0..N`.
pub struct Assembler<Req, Cfg, K> {
    dimensions: Vec<Dimension<Req, Cfg, K>>,
    configs: Option<Vec<Cfg>>,
    config: EngineConfig,
}

impl<Req, Cfg, K> Default for Assembler<Req, Cfg, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Cfg, K> Assembler<Req, Cfg, K> {
    /// Create an empty assembler with default [`EngineConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            dimensions: Vec::new(),
            configs: None,
            config: EngineConfig::default(),
        }
    }

    /// Replace ranking and mode with `config`.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Select the ranking strategy.
    #[must_use]
    pub fn ranking(mut self, ranking: RankingStrategy) -> Self {
        self.config.ranking = ranking;
        self
    }

    /// Select the match mode the engine starts in.
    #[must_use]
    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Register a dimension built with an explicit weight.
    #[must_use]
    pub fn add(mut self, dimension: Dimension<Req, Cfg, K>) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Register an exact-mode dimension weighted by registration order.
    #[must_use]
    pub fn dimension<RI, CI>(
        self,
        name: impl Into<String>,
        request_input: RI,
        config_input: CI,
    ) -> Self
    where
        RI: KeyInput<Req, K> + 'static,
        CI: KeyInput<Cfg, K> + 'static,
    {
        let weight = self.dimensions.len();
        self.add(Dimension::with_slot(weight, request_input, config_input).named(name))
    }

    /// Register a fuzzy dimension weighted by registration order.
    #[must_use]
    pub fn fuzzy_dimension<RI, CI, M>(
        self,
        name: impl Into<String>,
        request_input: RI,
        config_input: CI,
        matcher: M,
    ) -> Self
    where
        RI: KeyInput<Req, K> + 'static,
        CI: KeyInput<Cfg, K> + 'static,
        M: KeyMatcher<K> + 'static,
    {
        let weight = self.dimensions.len();
        self.add(
            Dimension::with_slot(weight, request_input, config_input)
                .named(name)
                .fuzzy(matcher),
        )
    }

    /// Supply the configuration list. Replaces any earlier list.
    #[must_use]
    pub fn configs(mut self, configs: impl IntoIterator<Item = Cfg>) -> Self {
        self.configs = Some(configs.into_iter().collect());
        self
    }
}

impl<Req, Cfg, K: Hash + Eq> Assembler<Req, Cfg, K> {
    /// Validate, rank, index and prune.
    ///
    /// # Errors
    ///
    /// - [`EngineError::MissingConfigs`] if [`configs()`](Self::configs) was never called
    /// - [`EngineError::NoDimensions`] / [`EngineError::TooManyDimensions`] for the dimension count
    /// - [`EngineError::DuplicatePriority`] / [`EngineError::PriorityOutOfRange`] if the
    ///   weights are not exactly `0..N`
    pub fn build(self) -> Result<Engine<Req, Cfg, K>, EngineError> {
        let Self {
            mut dimensions,
            configs,
            config,
        } = self;
        let configs = configs.ok_or(EngineError::MissingConfigs)?;
        validate(&mut dimensions)?;
        let n = dimensions.len();

        let members: Vec<&Dimension<Req, Cfg, K>> = dimensions.iter().collect();
        let mut groups: Vec<RuleGroup> = combinations(&members)
            .iter()
            .map(|group| RuleGroup::from_dimensions(group))
            .collect();
        let generated_groups = groups.len();
        config.ranking.rank(&mut groups, n);

        let mut index = Index::new(n);
        let mut usage: HashMap<RuleGroupId, usize> = HashMap::new();
        let mut skipped_configs = 0;
        for cfg in configs {
            let path: Vec<(DimensionId, K)> = dimensions
                .iter()
                .filter_map(|d| d.extract_from_config(&cfg).map(|key| (d.id(), key)))
                .collect();
            if path.is_empty() {
                skipped_configs += 1;
                continue;
            }
            *usage
                .entry(RuleGroupId::new(path.iter().map(|(id, _)| *id)))
                .or_default() += 1;
            index.insert(path, cfg);
        }

        groups.retain(|group| usage.contains_key(group.id()));

        let report = AssemblyReport {
            dimensions: n,
            generated_groups,
            retained_groups: groups.len(),
            indexed_configs: usage.values().sum(),
            skipped_configs,
        };
        tracing::debug!(
            dimensions = report.dimensions,
            generated_groups = report.generated_groups,
            retained_groups = report.retained_groups,
            indexed_configs = report.indexed_configs,
            skipped_configs = report.skipped_configs,
            ranking = ?config.ranking,
            mode = ?config.mode,
            "engine assembled"
        );

        Ok(Engine::new(dimensions, groups, index, config.ranking, report).with_mode(config.mode))
    }
}

/// Check the dimension count and weights, leaving `dimensions` sorted by weight.
fn validate<Req, Cfg, K>(dimensions: &mut [Dimension<Req, Cfg, K>]) -> Result<(), EngineError> {
    let count = dimensions.len();
    if count == 0 {
        return Err(EngineError::NoDimensions);
    }
    if count > MAX_DIMENSIONS {
        return Err(EngineError::TooManyDimensions {
            count,
            max: MAX_DIMENSIONS,
        });
    }

    dimensions.sort_by_key(Dimension::priority);
    if let Some(pair) = dimensions
        .windows(2)
        .find(|pair| pair[0].priority() == pair[1].priority())
    {
        return Err(EngineError::DuplicatePriority {
            priority: pair[0].priority(),
        });
    }
    if let Some(d) = dimensions.iter().find(|d| d.priority() >= count) {
        return Err(EngineError::PriorityOutOfRange {
            name: d.name().map(str::to_owned),
            priority: d.priority(),
            count,
        });
    }
    Ok(())
}
