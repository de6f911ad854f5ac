//! `Dimension`: One weighted comparison axis
//!
//! A dimension pairs two [`KeyInput`]s (request side, configuration side) with
//! a priority weight and, optionally, a [`KeyMatcher`] for fuzzy comparison.
//! Weight 0 is the most significant dimension. The weight doubles as the
//! dimension's identity and as its slot in every index node's child array.

use crate::{EngineError, KeyInput, KeyMatcher};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::fmt;
use std::hash::Hash;

/// Stable identity of a dimension within one engine.
///
/// Derived from the priority weight, which is unique per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DimensionId(pub(crate) usize);

impl DimensionId {
    /// The slot index this dimension occupies (equal to its weight).
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, weighted comparison unit.
///
/// # Type Parameters
///
/// - `Req`: The request type keys are extracted from at query time
/// - `Cfg`: The configuration type keys are extracted from at assembly time
/// - `K`: The key type both sides produce
///
/// # Example
///
/// ```
/// use prio::Dimension;
///
/// struct Req { region: String }
/// struct Cfg { region: Option<String> }
///
/// let region = Dimension::new(
///     0,
///     |r: &Req| Some(r.region.clone()),
///     |c: &Cfg| c.region.clone(),
/// )
/// .unwrap()
/// .named("region");
///
/// assert_eq!(region.priority(), 0);
/// assert!(!region.is_fuzzy());
///
/// // Negative weights are rejected when the dimension is built.
/// assert!(Dimension::<Req, Cfg, String>::new(-1, |_: &Req| None::<String>, |_: &Cfg| None::<String>).is_err());
/// ```
pub struct Dimension<Req, Cfg, K> {
    name: Option<String>,
    priority: usize,
    request_input: Box<dyn KeyInput<Req, K>>,
    config_input: Box<dyn KeyInput<Cfg, K>>,
    matcher: Option<Box<dyn KeyMatcher<K>>>,
}

impl<Req, Cfg, K> Dimension<Req, Cfg, K> {
    /// Create a dimension with an explicit priority weight.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NegativePriority`] if `priority < 0`.
    pub fn new<RI, CI>(
        priority: i64,
        request_input: RI,
        config_input: CI,
    ) -> Result<Self, EngineError>
    where
        RI: KeyInput<Req, K> + 'static,
        CI: KeyInput<Cfg, K> + 'static,
    {
        let priority =
            usize::try_from(priority).map_err(|_| EngineError::NegativePriority { priority })?;
        Ok(Self::with_slot(priority, request_input, config_input))
    }

    /// Create a dimension whose weight is already known to be valid.
    pub(crate) fn with_slot<RI, CI>(priority: usize, request_input: RI, config_input: CI) -> Self
    where
        RI: KeyInput<Req, K> + 'static,
        CI: KeyInput<Cfg, K> + 'static,
    {
        Self {
            name: None,
            priority,
            request_input: Box::new(request_input),
            config_input: Box::new(config_input),
            matcher: None,
        }
    }

    /// Attach a human-readable name (builder pattern).
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Switch this dimension into fuzzy mode with the given matcher.
    #[must_use]
    pub fn fuzzy<M>(mut self, matcher: M) -> Self
    where
        M: KeyMatcher<K> + 'static,
    {
        self.matcher = Some(Box::new(matcher));
        self
    }

    /// Switch into fuzzy mode with an already boxed matcher.
    #[must_use]
    pub fn fuzzy_boxed(mut self, matcher: Box<dyn KeyMatcher<K>>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Returns the name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the priority weight (0 = most significant).
    #[must_use]
    pub fn priority(&self) -> usize {
        self.priority
    }

    /// Returns this dimension's identity.
    #[must_use]
    pub fn id(&self) -> DimensionId {
        DimensionId(self.priority)
    }

    /// Returns `true` if a fuzzy matcher is attached.
    #[must_use]
    pub fn is_fuzzy(&self) -> bool {
        self.matcher.is_some()
    }

    /// Extract this dimension's key from a request.
    pub fn extract_from_request(&self, request: &Req) -> Option<K> {
        self.request_input.get(request)
    }

    /// Extract this dimension's key from a configuration.
    pub fn extract_from_config(&self, config: &Cfg) -> Option<K> {
        self.config_input.get(config)
    }
}

impl<Req, Cfg, K: Hash + Eq> Dimension<Req, Cfg, K> {
    /// Resolve a request key against the keys of one index map.
    ///
    /// Exact mode yields at most the one entry stored under `request_key`.
    /// Fuzzy mode yields every entry whose key the matcher accepts, in the
    /// map's insertion order.
    pub(crate) fn resolve<'a, V>(
        &self,
        request_key: &K,
        entries: &'a IndexMap<K, V>,
    ) -> SmallVec<[&'a V; 1]> {
        match &self.matcher {
            None => entries.get(request_key).into_iter().collect(),
            Some(matcher) => entries
                .iter()
                .filter(|(key, _)| matcher.matches(request_key, key))
                .map(|(_, value)| value)
                .collect(),
        }
    }
}

impl<Req, Cfg, K> fmt::Debug for Dimension<Req, Cfg, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dimension")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("fuzzy", &self.matcher.is_some())
            .finish()
    }
}
