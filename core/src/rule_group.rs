//! `RuleGroup`: One composite matching path
//!
//! A rule group is an ordered subset of the registered dimensions. Members are
//! always kept in ascending weight order, so a group's identity (the ordered
//! list of member identities) is deterministic and doubles as the key the
//! index uses to record which groups received configurations.

use crate::{Dimension, DimensionId};
use std::fmt;

/// Identity of a rule group: its member dimension identities, in order.
///
/// Displays as the member identities joined with `_`, e.g. `0_1_3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleGroupId(Box<[DimensionId]>);

impl RuleGroupId {
    pub(crate) fn new(dimensions: impl IntoIterator<Item = DimensionId>) -> Self {
        Self(dimensions.into_iter().collect())
    }

    /// Member dimension identities, most significant first.
    #[must_use]
    pub fn dimensions(&self) -> &[DimensionId] {
        &self.0
    }

    /// Number of member dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: the combination generator never yields empty groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RuleGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("_")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

/// An ordered list of dimensions matched together.
///
/// The display name joins the member dimension names with `_`, skipping
/// unnamed members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroup {
    id: RuleGroupId,
    name: String,
}

impl RuleGroup {
    pub(crate) fn from_dimensions<Req, Cfg, K>(members: &[&Dimension<Req, Cfg, K>]) -> Self {
        let id = RuleGroupId::new(members.iter().map(|d| d.id()));
        let name = members
            .iter()
            .filter_map(|d| d.name())
            .collect::<Vec<_>>()
            .join("_");
        Self { id, name }
    }

    /// This group's identity.
    #[must_use]
    pub fn id(&self) -> &RuleGroupId {
        &self.id
    }

    /// Display name built from member names.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member dimension identities, most significant first.
    #[must_use]
    pub fn dimensions(&self) -> &[DimensionId] {
        self.id.dimensions()
    }

    /// Number of member dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.id.len()
    }

    /// Always `false` for groups built by the engine.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "[{}]", self.id)
        } else {
            write!(f, "{} [{}]", self.name, self.id)
        }
    }
}
