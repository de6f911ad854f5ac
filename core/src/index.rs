//! Configuration index.
//!
//! One tree per dimension slot. Each node maps a dimension value to either a
//! child array (indexed by the weight of the next dimension on the path) or a
//! list of configurations, or both. A configuration is stored exactly once,
//! along the path made of its present keys.

use crate::DimensionId;
use indexmap::IndexMap;
use std::hash::Hash;

/// Child array of one branch, one slot per dimension weight.
pub(crate) type Children<K, Cfg> = Box<[Option<IndexNode<K, Cfg>>]>;

/// A node in the configuration index.
///
/// `branches` and `leaves` are insertion-ordered so fuzzy dimensions visit
/// candidate keys in the order configurations introduced them.
#[derive(Debug)]
pub(crate) struct IndexNode<K, Cfg> {
    level: usize,
    branches: IndexMap<K, Children<K, Cfg>>,
    leaves: IndexMap<K, Vec<Cfg>>,
}

impl<K, Cfg> IndexNode<K, Cfg> {
    fn new(level: usize) -> Self {
        Self {
            level,
            branches: IndexMap::new(),
            leaves: IndexMap::new(),
        }
    }

    /// Number of dimensions traversed to reach this node (roots are 1).
    pub(crate) fn level(&self) -> usize {
        self.level
    }

    pub(crate) fn branches(&self) -> &IndexMap<K, Children<K, Cfg>> {
        &self.branches
    }

    pub(crate) fn leaves(&self) -> &IndexMap<K, Vec<Cfg>> {
        &self.leaves
    }
}

impl<K: Hash + Eq, Cfg> IndexNode<K, Cfg> {
    fn child_or_insert(&mut self, key: K, next: DimensionId, width: usize) -> &mut Self {
        let level = self.level + 1;
        let children = self
            .branches
            .entry(key)
            .or_insert_with(|| (0..width).map(|_| None).collect());
        children[next.index()].get_or_insert_with(|| Self::new(level))
    }
}

/// Owned configuration index, frozen after assembly.
#[derive(Debug)]
pub(crate) struct Index<K, Cfg> {
    roots: Box<[IndexNode<K, Cfg>]>,
}

impl<K, Cfg> Index<K, Cfg> {
    /// Create an empty index for `width` dimensions.
    pub(crate) fn new(width: usize) -> Self {
        Self {
            roots: (0..width).map(|_| IndexNode::new(1)).collect(),
        }
    }

    /// Root node for paths starting at `dimension`.
    pub(crate) fn root(&self, dimension: DimensionId) -> &IndexNode<K, Cfg> {
        &self.roots[dimension.index()]
    }

    fn width(&self) -> usize {
        self.roots.len()
    }
}

impl<K: Hash + Eq, Cfg> Index<K, Cfg> {
    /// Store `config` under `path`, creating nodes as needed.
    ///
    /// `path` lists the present keys in ascending dimension order. An empty
    /// path stores nothing and returns `false`.
    pub(crate) fn insert(&mut self, path: Vec<(DimensionId, K)>, config: Cfg) -> bool {
        let width = self.width();
        let mut steps = path.into_iter().peekable();
        let Some((first, _)) = steps.peek() else {
            return false;
        };
        let mut node = &mut self.roots[first.index()];

        while let Some((_, key)) = steps.next() {
            match steps.peek() {
                Some((next, _)) => {
                    let next = *next;
                    node = node.child_or_insert(key, next, width);
                }
                None => {
                    node.leaves.entry(key).or_default().push(config);
                    return true;
                }
            }
        }
        false
    }
}
