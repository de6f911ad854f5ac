//! Trie matcher: rule groups merged into one prefix tree.
//!
//! Groups sharing a leading run of dimensions share trie nodes, so a query
//! resolves each shared prefix once instead of once per group. A node where a
//! group ends carries that group's rank as a terminal marker and can still
//! have children for longer groups.
//!
//! Results are collected with their rank and stably sorted at the end, which
//! yields exactly the sequence the level matcher produces.

use crate::engine::{MatchResult, Query};
use crate::index::IndexNode;
use crate::{DimensionId, RuleGroup};
use indexmap::IndexMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub(crate) struct TrieNode {
    dimension: DimensionId,
    /// Rank of the group ending here.
    terminal: Option<usize>,
    /// Lowest rank ending at or below this node.
    min_rank: usize,
    children: IndexMap<DimensionId, TrieNode>,
}

impl TrieNode {
    fn new(dimension: DimensionId, rank: usize) -> Self {
        Self {
            dimension,
            terminal: None,
            min_rank: rank,
            children: IndexMap::new(),
        }
    }

    fn visit<'a, Req, Cfg, K: Hash + Eq>(
        &self,
        query: &Query<'a, Req, Cfg, K>,
        node: &'a IndexNode<K, Cfg>,
        walk: &mut Walk<'a, Cfg>,
    ) {
        if !walk.reaches(self.min_rank) {
            return;
        }
        let Some(key) = query.key(self.dimension) else {
            return;
        };
        let dimension = query.dimension(self.dimension);

        if let Some(rank) = self.terminal.filter(|&rank| walk.reaches(rank)) {
            let group = &query.groups()[rank];
            for configs in dimension.resolve(key, node.leaves()) {
                walk.push(rank, MatchResult::new(group, node.level(), configs));
                if !walk.all_priority {
                    break;
                }
            }
        }

        if self.children.is_empty() {
            return;
        }
        for children in dimension.resolve(key, node.branches()) {
            for (next, child) in &self.children {
                if let Some(next_node) = &children[next.index()] {
                    child.visit(query, next_node, walk);
                }
            }
        }
    }

    fn count(&self) -> usize {
        1 + self.children.values().map(TrieNode::count).sum::<usize>()
    }
}

/// Hits gathered during one traversal.
struct Walk<'a, Cfg> {
    all_priority: bool,
    best: Option<usize>,
    hits: Vec<(usize, MatchResult<'a, Cfg>)>,
}

impl<'a, Cfg> Walk<'a, Cfg> {
    /// Whether a group of this rank could still change the answer.
    fn reaches(&self, rank: usize) -> bool {
        self.all_priority || self.best.map_or(true, |best| rank < best)
    }

    fn push(&mut self, rank: usize, result: MatchResult<'a, Cfg>) {
        self.hits.push((rank, result));
        if !self.all_priority {
            self.best = Some(rank);
        }
    }

    fn finish(mut self) -> Vec<MatchResult<'a, Cfg>> {
        self.hits.sort_by_key(|&(rank, _)| rank);
        if !self.all_priority {
            self.hits.truncate(1);
        }
        self.hits.into_iter().map(|(_, result)| result).collect()
    }
}

/// Prefix-shared matcher over the ranked, pruned rule groups.
#[derive(Debug, Clone, Default)]
pub(crate) struct TrieMatcher {
    roots: IndexMap<DimensionId, TrieNode>,
}

impl TrieMatcher {
    /// Build the trie. `groups` must already be ranked; a group's position is
    /// its rank.
    pub(crate) fn build(groups: &[RuleGroup]) -> Self {
        let mut roots: IndexMap<DimensionId, TrieNode> = IndexMap::new();
        for (rank, group) in groups.iter().enumerate() {
            let mut members = group.dimensions().iter().copied();
            let Some(first) = members.next() else {
                continue;
            };
            let mut node = roots
                .entry(first)
                .or_insert_with(|| TrieNode::new(first, rank));
            node.min_rank = node.min_rank.min(rank);
            for id in members {
                node = node
                    .children
                    .entry(id)
                    .or_insert_with(|| TrieNode::new(id, rank));
                node.min_rank = node.min_rank.min(rank);
            }
            node.terminal = Some(rank);
        }
        Self { roots }
    }

    pub(crate) fn evaluate<'a, Req, Cfg, K: Hash + Eq>(
        &self,
        query: &Query<'a, Req, Cfg, K>,
        all_priority: bool,
    ) -> Vec<MatchResult<'a, Cfg>> {
        let mut walk = Walk {
            all_priority,
            best: None,
            hits: Vec::new(),
        };
        for (&dimension, root) in &self.roots {
            root.visit(query, query.index().root(dimension), &mut walk);
        }
        walk.finish()
    }

    /// Total number of trie nodes.
    pub(crate) fn node_count(&self) -> usize {
        self.roots.values().map(TrieNode::count).sum()
    }
}
