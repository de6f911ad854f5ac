//! Level matcher: scan ranked rule groups one by one.

use crate::engine::{MatchResult, Query};
use crate::index::IndexNode;
use crate::RuleGroup;
use std::hash::Hash;
use std::ops::ControlFlow;

/// Walks the ranked, pruned rule groups in order and descends the index once
/// per group. First match wins unless every priority is requested.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LevelMatcher;

impl LevelMatcher {
    pub(crate) fn evaluate<'a, Req, Cfg, K: Hash + Eq>(
        self,
        query: &Query<'a, Req, Cfg, K>,
        all_priority: bool,
    ) -> Vec<MatchResult<'a, Cfg>> {
        let mut out = Vec::new();
        for group in query.groups() {
            let Some(&first) = group.dimensions().first() else {
                continue;
            };
            let root = query.index().root(first);
            if scan(query, group, root, 0, all_priority, &mut out).is_break() {
                break;
            }
        }
        out
    }
}

fn scan<'a, Req, Cfg, K: Hash + Eq>(
    query: &Query<'a, Req, Cfg, K>,
    group: &'a RuleGroup,
    node: &'a IndexNode<K, Cfg>,
    pos: usize,
    all_priority: bool,
    out: &mut Vec<MatchResult<'a, Cfg>>,
) -> ControlFlow<()> {
    let members = group.dimensions();
    let id = members[pos];
    let Some(key) = query.key(id) else {
        return ControlFlow::Continue(());
    };
    let dimension = query.dimension(id);

    match members.get(pos + 1) {
        None => {
            for configs in dimension.resolve(key, node.leaves()) {
                out.push(MatchResult::new(group, node.level(), configs));
                if !all_priority {
                    return ControlFlow::Break(());
                }
            }
        }
        Some(next) => {
            for children in dimension.resolve(key, node.branches()) {
                if let Some(child) = &children[next.index()] {
                    scan(query, group, child, pos + 1, all_priority, out)?;
                }
            }
        }
    }
    ControlFlow::Continue(())
}
