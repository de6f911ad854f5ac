//! Ranking strategies for rule groups.
//!
//! Both strategies turn the generated rule groups into one sequence, most
//! significant first. Sorting is stable, so groups that score equally keep
//! the order the combination generator produced them in.

use crate::RuleGroup;

/// How rule groups are ordered against each other.
///
/// With dimensions `A B C D` (weights 0..3):
///
/// - [`MatchCount`](Self::MatchCount): `A B C` > `A B D` > `A C D` > `A B`.
///   More matched dimensions always wins.
/// - [`AbsoluteValue`](Self::AbsoluteValue): `A B` > `A C D` > `A` > `B C D`.
///   A more significant dimension outweighs every combination of less
///   significant ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RankingStrategy {
    /// Cardinality first, then lexicographic by most significant dimension.
    #[default]
    MatchCount,
    /// Sum of `2^(N - weight)` over the members.
    AbsoluteValue,
}

impl RankingStrategy {
    /// Score a group given its member weights (ascending) and the dimension
    /// count `n`. Higher scores rank first.
    ///
    /// `MatchCount` scores are positional: each member contributes the digit
    /// `n - weight`, most significant member in the highest position. The
    /// radix is 10, widened to `n + 1` when `n >= 10` so digits never carry.
    /// Scores only compare meaningfully between groups of equal size; the
    /// size itself is ordered first by [`rank`](Self::rank).
    ///
    /// ```
    /// use prio::RankingStrategy;
    ///
    /// assert_eq!(RankingStrategy::MatchCount.score(&[0, 2], 4), 42);
    /// assert_eq!(RankingStrategy::AbsoluteValue.score(&[0, 2], 4), 16 + 4);
    /// ```
    #[must_use]
    pub fn score(self, weights: &[usize], n: usize) -> u128 {
        match self {
            Self::MatchCount => {
                let radix = (n as u128 + 1).max(10);
                weights
                    .iter()
                    .fold(0, |acc, &w| acc * radix + (n - w) as u128)
            }
            Self::AbsoluteValue => weights.iter().map(|&w| 1u128 << (n - w)).sum(),
        }
    }

    /// Sort `groups` into priority order for `n` registered dimensions.
    pub fn rank(self, groups: &mut [RuleGroup], n: usize) {
        let weights = |g: &RuleGroup| -> Vec<usize> {
            g.dimensions().iter().map(|d| d.index()).collect()
        };
        match self {
            Self::MatchCount => groups.sort_by_cached_key(|g| {
                std::cmp::Reverse((g.len(), self.score(&weights(g), n)))
            }),
            Self::AbsoluteValue => {
                groups.sort_by_cached_key(|g| std::cmp::Reverse(self.score(&weights(g), n)));
            }
        }
    }
}
