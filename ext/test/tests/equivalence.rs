//! Property tests over random dimension sets, configurations and requests.
//!
//! Covers: level/trie equivalence, completeness of all-priority results,
//! priority order, pruning, and repeatability.

use prio_test::prelude::*;
use proptest::prelude::*;

const KEYS: [&str; 3] = ["a", "ab", "b"];

#[derive(Debug, Clone)]
struct Case {
    fuzzy: Vec<bool>,
    configs: Vec<Vec<Option<&'static str>>>,
    request: Vec<Option<&'static str>>,
    ranking: RankingStrategy,
}

fn arb_key() -> impl Strategy<Value = Option<&'static str>> {
    prop::option::of(prop::sample::select(KEYS.to_vec()))
}

fn arb_case() -> impl Strategy<Value = Case> {
    (1usize..=4).prop_flat_map(|n| {
        (
            prop::collection::vec(any::<bool>(), n),
            prop::collection::vec(prop::collection::vec(arb_key(), n), 0..16),
            prop::collection::vec(arb_key(), n),
            prop_oneof![
                Just(RankingStrategy::MatchCount),
                Just(RankingStrategy::AbsoluteValue)
            ],
        )
            .prop_map(|(fuzzy, configs, request, ranking)| Case {
                fuzzy,
                configs,
                request,
                ranking,
            })
    })
}

fn field(i: usize) -> String {
    format!("f{i}")
}

fn context(base: TestContext, keys: &[Option<&str>]) -> TestContext {
    keys.iter()
        .enumerate()
        .fold(base, |ctx, (i, key)| match key {
            Some(key) => ctx.with(field(i), *key),
            None => ctx,
        })
}

fn build(case: &Case, mode: MatchMode) -> TestEngine {
    let mut assembler = Assembler::new().ranking(case.ranking).mode(mode);
    for (i, fuzzy) in case.fuzzy.iter().enumerate() {
        let dim = field_dimension(i as i64, &field(i)).unwrap();
        assembler = assembler.add(if *fuzzy { dim.fuzzy(StartsWith) } else { dim });
    }
    let configs = case
        .configs
        .iter()
        .enumerate()
        .map(|(j, keys)| context(TestContext::labeled(format!("c{j}")), keys));
    assembler.configs(configs).build().unwrap()
}

/// Labels of every configuration an all-priority query must return.
fn expected_labels(case: &Case) -> Vec<String> {
    let accepts = |i: usize, stored: &str| match case.request[i] {
        None => false,
        Some(req) if case.fuzzy[i] => req.starts_with(stored),
        Some(req) => req == stored,
    };
    let mut labels: Vec<String> = case
        .configs
        .iter()
        .enumerate()
        .filter(|(_, keys)| keys.iter().any(Option::is_some))
        .filter(|(_, keys)| {
            keys.iter()
                .enumerate()
                .all(|(i, key)| key.map_or(true, |k| accepts(i, k)))
        })
        .map(|(j, _)| format!("c{j}"))
        .collect();
    labels.sort();
    labels
}

proptest! {
    /// Both matchers return the same sequence, for best match and all priorities.
    #[test]
    fn prop_level_equals_trie(case in arb_case()) {
        let level = build(&case, MatchMode::Level);
        let trie = build(&case, MatchMode::Trie);
        let request = context(TestContext::new(), &case.request);

        for all in [false, true] {
            prop_assert_eq!(
                MatchRecord::all(&level.evaluate_with(&request, all)),
                MatchRecord::all(&trie.evaluate_with(&request, all)),
                "all_priority = {}", all
            );
        }
    }

    /// All-priority results hold exactly the configurations the request satisfies.
    #[test]
    fn prop_all_priority_is_complete(case in arb_case()) {
        let engine = build(&case, MatchMode::Level);
        let request = context(TestContext::new(), &case.request);

        let results = engine.evaluate_with(&request, true);
        prop_assert!(results.iter().all(|r| !r.configs().is_empty()));

        let mut got: Vec<String> = results
            .iter()
            .flat_map(|r| r.configs().iter().map(|c| c.label().to_string()))
            .collect();
        got.sort();
        prop_assert_eq!(got, expected_labels(&case));
    }

    /// Results follow the ranked group order; best match is the head of the list.
    #[test]
    fn prop_results_in_priority_order(case in arb_case()) {
        let engine = build(&case, MatchMode::Trie);
        let request = context(TestContext::new(), &case.request);
        let all = engine.evaluate_with(&request, true);

        let ranks: Vec<usize> = all
            .iter()
            .map(|r| engine.rule_groups().iter().position(|g| g == r.group()).unwrap())
            .collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "{:?}", ranks);

        let best = engine.evaluate(&request);
        prop_assert_eq!(best.map(|r| MatchRecord::from(&r)), all.first().map(MatchRecord::from));
    }

    /// Under match-count ranking, levels never increase along the result list.
    #[test]
    fn prop_match_count_levels_non_increasing(mut case in arb_case()) {
        case.ranking = RankingStrategy::MatchCount;
        let engine = build(&case, MatchMode::Level);
        let request = context(TestContext::new(), &case.request);

        let levels: Vec<usize> = engine
            .evaluate_with(&request, true)
            .iter()
            .map(|r| r.level())
            .collect();
        prop_assert!(levels.windows(2).all(|w| w[0] >= w[1]), "{:?}", levels);
    }

    /// Pruning keeps exactly the groups some configuration populates.
    #[test]
    fn prop_pruning_keeps_used_groups(case in arb_case()) {
        let engine = build(&case, MatchMode::Level);
        let n = case.fuzzy.len();
        let report = engine.report();

        prop_assert_eq!(report.generated_groups, (1 << n) - 1);
        prop_assert!(report.retained_groups <= report.generated_groups);
        prop_assert_eq!(report.retained_groups, engine.rule_groups().len());
        prop_assert_eq!(report.indexed_configs + report.skipped_configs, case.configs.len());

        let mut used: Vec<String> = case
            .configs
            .iter()
            .filter(|keys| keys.iter().any(Option::is_some))
            .map(|keys| {
                keys.iter()
                    .enumerate()
                    .filter(|(_, k)| k.is_some())
                    .map(|(i, _)| field(i))
                    .collect::<Vec<_>>()
                    .join("_")
            })
            .collect();
        used.sort();
        used.dedup();

        let mut retained: Vec<String> =
            engine.rule_groups().iter().map(|g| g.name().to_string()).collect();
        retained.sort();
        prop_assert_eq!(retained, used);
    }

    /// Repeated queries against one engine return equal results.
    #[test]
    fn prop_repeatable(case in arb_case()) {
        let engine = build(&case, MatchMode::Trie);
        let request = context(TestContext::new(), &case.request);
        prop_assert_eq!(
            MatchRecord::all(&engine.evaluate_with(&request, true)),
            MatchRecord::all(&engine.evaluate_with(&request, true))
        );
    }

    /// The generator yields 2^n - 1 distinct, order-preserving subsets.
    #[test]
    fn prop_combinations(n in 0usize..=10) {
        let items: Vec<usize> = (0..n).collect();
        let groups = prio::combinations(&items);
        prop_assert_eq!(groups.len(), (1usize << n) - 1);
        prop_assert!(groups.iter().all(|g| !g.is_empty() && g.windows(2).all(|w| w[0] < w[1])));

        let mut unique = groups.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), groups.len());
    }
}
