//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs every case against both the level and the trie
//! matcher. A fixture describes the dimensions, the configurations and the
//! expected results:
//!
//! ```yaml
//! name: product_catalog
//! description: most specific rule group wins
//! ranking: match_count        # optional, default match_count
//! dimensions:
//!   - name: region            # field read on both sides
//!   - name: path
//!     match: starts_with      # optional, exact when absent
//! configs:
//!   - name: A
//!     fields: { region: US, path: /api }
//! cases:
//!   - name: prefix hit
//!     request: { region: US, path: /api/users }
//!     all: false              # optional, default false
//!     expect:
//!       - { group: region_path, level: 2, configs: [A] }
//! ```

use crate::{FieldDimension, FieldInput, MatchRecord, TestContext, TestEngine};
use prio::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ranking: RankingStrategy,
    pub dimensions: Vec<DimensionConfig>,
    #[serde(default)]
    pub configs: Vec<ConfigEntry>,
    /// Expected assembly error, matched as a substring of its message.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

/// One dimension: a field name, with optional weight and fuzzy matcher.
#[derive(Debug, Deserialize)]
pub struct DimensionConfig {
    pub name: String,
    /// Explicit weight; registration order when absent.
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default, rename = "match")]
    pub key_match: Option<KeyMatchSpec>,
}

/// A labeled configuration.
#[derive(Debug, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub request: HashMap<String, String>,
    #[serde(default)]
    pub all: bool,
    pub expect: Vec<MatchRecord>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder: Convert config to prio types
// ═══════════════════════════════════════════════════════════════════════════════

impl DimensionConfig {
    fn build(&self, position: usize) -> Result<FieldDimension, EngineError> {
        let priority = self.priority.unwrap_or(position as i64);
        let dim = Dimension::new(
            priority,
            FieldInput::new(&self.name),
            FieldInput::new(&self.name),
        )?
        .named(&self.name);
        Ok(match self.key_match {
            Some(spec) => dim.fuzzy_boxed(spec.to_key_matcher()),
            None => dim,
        })
    }
}

impl ConfigEntry {
    fn build(&self) -> TestContext {
        self.fields
            .iter()
            .fold(TestContext::labeled(&self.name), |ctx, (k, v)| {
                ctx.with(k.clone(), v.clone())
            })
    }
}

impl TestCase {
    /// Build a request context from this case's field map
    pub fn build_request(&self) -> TestContext {
        self.request
            .iter()
            .fold(TestContext::new(), |ctx, (k, v)| ctx.with(k.clone(), v.clone()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case in one mode
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub mode: MatchMode,
    pub passed: bool,
    pub expected: Vec<MatchRecord>,
    pub actual: Vec<MatchRecord>,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Assemble the fixture's engine in `mode`.
    pub fn build(&self, mode: MatchMode) -> Result<TestEngine, EngineError> {
        let mut assembler = Assembler::new().ranking(self.ranking).mode(mode);
        for (position, dim) in self.dimensions.iter().enumerate() {
            assembler = assembler.add(dim.build(position)?);
        }
        assembler
            .configs(self.configs.iter().map(ConfigEntry::build))
            .build()
    }

    /// Run all test cases in both modes and return results
    ///
    /// # Errors
    ///
    /// Returns the assembly error if the engine fails to build.
    pub fn run(&self) -> Result<Vec<CaseResult>, EngineError> {
        let mut results = Vec::new();
        for mode in [MatchMode::Level, MatchMode::Trie] {
            let engine = self.build(mode)?;
            for case in &self.cases {
                let request = case.build_request();
                let actual = MatchRecord::all(&engine.evaluate_with(&request, case.all));
                results.push(CaseResult {
                    case_name: case.name.clone(),
                    mode,
                    passed: actual == case.expect,
                    expected: case.expect.clone(),
                    actual,
                });
            }
        }
        Ok(results)
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        if let Some(expected) = &self.error {
            for mode in [MatchMode::Level, MatchMode::Trie] {
                match self.build(mode) {
                    Ok(_) => panic!(
                        "Fixture '{}' expected error containing {:?}, but assembly succeeded",
                        self.name, expected
                    ),
                    Err(e) => assert!(
                        e.to_string().contains(expected.as_str()),
                        "Fixture '{}' expected error containing {:?}, got {:?}",
                        self.name,
                        expected,
                        e.to_string()
                    ),
                }
            }
            return;
        }

        let results = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to assemble: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' ({:?}) failed:\n  expected {:#?}\n  got {:#?}",
                self.name, result.case_name, result.mode, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
name: inline
dimensions:
  - name: region
  - name: path
    match: starts_with
configs:
  - name: A
    fields: { region: US, path: /api }
  - name: B
    fields: { path: /api }
cases:
  - name: both
    request: { region: US, path: /api/users }
    all: true
    expect:
      - { group: region_path, level: 2, configs: [A] }
      - { group: path, level: 1, configs: [B] }
  - name: region miss
    request: { region: EU, path: /api/users }
    expect:
      - { group: path, level: 1, configs: [B] }
"#;

    #[test]
    fn test_parse_and_run() {
        let fixture = Fixture::from_yaml(CATALOG).unwrap();
        assert_eq!(fixture.dimensions.len(), 2);
        assert_eq!(fixture.dimensions[1].key_match, Some(KeyMatchSpec::StartsWith));
        assert_eq!(fixture.ranking, RankingStrategy::MatchCount);

        let results = fixture.run().unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.passed), "{results:#?}");
    }

    #[test]
    fn test_failure_detected() {
        let yaml = CATALOG.replace(
            "configs: [B] }\n  - name: region miss",
            "configs: [A] }\n  - name: region miss",
        );
        let fixture = Fixture::from_yaml(&yaml).unwrap();
        let results = fixture.run().unwrap();
        assert!(results.iter().any(|r| !r.passed));
    }

    #[test]
    fn test_multi_document() {
        let yaml = format!("{CATALOG}\n---\n{}", CATALOG.replace("inline", "second"));
        let fixtures = Fixture::from_yaml_multi(&yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].name, "second");
    }

    #[test]
    fn test_expected_error() {
        let fixture = Fixture::from_yaml(
            r#"
name: dup
dimensions:
  - { name: a, priority: 0 }
  - { name: b, priority: 0 }
error: "used by more than one dimension"
"#,
        )
        .unwrap();
        assert!(fixture.run().is_err());
        fixture.run_and_assert();
    }
}
