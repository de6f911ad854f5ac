//! `KeyMatcher`: Fuzzy comparison between a request key and index keys
//!
//! A dimension without a `KeyMatcher` is in exact mode: the request key is
//! looked up directly. With one, the engine enumerates every key present at
//! the index node and keeps each key the matcher accepts, so a single request
//! key may select zero, one or many branches.
//!
//! # Available Matchers
//!
//! - [`ExactKey`]: Equality, expressed as a predicate
//! - [`StartsWith`]: Request key starts with the index key
//! - [`EndsWith`]: Request key ends with the index key
//! - [`ContainsKey`]: Request key contains the index key
//! - [`AnyKey`]: Every index key matches (wildcard)
//!
//! The string matchers work for any key type implementing `AsRef<str>`.

use std::fmt;

/// Decides whether a request key selects an index key.
///
/// Any `Fn(&K, &K) -> bool + Send + Sync` closure is a `KeyMatcher`; the
/// first argument is the request key, the second the key stored in the index.
///
/// # Example
///
/// ```
/// use prio::{KeyMatcher, StartsWith};
///
/// let matcher = StartsWith;
/// assert!(matcher.matches(&"US-West", &"US"));
/// assert!(!matcher.matches(&"EU-North", &"US"));
///
/// let shorter = |request: &usize, stored: &usize| stored <= request;
/// assert!(shorter.matches(&5, &3));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `KeyMatcher<{K}>`",
    label = "this type cannot compare `{K}` keys",
    note = "KeyMatcher<K> is implemented for closures of the form `Fn(&K, &K) -> bool + Send + Sync`"
)]
pub trait KeyMatcher<K>: Send + Sync {
    /// Check whether `request_key` selects `index_key`.
    fn matches(&self, request_key: &K, index_key: &K) -> bool;
}

impl<K, F> KeyMatcher<K> for F
where
    F: Fn(&K, &K) -> bool + Send + Sync,
{
    fn matches(&self, request_key: &K, index_key: &K) -> bool {
        self(request_key, index_key)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// String Matchers
// ═══════════════════════════════════════════════════════════════════════════════

/// Equality as a predicate.
///
/// Selects the same keys as exact mode, but by scanning the node. Useful when
/// the key type's equality is not what the dimension should compare.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactKey;

impl<K: AsRef<str>> KeyMatcher<K> for ExactKey {
    fn matches(&self, request_key: &K, index_key: &K) -> bool {
        request_key.as_ref() == index_key.as_ref()
    }
}

/// Request key starts with the index key.
///
/// ```
/// use prio::{KeyMatcher, StartsWith};
///
/// assert!(StartsWith.matches(&"/api/v2/users", &"/api"));
/// assert!(StartsWith.matches(&"/api", &"/api"));
/// assert!(!StartsWith.matches(&"/ap", &"/api"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StartsWith;

impl<K: AsRef<str>> KeyMatcher<K> for StartsWith {
    fn matches(&self, request_key: &K, index_key: &K) -> bool {
        request_key.as_ref().starts_with(index_key.as_ref())
    }
}

/// Request key ends with the index key.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndsWith;

impl<K: AsRef<str>> KeyMatcher<K> for EndsWith {
    fn matches(&self, request_key: &K, index_key: &K) -> bool {
        request_key.as_ref().ends_with(index_key.as_ref())
    }
}

/// Request key contains the index key.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainsKey;

impl<K: AsRef<str>> KeyMatcher<K> for ContainsKey {
    fn matches(&self, request_key: &K, index_key: &K) -> bool {
        request_key.as_ref().contains(index_key.as_ref())
    }
}

/// Every index key matches, regardless of the request key.
///
/// The request still needs *a* key for the dimension to apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyKey;

impl<K> KeyMatcher<K> for AnyKey {
    fn matches(&self, _request_key: &K, _index_key: &K) -> bool {
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Config-level specification
// ═══════════════════════════════════════════════════════════════════════════════

/// How a string dimension compares keys, as written in configuration.
///
/// `None` in a config means exact mode; a `KeyMatchSpec` compiles to one of
/// the built-in matchers via [`to_key_matcher()`](Self::to_key_matcher).
///
/// ```
/// use prio::KeyMatchSpec;
///
/// let matcher = KeyMatchSpec::StartsWith.to_key_matcher::<String>();
/// assert!(matcher.matches(&"US-West".to_string(), &"US".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum KeyMatchSpec {
    /// String equality.
    Exact,
    /// Request key starts with the index key.
    StartsWith,
    /// Request key ends with the index key.
    EndsWith,
    /// Request key contains the index key.
    Contains,
    /// Every index key.
    Any,
}

impl KeyMatchSpec {
    /// Compile this spec into a boxed [`KeyMatcher`].
    #[must_use]
    pub fn to_key_matcher<K: AsRef<str>>(self) -> Box<dyn KeyMatcher<K>> {
        match self {
            Self::Exact => Box::new(ExactKey),
            Self::StartsWith => Box::new(StartsWith),
            Self::EndsWith => Box::new(EndsWith),
            Self::Contains => Box::new(ContainsKey),
            Self::Any => Box::new(AnyKey),
        }
    }
}

impl fmt::Display for KeyMatchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exact => "exact",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Contains => "contains",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}
