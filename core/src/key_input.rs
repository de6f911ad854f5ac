//! `KeyInput`: Key extraction from requests and configurations
//!
//! A [`Dimension`](crate::Dimension) carries two extractors: one reads the
//! comparison key out of an incoming request, the other out of a loaded
//! configuration. Both implement [`KeyInput`], generic over the value type
//! they read from and the key type they produce.

/// Extracts a comparison key from a value.
///
/// Returning `None` means "this dimension does not apply": a configuration
/// with no key is not indexed under the dimension, and a request with no key
/// skips every rule group that needs it. Neither case is an error.
///
/// Any `Fn(&T) -> Option<K> + Send + Sync` closure is a `KeyInput`, which is
/// how most dimensions are written.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a built engine can be shared
/// across threads.
///
/// # Example
///
/// ```
/// use prio::KeyInput;
///
/// struct Request { region: Option<String> }
///
/// let input = |r: &Request| r.region.clone();
/// let req = Request { region: Some("US".into()) };
/// assert_eq!(input.get(&req), Some("US".to_string()));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `KeyInput<{T}, {K}>`",
    label = "this type cannot extract a `{K}` key from `{T}`",
    note = "KeyInput<T, K> is implemented for closures of the form `Fn(&T) -> Option<K> + Send + Sync`"
)]
pub trait KeyInput<T, K>: Send + Sync {
    /// Extract the key, or `None` if the value has none.
    fn get(&self, value: &T) -> Option<K>;
}

impl<T, K, F> KeyInput<T, K> for F
where
    F: Fn(&T) -> Option<K> + Send + Sync,
{
    fn get(&self, value: &T) -> Option<K> {
        self(value)
    }
}
