//! Deterministic cache key construction.
//!
//! A [`CacheKey`] identifies one logical query (provider namespace, entity,
//! date range, operation, extra discriminators). Two logically identical
//! queries always produce the same key; distinct queries should produce
//! distinct keys.

use std::fmt;

/// Delimiter between the namespace and each key part.
const DELIMITER: char = '-';

/// An opaque, deterministic cache key.
///
/// Keys are built by joining a namespace and an ordered sequence of parts
/// with `-`. No normalization or escaping is performed: callers are
/// responsible for rendering each part in a stable textual form (dates as
/// `YYYYMMDD`, numbers with fixed separators) and for keeping the delimiter
/// out of part values. A part containing `-` can collide with a neighboring
/// split; this is a known limitation of the key scheme, not something the
/// builder defends against.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key from a namespace and an ordered sequence of parts.
    #[must_use]
    pub fn build<I, S>(namespace: &str, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = String::from(namespace);
        for part in parts {
            key.push(DELIMITER);
            key.push_str(part.as_ref());
        }
        Self(key)
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_joins_namespace_and_parts_in_order() {
        let key = CacheKey::build("intrinio", ["AAPL", "20190101", "20191231", "closing-prices"]);
        assert_eq!(key.as_str(), "intrinio-AAPL-20190101-20191231-closing-prices");
    }

    #[test]
    fn test_identical_queries_produce_identical_keys() {
        let a = CacheKey::build("ns", ["AAPL", "totalrevenue"]);
        let b = CacheKey::build("ns", ["AAPL", "totalrevenue"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_part_order_is_significant() {
        let a = CacheKey::build("ns", ["AAPL", "totalrevenue"]);
        let b = CacheKey::build("ns", ["totalrevenue", "AAPL"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_no_parts_yields_bare_namespace() {
        let key = CacheKey::build("ns", std::iter::empty::<&str>());
        assert_eq!(key.as_str(), "ns");
    }
}
