//! Metadata predicates applied before ranking.

use crate::chunking::{Chunk, SOURCE_KEY};
use std::collections::HashSet;

/// Conjunction of `key ∈ allowed values` conditions over chunk metadata.
///
/// An empty filter accepts everything. A condition with an empty value set
/// accepts nothing.
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    conditions: Vec<(String, HashSet<String>)>,
}

impl MetadataFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict results to the given source identifiers.
    pub fn sources<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().field_in(SOURCE_KEY, allowed)
    }

    /// Add a condition requiring `key` to take one of `values`.
    pub fn field_in<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions
            .push((key.to_string(), values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn matches(&self, chunk: &Chunk) -> bool {
        self.conditions.iter().all(|(key, allowed)| {
            let value = if key == SOURCE_KEY {
                Some(chunk.source_id.as_str())
            } else {
                chunk.meta(key)
            };
            value.is_some_and(|v| allowed.contains(v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::entry;

    #[test]
    fn test_matches() {
        let chunk = entry("gdpr.txt", "text", vec![1.0]).chunk;

        assert!(MetadataFilter::new().matches(&chunk));
        assert!(MetadataFilter::sources(["gdpr.txt", "mifid.txt"]).matches(&chunk));
        assert!(!MetadataFilter::sources(["mifid.txt"]).matches(&chunk));

        let both = MetadataFilter::sources(["gdpr.txt"]).field_in("type", ["regulation"]);
        assert!(both.matches(&chunk));

        let wrong_type = MetadataFilter::sources(["gdpr.txt"]).field_in("type", ["guidance"]);
        assert!(!wrong_type.matches(&chunk));

        let missing_key = MetadataFilter::new().field_in("jurisdiction", ["eu"]);
        assert!(!missing_key.matches(&chunk));
    }
}
