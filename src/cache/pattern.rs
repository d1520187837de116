//! Key Pattern Module
//!
//! Compiles the `*` wildcard syntax used for bulk invalidation.

use regex::Regex;
use tracing::warn;

// == Key Pattern ==
/// A compiled invalidation pattern.
///
/// `*` matches any substring (including the empty one and line breaks); every
/// other character is matched literally. The pattern must cover the whole key.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    raw: String,
    regex: Option<Regex>,
}

impl KeyPattern {
    /// Compiles `pattern`. A pattern that fails to compile matches nothing.
    pub fn new(pattern: &str) -> Self {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = match Regex::new(&format!("(?s)^{}$", body)) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("Invalid cache key pattern '{}': {}", pattern, e);
                None
            }
        };

        Self {
            raw: pattern.to_string(),
            regex,
        }
    }

    /// Returns true if `key` matches the pattern in full.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(key))
    }

    /// The pattern as supplied by the caller.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}
