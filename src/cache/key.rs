//! Cache Key Module
//!
//! Deterministic key generation and the key prefixes used by the catalog read paths.

use std::collections::BTreeMap;
use std::fmt::Display;

/// Key prefixes shared by the data-access layer and the invalidation recipes.
pub mod prefixes {
    pub const MOVIES_LIST: &str = "movies:list";
    pub const MOVIES_READ: &str = "movies:read";
    pub const MOVIES_THEATERS: &str = "movies:theaters";
    pub const MOVIES_REVIEWS: &str = "movies:reviews";
    pub const THEATERS_LIST: &str = "theaters:list";
    pub const REVIEWS_READ: &str = "reviews:read";
    pub const REVIEWS_UPDATE: &str = "reviews:update";
    pub const TMDB_POPULAR: &str = "tmdb:popular";
    pub const TMDB_NOW_PLAYING: &str = "tmdb:now_playing";
    pub const TMDB_SEARCH: &str = "tmdb:search";
}

// == Generate Key ==
/// Builds a canonical cache key from a prefix and a parameter set.
///
/// Parameters are sorted by name, rendered as `name:value` and joined with `|`,
/// so the result does not depend on the order they were supplied in. With no
/// parameters the prefix is returned unchanged. If a name appears twice the
/// last value wins.
///
/// ```
/// use movie_cache::cache::generate_key;
///
/// let key = generate_key("movies:list", [("page", 2), ("limit", 10)]);
/// assert_eq!(key, "movies:list:limit:10|page:2");
/// ```
pub fn generate_key<I, K, V>(prefix: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Display,
{
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .map(|(name, value)| (name.into(), value.to_string()))
        .collect();

    if sorted.is_empty() {
        return prefix.to_string();
    }

    let joined = sorted
        .iter()
        .map(|(name, value)| format!("{}:{}", name, value))
        .collect::<Vec<_>>()
        .join("|");

    format!("{}:{}", prefix, joined)
}
