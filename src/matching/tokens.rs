//! Naming-key tokenization

use std::collections::BTreeSet;

/// Default minimum token length for token-intersection matching
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Split on non-alphanumeric boundaries, lowercase, and drop short tokens
///
/// Length is counted in characters, so `"été"` is a 3-character token.
pub fn significant_tokens(text: &str, min_len: usize) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && token.chars().count() >= min_len)
        .map(str::to_lowercase)
        .collect()
}
