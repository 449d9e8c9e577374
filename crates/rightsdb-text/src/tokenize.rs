use std::collections::HashSet;

use crate::normalize::normalize;
use crate::stopwords::spanish_stopwords;

/// Unique tokens of the normalized text. Order is irrelevant.
pub fn tokenize(text: &str) -> HashSet<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// `tokenize` minus the built-in Spanish stopwords.
pub fn tokens_without_stopwords(text: &str) -> HashSet<String> {
    spanish_stopwords().filter(text)
}
