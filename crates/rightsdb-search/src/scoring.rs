//! The four partial relevance signals.
//!
//! Every scorer is total: it returns a value in [0, 1] and exactly 0 when
//! either side is empty. Callers pass the query in the form each scorer
//! expects; keyword and title take the stopword-filtered token set, partial
//! takes the unfiltered one.

use std::collections::HashSet;

use rightsdb_core::config::{PartialConfig, Weights};
use rightsdb_text::{normalize, tokenize, Stopwords};

const CONTAINMENT_BASE: f64 = 0.7;
const CONTAINMENT_SPAN: f64 = 0.3;
const TOKEN_F1_SCALE: f64 = 0.8;
const TITLE_SCALE: f64 = 0.5;

/// Fraction of the situation's keyword tokens covered by the query.
pub fn keyword_match(query_tokens: &HashSet<String>, keywords: &str) -> f64 {
    let kw_tokens = tokenize(keywords);
    if query_tokens.is_empty() || kw_tokens.is_empty() { return 0.0; }
    let shared = query_tokens.intersection(&kw_tokens).count();
    shared as f64 / kw_tokens.len() as f64
}

/// Best match of the normalized query against the `|`-separated phrasings.
///
/// An exact phrase wins outright with 1.0. Containment either way scores
/// `0.7 + 0.3 * shorter/longer`; otherwise token F1 over stopword-filtered
/// sets, scaled by 0.8.
pub fn natural_query_match(query_norm: &str, natural_queries: &str, stopwords: &Stopwords) -> f64 {
    if query_norm.is_empty() { return 0.0; }
    let q_tokens = stopwords.filter(query_norm);
    let q_len = query_norm.chars().count();
    let mut best = 0.0_f64;

    for phrase in natural_queries.split('|') {
        let phrase_norm = normalize(phrase);
        if phrase_norm.is_empty() { continue; }
        if phrase_norm == query_norm { return 1.0; }

        if query_norm.contains(phrase_norm.as_str()) || phrase_norm.contains(query_norm) {
            let p_len = phrase_norm.chars().count();
            let ratio = q_len.min(p_len) as f64 / q_len.max(p_len) as f64;
            best = best.max(CONTAINMENT_BASE + CONTAINMENT_SPAN * ratio);
            continue;
        }

        let p_tokens = stopwords.filter(&phrase_norm);
        if q_tokens.is_empty() || p_tokens.is_empty() { continue; }
        let shared = q_tokens.intersection(&p_tokens).count();
        if shared == 0 { continue; }
        let precision = shared as f64 / q_tokens.len() as f64;
        let recall = shared as f64 / p_tokens.len() as f64;
        if precision + recall > 0.0 {
            let f1 = 2.0 * precision * recall / (precision + recall);
            best = best.max(f1 * TOKEN_F1_SCALE);
        }
    }
    best
}

/// Token overlap with the title, normalized by the larger set, scaled by 0.5.
pub fn title_match(query_tokens: &HashSet<String>, title: &str, stopwords: &Stopwords) -> f64 {
    let t_tokens = stopwords.filter(title);
    if query_tokens.is_empty() || t_tokens.is_empty() { return 0.0; }
    let shared = query_tokens.intersection(&t_tokens).count();
    shared as f64 / query_tokens.len().max(t_tokens.len()) as f64 * TITLE_SCALE
}

/// Prefix similarity between query tokens and target tokens.
///
/// Only tokens of at least `prefix_len` chars take part, and a pair is
/// considered only when the target starts with the query token's first
/// `prefix_len` chars. The pair score is the longest common prefix (stopping
/// at the first mismatch) over the longer token's length, times `scale`.
pub fn partial_match(query_tokens: &HashSet<String>, target: &str, cfg: &PartialConfig) -> f64 {
    let target_tokens = tokenize(target);
    let mut score = 0.0_f64;

    for qt in query_tokens {
        let q_len = qt.chars().count();
        if q_len < cfg.prefix_len { continue; }
        let prefix: String = qt.chars().take(cfg.prefix_len).collect();
        for tt in &target_tokens {
            let t_len = tt.chars().count();
            if t_len < cfg.prefix_len || !tt.starts_with(prefix.as_str()) { continue; }
            let common = common_prefix_len(qt, tt);
            let ratio = common as f64 / q_len.max(t_len) as f64;
            score = score.max(ratio * cfg.scale);
        }
    }
    score
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

/// Unrounded component scores for one catalog row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub natural_query: f64,
    pub keywords: f64,
    pub title: f64,
    pub partial: f64,
}

impl ScoreBreakdown {
    pub fn total(&self, weights: &Weights) -> f64 {
        let total = self.natural_query * weights.natural_query
            + self.keywords * weights.keywords
            + self.title * weights.title
            + self.partial * weights.partial;
        total.clamp(0.0, 1.0)
    }
}
