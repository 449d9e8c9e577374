use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use rightsdb_core::config::SearchConfig;
use rightsdb_core::error::Result;
use rightsdb_core::traits::CatalogStore;
use rightsdb_core::types::{CatalogRow, MatchDetails, SearchResult};
use rightsdb_text::{normalize, tokenize, Stopwords};

use crate::scoring::{keyword_match, natural_query_match, partial_match, title_match, ScoreBreakdown};

/// Lazily populated copy of the active catalog rows.
///
/// Population and invalidation hold the write lock, so a reader sees either
/// the full row set or nothing. A failed fetch leaves the cache unset.
#[derive(Debug, Default)]
pub struct CatalogCache {
    rows: RwLock<Option<Arc<[CatalogRow]>>>,
}

impl CatalogCache {
    pub fn new() -> Self { Self::default() }

    pub fn get_or_load(&self, store: &dyn CatalogStore) -> Result<Arc<[CatalogRow]>> {
        if let Some(rows) = self.cached() { return Ok(rows); }

        let mut slot = self.rows.write();
        // another search may have filled it while we waited
        if let Some(rows) = slot.as_ref() { return Ok(Arc::clone(rows)); }
        let rows: Arc<[CatalogRow]> = store.active_situations()?.into();
        info!(rows = rows.len(), "situation catalog loaded");
        *slot = Some(Arc::clone(&rows));
        Ok(rows)
    }

    pub fn cached(&self) -> Option<Arc<[CatalogRow]>> { self.rows.read().as_ref().map(Arc::clone) }

    pub fn is_loaded(&self) -> bool { self.rows.read().is_some() }

    pub fn invalidate(&self) {
        if self.rows.write().take().is_some() { info!("situation catalog cache invalidated"); }
    }
}

/// The query in the three shapes the scorers consume.
struct QueryTerms {
    normalized: String,
    filtered: HashSet<String>,
    raw: HashSet<String>,
}

/// Ranks catalog situations against free-text queries.
pub struct SituationSearch<S> {
    store: S,
    cache: CatalogCache,
    config: SearchConfig,
    stopwords: Stopwords,
}

impl<S: CatalogStore> SituationSearch<S> {
    pub fn new(store: S) -> Self {
        Self { store, cache: CatalogCache::new(), config: SearchConfig::default(), stopwords: Stopwords::spanish() }
    }

    pub fn with_config(store: S, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let stopwords = match &config.stopwords {
            Some(words) => Stopwords::new(words),
            None => Stopwords::spanish(),
        };
        Ok(Self { store, cache: CatalogCache::new(), config, stopwords })
    }

    pub fn store(&self) -> &S { &self.store }

    pub fn config(&self) -> &SearchConfig { &self.config }

    /// Search with the configured default limit.
    pub fn search_default(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.search(query, self.config.default_limit)
    }

    /// Rank active situations for `query`, best first, at most `limit` hits.
    ///
    /// A query that normalizes to nothing returns no hits without touching
    /// the store. Store failures propagate and leave the cache unset.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let normalized = normalize(query);
        if normalized.is_empty() { return Ok(Vec::new()); }

        let terms = QueryTerms { filtered: self.stopwords.filter(query), raw: tokenize(query), normalized };
        let rows = self.cache.get_or_load(&self.store)?;

        let mut scored: Vec<(&CatalogRow, ScoreBreakdown, f64)> = rows
            .iter()
            .map(|row| {
                let breakdown = self.score_row(&terms, row);
                (row, breakdown, breakdown.total(&self.config.weights))
            })
            .filter(|(_, _, total)| *total > self.config.min_score)
            .collect();

        // stable: equal totals keep catalog order
        scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
        let candidates = scored.len();
        scored.truncate(limit);

        let results: Vec<SearchResult> = scored.into_iter().map(|(row, b, total)| to_result(row, &b, total)).collect();
        debug!(query = %terms.normalized, catalog = rows.len(), candidates, hits = results.len(), "situation search");
        Ok(results)
    }

    /// Drop the cached catalog; the next search refetches from the store.
    pub fn invalidate(&self) { self.cache.invalidate(); }

    pub fn is_cached(&self) -> bool { self.cache.is_loaded() }

    fn score_row(&self, terms: &QueryTerms, row: &CatalogRow) -> ScoreBreakdown {
        // '|' is stripped by normalization, so phrase edge words fuse into one token
        let target = format!("{} {}", row.keywords, row.natural_queries);
        ScoreBreakdown {
            natural_query: natural_query_match(&terms.normalized, &row.natural_queries, &self.stopwords),
            keywords: keyword_match(&terms.filtered, &row.keywords),
            title: title_match(&terms.filtered, &row.title, &self.stopwords),
            partial: partial_match(&terms.raw, &target, &self.config.partial),
        }
    }
}

fn to_result(row: &CatalogRow, b: &ScoreBreakdown, total: f64) -> SearchResult {
    SearchResult {
        situation_id: row.id.clone(),
        title: row.title.clone(),
        description: row.description.clone(),
        severity: row.severity.clone(),
        category: row.category.clone(),
        score: round_to(total, 4),
        match_details: MatchDetails {
            natural_query: round_to(b.natural_query, 3),
            keywords: round_to(b.keywords, 3),
            title: round_to(b.title, 3),
            partial: round_to(b.partial, 3),
        },
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
