//! Domain types shared by the text, search and store layers.

use serde::{Deserialize, Serialize};

pub type SituationId = String;

/// One active situation as handed over by the external catalog store.
///
/// - `id`: stable identifier, unique across the catalog
/// - `keywords`: raw whitespace/comma separated terms, tokenized at scoring time
/// - `natural_queries`: example phrasings joined with `|`
/// - `severity`/`category`: classification strings, passed through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub id: SituationId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub natural_queries: String,
    pub severity: String,
    pub category: String,
}

/// Component scores behind a [`SearchResult`], rounded to 3 decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub natural_query: f64,
    pub keywords: f64,
    pub title: f64,
    pub partial: f64,
}

/// A ranked hit. `score` is the weighted total in [0, 1], rounded to 4 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub situation_id: SituationId,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub category: String,
    pub score: f64,
    pub match_details: MatchDetails,
}
