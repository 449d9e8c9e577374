//! rightsdb-search
//!
//! Natural-language situation search. `SituationSearch` ranks the active
//! catalog against a free-text query with four weighted signals (see
//! `scoring`) and keeps the catalog in a lazily loaded, invalidatable cache.
//! `store` provides the in-memory and JSON-directory catalog sources.

pub mod engine;
pub mod scoring;
pub mod store;

pub use engine::{CatalogCache, SituationSearch};
pub use scoring::ScoreBreakdown;
pub use store::{JsonDirStore, MemoryStore};
