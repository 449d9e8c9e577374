use crate::error::Result;
use crate::types::CatalogRow;

/// Read-only access to the situation catalog.
///
/// Implementations return only rows flagged active. A failed fetch must not
/// return a partial row set.
pub trait CatalogStore: Send + Sync {
    fn active_situations(&self) -> Result<Vec<CatalogRow>>;
}
