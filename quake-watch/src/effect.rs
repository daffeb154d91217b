//! Effects - side effects declared by the reducer

use crate::catalog::CatalogQuery;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone)]
pub enum Effect {
    /// Ask the catalog for events. `seq` identifies the request so late
    /// responses can be told apart from the current one.
    FetchMarkers { seq: u64, query: CatalogQuery },
}
