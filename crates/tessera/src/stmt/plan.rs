use tessera_core::{
    stmt::{OrderBy, Predicate},
    MappingDescriptor,
};

use std::sync::Arc;

/// A query with every attribute path resolved to a column of the target
/// table.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    /// Descriptor of the queried class, as snapshotted by the unit of work
    pub descriptor: Arc<MappingDescriptor>,

    pub filter: Vec<Predicate>,

    pub order_by: Vec<OrderBy>,

    /// Selected attributes. `None` selects whole objects.
    pub projection: Option<Vec<Selection>>,

    pub limit: Option<usize>,
}

/// One selected attribute path and the column holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: String,
    pub column: String,
}

impl QueryPlan {
    pub fn is_projected(&self) -> bool {
        self.projection.is_some()
    }
}
