use super::Operation;
use crate::stmt::{OrderBy, Predicate};

#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Table (or collection) to read from
    pub table: String,

    /// Conjunctive filter; empty matches every row
    pub filter: Vec<Predicate>,

    /// Sort keys, most significant first
    pub order_by: Vec<OrderBy>,

    /// Columns to return. `None` returns every column.
    pub projection: Option<Vec<String>>,

    /// Maximum number of rows to return
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter.push(predicate);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl From<Query> for Operation {
    fn from(value: Query) -> Self {
        Self::Query(value)
    }
}
