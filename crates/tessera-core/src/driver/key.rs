use crate::stmt::{Predicate, Value};

/// Identifies the rows targeted by an update or delete.
///
/// Usually a single primary key column; join-table rows are addressed by
/// the origin column, which selects every row of one owner.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub columns: Vec<(String, Value)>,
}

impl Key {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            columns: vec![(column.into(), value.into())],
        }
    }

    /// Equality predicates matching the key.
    pub fn to_filter(&self) -> Vec<Predicate> {
        self.columns
            .iter()
            .map(|(column, value)| Predicate::equals(column.clone(), value.clone()))
            .collect()
    }
}
