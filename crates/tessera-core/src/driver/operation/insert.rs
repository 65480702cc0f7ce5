use super::Operation;
use crate::stmt::Row;

#[derive(Debug, Clone)]
pub struct Insert {
    pub table: String,

    /// Key column. When set and the row carries no value for it, the driver
    /// generates the key. Join tables have no key column.
    pub key_column: Option<String>,

    pub values: Row,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
