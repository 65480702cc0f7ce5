use super::Operation;
use crate::{driver::Key, stmt::Row};

#[derive(Debug, Clone)]
pub struct Update {
    pub table: String,

    /// Rows to update
    pub key: Key,

    /// Columns to overwrite; other columns keep their value
    pub values: Row,
}

impl From<Update> for Operation {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
