use super::Operation;
use crate::driver::Key;

#[derive(Debug, Clone)]
pub struct Delete {
    pub table: String,

    /// Rows to delete
    pub key: Key,
}

impl From<Delete> for Operation {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
