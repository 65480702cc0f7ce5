mod delete;
pub use delete::Delete;

mod insert;
pub use insert::Insert;

mod query;
pub use query::Query;

mod transaction;
pub use transaction::Transaction;

mod update;
pub use update::Update;

use std::fmt;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Filtered, sorted and limited row retrieval
    Query(Query),

    /// Create a new row, returning its key
    Insert(Insert),

    /// Update the rows identified by a key
    Update(Update),

    /// Delete the rows identified by a key
    Delete(Delete),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    /// Table the operation targets, if any.
    pub fn table(&self) -> Option<&str> {
        match self {
            Operation::Query(op) => Some(&op.table),
            Operation::Insert(op) => Some(&op.table),
            Operation::Update(op) => Some(&op.table),
            Operation::Delete(op) => Some(&op.table),
            Operation::Transaction(_) => None,
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Operation::Query(_))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Query(op) => write!(f, "query {}", op.table),
            Operation::Insert(op) => write!(f, "insert {}", op.table),
            Operation::Update(op) => write!(f, "update {}", op.table),
            Operation::Delete(op) => write!(f, "delete {}", op.table),
            Operation::Transaction(op) => write!(f, "transaction {op:?}"),
        }
    }
}
