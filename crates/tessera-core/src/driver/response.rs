use crate::{stmt::Row, stmt::Value, Error, Result};

#[derive(Debug, Clone)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Rows returned by a query
    Values(Vec<Row>),

    /// Key of an inserted row; null when the table has no key column
    Key(Value),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn values(rows: Vec<Row>) -> Self {
        Self {
            rows: Rows::Values(rows),
        }
    }

    pub fn key(key: impl Into<Value>) -> Self {
        Self {
            rows: Rows::Key(key.into()),
        }
    }

    pub fn empty() -> Self {
        Self::count(0)
    }
}

impl Rows {
    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            other => Err(unexpected("Count", &other)),
        }
    }

    pub fn into_values(self) -> Result<Vec<Row>> {
        match self {
            Rows::Values(rows) => Ok(rows),
            other => Err(unexpected("Values", &other)),
        }
    }

    pub fn into_key(self) -> Result<Value> {
        match self {
            Rows::Key(key) => Ok(key),
            other => Err(unexpected("Key", &other)),
        }
    }
}

fn unexpected(expected: &str, actual: &Rows) -> Error {
    let actual = match actual {
        Rows::Count(_) => "Count",
        Rows::Values(_) => "Values",
        Rows::Key(_) => "Key",
    };
    crate::err!("driver returned {actual}, expected {expected}")
}
