use super::{Op, Row, Value};
use std::cmp::Ordering;
use std::fmt;

/// A `column <op> value` clause. Clauses of one query are conjunctive.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: Op,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Op::Eq, value)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::new(column, Op::IsNull, Value::Null)
    }

    /// Evaluates the clause against a row. A missing column reads as null.
    pub fn matches(&self, row: &Row) -> bool {
        let actual = row.get_or_null(&self.column);

        match self.op {
            Op::IsNull => actual.is_null(),
            Op::Eq => actual.sql_eq(&self.value),
            Op::Ne => !actual.is_null() && !self.value.is_null() && !actual.sql_eq(&self.value),
            Op::In => match &self.value {
                Value::List(items) => items.iter().any(|item| actual.sql_eq(item)),
                other => actual.sql_eq(other),
            },
            Op::Gt | Op::Ge | Op::Lt | Op::Le => {
                let Some(ordering) = actual.compare(&self.value) else {
                    return false;
                };

                match self.op {
                    Op::Gt => ordering == Ordering::Greater,
                    Op::Ge => ordering != Ordering::Less,
                    Op::Lt => ordering == Ordering::Less,
                    _ => ordering != Ordering::Greater,
                }
            }
        }
    }

    /// Evaluates every clause; an empty filter matches all rows.
    pub fn matches_all(filter: &[Predicate], row: &Row) -> bool {
        filter.iter().all(|predicate| predicate.matches(row))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Op::IsNull => write!(f, "{} IS NULL", self.column),
            op => write!(f, "{} {} {:?}", self.column, op, self.value),
        }
    }
}
