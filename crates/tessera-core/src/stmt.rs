//! Scalar values, rows and the predicate/ordering vocabulary shared by the
//! engine and drivers.

mod op;
pub use op::Op;

mod order_by;
pub use order_by::{Direction, OrderBy};

mod predicate;
pub use predicate::Predicate;

mod record;
pub use record::Record;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_cmp;

/// A storage row: column name to scalar value.
pub type Row = Record;
