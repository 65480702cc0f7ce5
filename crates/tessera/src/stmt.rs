//! The query builder and the plan it hands to the engine.

mod plan;
pub use plan::{QueryPlan, Selection};

mod query;
pub use query::Query;

pub use tessera_core::stmt::{Direction, Op, OrderBy, Predicate, Record, Value};
