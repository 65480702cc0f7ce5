use super::{QueryPlan, Selection};
use crate::{engine::Engine, Model, Result};

use tessera_core::{
    bail, err,
    stmt::{Direction, Op, OrderBy, Predicate, Record, Type, Value},
    Error, MappingDescriptor,
};

use std::{fmt, marker::PhantomData, sync::Arc};

/// Accumulates filters, ordering, a projection and a limit for one mapped
/// class.
///
/// Building is pure: paths are only checked when the query is planned, and
/// storage is only touched by the terminals [`all`](Self::all),
/// [`first`](Self::first), [`count`](Self::count) and
/// [`records`](Self::records).
pub struct Query<M> {
    engine: Engine,
    filter: Vec<Clause>,
    order_by: Vec<(String, Direction)>,
    select: Option<Vec<String>>,
    limit: Option<usize>,
    _p: PhantomData<fn() -> M>,
}

#[derive(Debug, Clone)]
struct Clause {
    path: String,
    op: Op,
    value: Value,
}

impl<M: Model> Query<M> {
    pub(crate) fn new(engine: Engine) -> Self {
        Self {
            engine,
            filter: vec![],
            order_by: vec![],
            select: None,
            limit: None,
            _p: PhantomData,
        }
    }

    /// Adds a `path <op> value` clause. Clauses are conjunctive.
    ///
    /// `path` names an attribute of `M`, a component field (`address.city`)
    /// or a many-to-one attribute, which compares its foreign key.
    pub fn filter(mut self, path: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.filter.push(Clause {
            path: path.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Shorthand for an equality clause.
    pub fn filter_by(self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(path, Op::Eq, value)
    }

    pub fn is_null(self, path: impl Into<String>) -> Self {
        self.filter(path, Op::IsNull, Value::Null)
    }

    pub fn order_by(mut self, path: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push((path.into(), direction));
        self
    }

    /// Restricts the query to the given attribute paths. A projected query
    /// is read with [`records`](Self::records).
    pub fn select<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.select = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resolves every path against the current mapping of `M`.
    pub fn plan(&self) -> Result<QueryPlan> {
        self.plan_for(self.engine.registry.resolve(M::NAME)?)
    }

    /// Every matching object.
    pub async fn all(self) -> Result<Vec<Arc<M>>> {
        let session = self.engine.session();
        let plan = self.plan_for(session.descriptor(M::NAME)?)?;

        if plan.is_projected() {
            bail!(
                "query on {} selects attributes; read it with `records()`",
                M::NAME
            );
        }

        session.load::<M>(&plan).await
    }

    /// The first matching object, if any.
    pub async fn first(self) -> Result<Option<Arc<M>>> {
        let objects = self.limit(1).all().await?;
        Ok(objects.into_iter().next())
    }

    /// Number of matching rows.
    pub async fn count(self) -> Result<u64> {
        let session = self.engine.session();
        let plan = self.plan_for(session.descriptor(M::NAME)?)?;
        session.count(&plan).await
    }

    /// One record per matching row, keyed by attribute path. Without a
    /// projection every column-backed attribute is included, many-to-one
    /// attributes holding their foreign key.
    pub async fn records(self) -> Result<Vec<Record>> {
        let session = self.engine.session();
        let plan = self.plan_for(session.descriptor(M::NAME)?)?;
        session.records(&plan).await
    }

    fn plan_for(&self, descriptor: Arc<MappingDescriptor>) -> Result<QueryPlan> {
        let filter = self
            .filter
            .iter()
            .map(|clause| predicate(&descriptor, clause))
            .collect::<Result<Vec<_>>>()?;

        let order_by = self
            .order_by
            .iter()
            .map(|(path, direction)| {
                let column = descriptor.resolve_path(path)?.column.to_string();
                Ok(OrderBy {
                    column,
                    direction: *direction,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let projection = match &self.select {
            Some(paths) => Some(
                paths
                    .iter()
                    .map(|path| {
                        let column = descriptor.resolve_path(path)?.column.to_string();
                        Ok(Selection {
                            path: path.clone(),
                            column,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };

        Ok(QueryPlan {
            descriptor,
            filter,
            order_by,
            projection,
            limit: self.limit,
        })
    }
}

fn predicate(descriptor: &MappingDescriptor, clause: &Clause) -> Result<Predicate> {
    let path = descriptor.resolve_path(&clause.path)?;

    let value = match clause.op {
        Op::IsNull => Value::Null,
        Op::In => {
            let Some(items) = clause.value.as_list() else {
                bail!(
                    "`{}` IN expects a list, got {}",
                    clause.path,
                    clause.value.kind_name()
                );
            };
            match path.ty {
                Some(ty) => Value::List(
                    items
                        .iter()
                        .map(|item| check(descriptor, clause, item, ty))
                        .collect::<Result<_>>()?,
                ),
                None => clause.value.clone(),
            }
        }
        _ => match path.ty {
            Some(ty) => check(descriptor, clause, &clause.value, ty)?,
            None => clause.value.clone(),
        },
    };

    Ok(Predicate::new(path.column, clause.op, value))
}

/// `value` as stored in a column of type `ty`. Integers widen to floats.
fn check(
    descriptor: &MappingDescriptor,
    clause: &Clause,
    value: &Value,
    ty: Type,
) -> Result<Value> {
    match value {
        Value::I64(v) if ty == Type::Float => return Ok(Value::F64(*v as f64)),
        _ if value.is_a(&ty) => return Ok(value.clone()),
        _ => {}
    }

    Err(Error::type_conversion(value.clone(), ty.name()).context(err!(
        "filter on {}.{}",
        descriptor.class_name,
        clause.path
    )))
}

impl<M> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            filter: self.filter.clone(),
            order_by: self.order_by.clone(),
            select: self.select.clone(),
            limit: self.limit,
            _p: PhantomData,
        }
    }
}

impl<M: Model> fmt::Debug for Query<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("class", &M::NAME)
            .field("filter", &self.filter)
            .field("order_by", &self.order_by)
            .field("select", &self.select)
            .field("limit", &self.limit)
            .finish()
    }
}
