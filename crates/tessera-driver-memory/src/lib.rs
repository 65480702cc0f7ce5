//! A driver keeping every table in process memory.
//!
//! Tables are created on first use. Inserting into a table with a key
//! column generates sequential integer keys starting at 1 for rows that
//! carry none. Transactions snapshot all tables on start and restore the
//! snapshot on rollback.

use indexmap::IndexMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tessera_core::{
    async_trait,
    driver::{
        operation::{Delete, Insert, Operation, Query, Transaction, Update},
        Capability, Driver, Key, Response,
    },
    stmt::{OrderBy, Predicate, Row, Value},
    Result,
};

#[derive(Debug, Default)]
pub struct Memory {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    tables: IndexMap<String, Table>,

    /// Tables as they were when the open transaction started
    snapshot: Option<IndexMap<String, Table>>,
}

#[derive(Debug, Default, Clone)]
struct Table {
    rows: Vec<Row>,

    /// Last generated key
    last_id: i64,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row currently stored in `table`, in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.lock()
            .tables
            .get(table)
            .map(|table| table.rows.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Driver for Memory {
    fn capability(&self) -> &Capability {
        &Capability::RELATIONAL
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        tracing::trace!(%op, "memory exec");

        let mut state = self.lock();

        match op {
            Operation::Query(op) => Ok(state.query(op)),
            Operation::Insert(op) => state.insert(op),
            Operation::Update(op) => Ok(state.update(op)),
            Operation::Delete(op) => Ok(state.delete(op)),
            Operation::Transaction(op) => state.transaction(op),
        }
    }
}

impl State {
    fn table(&mut self, name: &str) -> &mut Table {
        self.tables.entry(name.to_string()).or_default()
    }

    fn query(&mut self, op: Query) -> Response {
        let Some(table) = self.tables.get(&op.table) else {
            return Response::values(vec![]);
        };

        let mut rows: Vec<Row> = table
            .rows
            .iter()
            .filter(|row| Predicate::matches_all(&op.filter, row))
            .cloned()
            .collect();

        if !op.order_by.is_empty() {
            // `sort_by` is stable, ties keep insertion order
            rows.sort_by(|lhs, rhs| OrderBy::compare_rows(&op.order_by, lhs, rhs));
        }

        if let Some(limit) = op.limit {
            rows.truncate(limit);
        }

        if let Some(projection) = &op.projection {
            rows = rows.iter().map(|row| row.project(projection)).collect();
        }

        Response::values(rows)
    }

    fn insert(&mut self, op: Insert) -> Result<Response> {
        let table = self.table(&op.table);
        let mut row = op.values;

        let Some(key_column) = op.key_column else {
            table.rows.push(row);
            return Ok(Response::key(Value::Null));
        };

        let key = match row.get(&key_column) {
            None | Some(Value::Null) => {
                table.last_id += 1;
                let key = Value::I64(table.last_id);
                row.insert(key_column.as_str(), key.clone());
                key
            }
            Some(key) => {
                let exists = table
                    .rows
                    .iter()
                    .any(|existing| existing.get_or_null(&key_column).sql_eq(key));
                if exists {
                    tessera_core::bail!(
                        "duplicate key: {}.{} = {:?}",
                        op.table,
                        key_column,
                        key
                    );
                }

                if let Value::I64(id) = key {
                    table.last_id = table.last_id.max(*id);
                }
                key.clone()
            }
        };

        table.rows.push(row);
        Ok(Response::key(key))
    }

    fn update(&mut self, op: Update) -> Response {
        let filter = op.key.to_filter();
        let mut count = 0;

        if let Some(table) = self.tables.get_mut(&op.table) {
            for row in table
                .rows
                .iter_mut()
                .filter(|row| Predicate::matches_all(&filter, row))
            {
                row.merge(op.values.clone());
                count += 1;
            }
        }

        Response::count(count)
    }

    fn delete(&mut self, op: Delete) -> Response {
        let Delete { table, key } = op;
        let count = self.remove(&table, &key);
        Response::count(count)
    }

    fn remove(&mut self, table: &str, key: &Key) -> u64 {
        let filter = key.to_filter();
        let Some(table) = self.tables.get_mut(table) else {
            return 0;
        };

        let before = table.rows.len();
        table
            .rows
            .retain(|row| !Predicate::matches_all(&filter, row));
        (before - table.rows.len()) as u64
    }

    fn transaction(&mut self, op: Transaction) -> Result<Response> {
        match op {
            Transaction::Start => {
                if self.snapshot.is_some() {
                    tessera_core::bail!("memory driver does not support nested transactions");
                }
                self.snapshot = Some(self.tables.clone());
            }
            Transaction::Commit => {
                if self.snapshot.take().is_none() {
                    tessera_core::bail!("commit without an open transaction");
                }
            }
            Transaction::Rollback => match self.snapshot.take() {
                Some(tables) => self.tables = tables,
                None => tessera_core::bail!("rollback without an open transaction"),
            },
        }

        Ok(Response::count(0))
    }
}
