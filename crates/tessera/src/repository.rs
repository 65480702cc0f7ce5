use crate::{engine::Engine, stmt::Query, Model, Result};

use tessera_core::{
    stmt::{Op, Value},
    Error, MappingDescriptor,
};

use std::{fmt, marker::PhantomData, sync::Arc};

/// Entry point for reading and writing one mapped class.
///
/// Every call is its own unit of work with a fresh identity map. Objects
/// come back as `Arc`s; lazy associations on them stay usable after the
/// call returns.
pub struct Repository<M> {
    engine: Engine,
    _p: PhantomData<fn() -> M>,
}

impl<M: Model> Repository<M> {
    pub(crate) fn new(engine: Engine) -> Self {
        Self {
            engine,
            _p: PhantomData,
        }
    }

    /// Current mapping of `M`.
    pub fn descriptor(&self) -> Result<Arc<MappingDescriptor>> {
        self.engine.registry.resolve(M::NAME)
    }

    /// The object with primary key `key`. Fails with `NotFound` when there
    /// is none.
    pub async fn find(&self, key: impl Into<Value>) -> Result<Arc<M>> {
        let key = key.into();
        self.get(key.clone())
            .await?
            .ok_or_else(|| Error::not_found(format!("{} with key {key:?}", M::NAME)))
    }

    /// Like [`find`](Self::find), but a missing object is `None`.
    pub async fn get(&self, key: impl Into<Value>) -> Result<Option<Arc<M>>> {
        let key = key.into();
        if key.is_null() {
            return Ok(None);
        }

        self.engine.session().find::<M>(&key).await
    }

    pub fn query(&self) -> Query<M> {
        Query::new(self.engine.clone())
    }

    pub fn filter(&self, path: impl Into<String>, op: Op, value: impl Into<Value>) -> Query<M> {
        self.query().filter(path, op, value)
    }

    pub fn filter_by(&self, path: impl Into<String>, value: impl Into<Value>) -> Query<M> {
        self.query().filter_by(path, value)
    }

    pub async fn all(&self) -> Result<Vec<Arc<M>>> {
        self.query().all().await
    }

    /// Inserts `object` if it has no primary key, updates it otherwise.
    ///
    /// New objects reachable through its associations are inserted first
    /// and receive their keys; so does `object`.
    pub async fn save(&self, object: &mut M) -> Result<()> {
        self.engine.session().save(M::NAME, object).await
    }

    /// Deletes `object` and its many-to-many join rows.
    pub async fn delete(&self, object: &M) -> Result<()> {
        self.engine.session().delete(M::NAME, object).await
    }
}

impl<M> Clone for Repository<M> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            _p: PhantomData,
        }
    }
}

impl<M: Model> fmt::Debug for Repository<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository").field("class", &M::NAME).finish()
    }
}
