use crate::{Model, Result};

use chrono::NaiveDateTime;
use tessera_core::{bail, stmt::Value, Error};

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// One instance per (class, primary key) within a unit of work.
///
/// Entries are weak: the map never keeps an object alive on its own.
#[derive(Default)]
pub(crate) struct IdentityMap {
    entries: HashMap<(String, KeyRepr), Weak<dyn Any + Send + Sync>>,
}

/// Hashable form of a primary key value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum KeyRepr {
    Bool(bool),
    I64(i64),
    F64(u64),
    String(String),
    DateTime(NaiveDateTime),
}

impl KeyRepr {
    pub(crate) fn new(key: &Value) -> Result<Self> {
        Ok(match key {
            Value::Bool(v) => Self::Bool(*v),
            Value::I64(v) => Self::I64(*v),
            Value::F64(v) => Self::F64(v.to_bits()),
            Value::String(v) => Self::String(v.clone()),
            Value::DateTime(v) => Self::DateTime(*v),
            other => bail!("a {} value cannot identify a row", other.kind_name()),
        })
    }
}

impl IdentityMap {
    pub(crate) fn get<T: Model>(&self, class: &str, key: &Value) -> Result<Option<Arc<T>>> {
        let entry = (class.to_string(), KeyRepr::new(key)?);

        match self.entries.get(&entry).and_then(Weak::upgrade) {
            Some(existing) => downcast(class, existing).map(Some),
            None => Ok(None),
        }
    }

    /// Maps `entity` under its key, unless a live instance is already
    /// mapped there. Returns the mapped instance.
    pub(crate) fn insert<T: Model>(&mut self, class: &str, key: &Value, entity: T) -> Result<Arc<T>> {
        let entry = (class.to_string(), KeyRepr::new(key)?);

        if let Some(existing) = self.entries.get(&entry).and_then(Weak::upgrade) {
            return downcast(class, existing);
        }

        let entity = Arc::new(entity);
        let erased: Arc<dyn Any + Send + Sync> = entity.clone();
        self.entries.insert(entry, Arc::downgrade(&erased));
        Ok(entity)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }
}

fn downcast<T: Model>(class: &str, entity: Arc<dyn Any + Send + Sync>) -> Result<Arc<T>> {
    entity.downcast::<T>().map_err(|_| {
        Error::invalid_entity_state(
            class,
            format!(
                "identity map holds an instance of another type than `{}`",
                std::any::type_name::<T>()
            ),
        )
    })
}
