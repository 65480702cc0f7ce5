use super::{Engine, IdentityMap, KeyRepr};
use crate::Result;

use tessera_core::{
    driver::{Operation, Response},
    stmt::Value,
    MappingDescriptor,
};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One unit of work: a single top-level repository call and the lazy
/// associations of the objects it materialized.
///
/// Lazy handles hold the session, so objects loaded later through them join
/// the same identity map.
pub(crate) struct Session {
    engine: Engine,

    identity: Mutex<IdentityMap>,

    /// Descriptors as they were when this unit of work first needed them
    descriptors: Mutex<HashMap<String, Arc<MappingDescriptor>>>,

    /// Keys generated by storage during this unit of work's save
    assigned: Mutex<HashSet<(String, KeyRepr)>>,
}

impl Session {
    pub(crate) fn new(engine: Engine) -> Arc<Self> {
        Arc::new(Self {
            engine,
            identity: Mutex::default(),
            descriptors: Mutex::default(),
            assigned: Mutex::default(),
        })
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Registry entry for `class`, snapshotted on first use.
    pub(crate) fn descriptor(&self, class: &str) -> Result<Arc<MappingDescriptor>> {
        let mut descriptors = self
            .descriptors
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(descriptor) = descriptors.get(class) {
            return Ok(descriptor.clone());
        }

        let descriptor = self.engine.registry.resolve(class)?;
        descriptors.insert(class.to_string(), descriptor.clone());
        Ok(descriptor)
    }

    pub(crate) fn identity(&self) -> MutexGuard<'_, IdentityMap> {
        self.identity.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn record_assigned(&self, class: &str, key: &Value) -> Result<()> {
        let key = KeyRepr::new(key)?;
        self.assigned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((class.to_string(), key));
        Ok(())
    }

    /// Whether storage generated `key` for a `class` object in this unit of
    /// work.
    pub(crate) fn was_assigned(&self, class: &str, key: &Value) -> bool {
        let Ok(key) = KeyRepr::new(key) else {
            return false;
        };
        self.assigned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(class.to_string(), key))
    }

    /// Sends one operation to the storage collaborator.
    pub(crate) async fn exec(&self, op: impl Into<Operation>) -> Result<Response> {
        let op = op.into();
        tracing::debug!(%op, "exec");
        self.engine.driver.exec(op).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("identity_map_len", &self.identity().len())
            .finish()
    }
}
