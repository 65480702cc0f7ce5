mod identity_map;
use identity_map::{IdentityMap, KeyRepr};

mod lazy;

mod materialize;

mod query;

mod session;
pub(crate) use session::Session;

mod transaction;
use transaction::Transaction;

mod write;

use crate::{Config, Registry};

use tessera_core::driver::Driver;

use std::sync::Arc;

/// Everything a unit of work needs: the registry snapshot source, the
/// storage collaborator and the engine settings. Cheap to clone.
#[derive(Debug, Clone)]
pub(crate) struct Engine {
    pub(crate) registry: Arc<Registry>,
    pub(crate) driver: Arc<dyn Driver>,
    pub(crate) config: Arc<Config>,

    /// Held from `Start` to `Commit`/`Rollback`; the driver sees one scoped
    /// transaction at a time.
    pub(crate) writes: Arc<tokio::sync::Mutex<()>>,
}

impl Engine {
    pub(crate) fn new(registry: Registry, driver: impl Driver, config: Config) -> Self {
        Self {
            registry: Arc::new(registry),
            driver: Arc::new(driver),
            config: Arc::new(config),
            writes: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Starts a unit of work with an empty identity map.
    pub(crate) fn session(&self) -> Arc<Session> {
        Session::new(self.clone())
    }
}
