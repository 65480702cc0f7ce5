mod builder;
pub use builder::Builder;

use crate::{engine::Engine, Config, Model, Registry, Repository};

use tessera_core::driver::{Capability, Driver};

/// A handle to the mapped classes and the storage collaborator. Cheap to
/// clone; clones share the registry and the driver.
#[derive(Debug, Clone)]
pub struct Db {
    engine: Engine,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Wraps an already populated registry.
    pub fn new(registry: Registry, driver: impl Driver, config: Config) -> Self {
        Self {
            engine: Engine::new(registry, driver, config),
        }
    }

    pub fn repository<M: Model>(&self) -> Repository<M> {
        Repository::new(self.engine.clone())
    }

    /// The registry. Classes registered after the `Db` is built are visible
    /// to operations that start afterwards.
    pub fn registry(&self) -> &Registry {
        &self.engine.registry
    }

    pub fn config(&self) -> &Config {
        &self.engine.config
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.engine.driver
    }

    pub fn capability(&self) -> &Capability {
        self.engine.driver.capability()
    }
}
