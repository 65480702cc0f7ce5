use super::Db;
use crate::{registry::Mapping, Config, Model, OrphanPolicy, Registry, Result};

use tessera_core::{
    driver::Driver,
    schema::{DeclaredAttribute, DeclaredTypes, TypeSource},
};

use std::sync::Arc;

/// Collects mappings and settings, then registers everything in one batch.
#[derive(Default)]
pub struct Builder {
    /// Registered in order at `build`
    mappings: Vec<Mapping>,

    /// Declared attributes of registered models
    declared: DeclaredTypes,

    /// Consulted for classes that declare nothing themselves
    types: Option<Arc<dyn TypeSource>>,

    config: Config,
}

impl Builder {
    /// Registers a model with its own mapping, or by convention from its
    /// declared attributes.
    pub fn register<T: Model>(&mut self) -> &mut Self {
        if let Some(attributes) = T::declared_attributes() {
            self.declared.insert(T::NAME, attributes);
        }

        let mapping = match T::mapping() {
            Some(spec) => Mapping::spec(T::NAME, spec),
            None => Mapping::convention(T::NAME),
        };
        self.mappings.push(mapping);
        self
    }

    pub fn register_mapping(&mut self, mapping: impl Into<Mapping>) -> &mut Self {
        self.mappings.push(mapping.into());
        self
    }

    /// Declares attribute types for a class registered without a model,
    /// e.g. through [`register_mapping`](Self::register_mapping).
    pub fn declare(
        &mut self,
        class: impl Into<String>,
        attributes: impl IntoIterator<Item = DeclaredAttribute>,
    ) -> &mut Self {
        self.declared.insert(class, attributes);
        self
    }

    pub fn type_source(&mut self, types: impl TypeSource) -> &mut Self {
        self.types = Some(Arc::new(types));
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.config.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn orphans(&mut self, policy: OrphanPolicy) -> &mut Self {
        self.config.orphans = policy;
        self
    }

    pub fn transactional_writes(&mut self, enabled: bool) -> &mut Self {
        self.config.transactional_writes = enabled;
        self
    }

    /// Replaces every setting at once.
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let types = Types {
            declared: self.declared.clone(),
            fallback: self.types.clone(),
        };

        let mut registry = Registry::new().with_types(Arc::new(types));
        if let Some(prefix) = &self.config.table_name_prefix {
            registry = registry.with_table_name_prefix(prefix);
        }

        registry.register_all(self.mappings.clone())?;

        Ok(Db::new(registry, driver, self.config.clone()))
    }
}

/// Declared attributes of registered models, then the external type source.
struct Types {
    declared: DeclaredTypes,
    fallback: Option<Arc<dyn TypeSource>>,
}

impl TypeSource for Types {
    fn declared_attributes(&self, class: &str) -> Option<Vec<DeclaredAttribute>> {
        self.declared
            .declared_attributes(class)
            .or_else(|| self.fallback.as_ref()?.declared_attributes(class))
    }
}
