//! Process-wide table of class name to resolved mapping descriptor.

use crate::Result;

use tessera_core::{
    schema::{MappingDescriptor, MappingSpec, Resolver, TypeSource},
    Error,
};

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Resolved descriptors, keyed by class name.
///
/// Registration is single-writer; lookups proceed concurrently with each
/// other and with registration. Each registration call installs its whole
/// batch at once, replacing any descriptor previously registered for the
/// same class. Descriptors are handed out as `Arc`s, so a reader keeps the
/// descriptor it looked up even if the class is registered again later.
pub struct Registry {
    descriptors: RwLock<HashMap<String, Arc<MappingDescriptor>>>,

    /// Serializes registration batches
    writer: Mutex<()>,

    types: Option<Arc<dyn TypeSource>>,

    table_name_prefix: Option<String>,
}

/// One class to register.
#[derive(Debug, Clone)]
pub enum Mapping {
    /// Resolve the class from an explicit (possibly partial) specification.
    Spec { class: String, spec: MappingSpec },

    /// Derive the whole mapping from the class's declared attributes.
    Convention { class: String },

    /// Install an already resolved descriptor.
    Descriptor(MappingDescriptor),
}

impl Mapping {
    pub fn spec(class: impl Into<String>, spec: MappingSpec) -> Self {
        Self::Spec {
            class: class.into(),
            spec,
        }
    }

    pub fn convention(class: impl Into<String>) -> Self {
        Self::Convention {
            class: class.into(),
        }
    }

    pub fn class_name(&self) -> &str {
        match self {
            Self::Spec { class, .. } | Self::Convention { class } => class,
            Self::Descriptor(descriptor) => &descriptor.class_name,
        }
    }
}

impl From<MappingDescriptor> for Mapping {
    fn from(descriptor: MappingDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            descriptors: RwLock::default(),
            writer: Mutex::default(),
            types: None,
            table_name_prefix: None,
        }
    }

    /// Typing collaborator consulted while resolving.
    pub fn with_types(mut self, types: Arc<dyn TypeSource>) -> Self {
        self.types = Some(types);
        self
    }

    /// Prefix for every resolved table and join-table name.
    pub fn with_table_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_name_prefix = Some(prefix.into());
        self
    }

    /// Registers `class` from an explicit specification, or by convention
    /// when `spec` is `None`.
    pub fn register(
        &self,
        class: impl Into<String>,
        spec: Option<MappingSpec>,
    ) -> Result<Arc<MappingDescriptor>> {
        let class = class.into();
        let mapping = match spec {
            Some(spec) => Mapping::spec(class, spec),
            None => Mapping::convention(class),
        };
        self.register_one(mapping)
    }

    pub fn register_mapping(
        &self,
        class: impl Into<String>,
        spec: MappingSpec,
    ) -> Result<Arc<MappingDescriptor>> {
        self.register_one(Mapping::spec(class, spec))
    }

    pub fn register_convention_mapping(
        &self,
        class: impl Into<String>,
    ) -> Result<Arc<MappingDescriptor>> {
        self.register_one(Mapping::convention(class))
    }

    /// Installs an already resolved descriptor. Its association targets
    /// must be registered.
    pub fn register_descriptor(
        &self,
        descriptor: MappingDescriptor,
    ) -> Result<Arc<MappingDescriptor>> {
        self.register_one(Mapping::Descriptor(descriptor))
    }

    fn register_one(&self, mapping: Mapping) -> Result<Arc<MappingDescriptor>> {
        let mut descriptors = self.register_all(vec![mapping])?;
        Ok(descriptors.remove(0))
    }

    /// Registers a batch of classes that may reference each other.
    ///
    /// Every class name of the batch counts as known before any of them is
    /// resolved, so cyclic associations resolve. Nothing is installed
    /// unless the whole batch resolves.
    pub fn register_all(&self, batch: Vec<Mapping>) -> Result<Vec<Arc<MappingDescriptor>>> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let in_batch: HashSet<&str> = batch.iter().map(Mapping::class_name).collect();
        let registered: HashSet<String> = self.read().keys().cloned().collect();
        let is_known = |class: &str| in_batch.contains(class) || registered.contains(class);

        let mut resolver = Resolver::new();
        if let Some(types) = &self.types {
            resolver = resolver.types(&**types);
        }
        if let Some(prefix) = &self.table_name_prefix {
            resolver = resolver.table_name_prefix(prefix);
        }

        let resolved = batch
            .iter()
            .map(|mapping| {
                let descriptor = match mapping {
                    Mapping::Spec { class, spec } => resolver.resolve(class, Some(spec), &is_known),
                    Mapping::Convention { class } => resolver.resolve(class, None, &is_known),
                    Mapping::Descriptor(descriptor) => {
                        verify_descriptor(descriptor, &is_known).map(|_| descriptor.clone())
                    }
                };
                descriptor.map(Arc::new)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut descriptors = self
            .descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        for descriptor in &resolved {
            tracing::info!(
                class = %descriptor.class_name,
                table = %descriptor.table_name,
                "registered mapping"
            );
            descriptors.insert(descriptor.class_name.clone(), descriptor.clone());
        }

        Ok(resolved)
    }

    /// The descriptor registered for `class`.
    pub fn resolve(&self, class: &str) -> Result<Arc<MappingDescriptor>> {
        self.read()
            .get(class)
            .cloned()
            .ok_or_else(|| Error::unmapped_class(class))
    }

    pub fn contains(&self, class: &str) -> bool {
        self.read().contains_key(class)
    }

    /// Registered class names, sorted.
    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<_> = self.read().keys().cloned().collect();
        classes.sort();
        classes
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<MappingDescriptor>>> {
        self.descriptors.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("classes", &self.classes())
            .field("table_name_prefix", &self.table_name_prefix)
            .finish()
    }
}

fn verify_descriptor(
    descriptor: &MappingDescriptor,
    is_known: &dyn Fn(&str) -> bool,
) -> Result<()> {
    descriptor.verify()?;

    for association in descriptor.associations() {
        if !is_known(association.target()) {
            return Err(Error::unknown_target_class(
                &descriptor.class_name,
                association.attribute(),
                association.target(),
            ));
        }
    }

    Ok(())
}
