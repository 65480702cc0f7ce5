use crate::engine::Session;

use tessera_core::{stmt::Value, MappingDescriptor};

use std::fmt;
use std::sync::Arc;

/// Everything needed to resolve one association of one loaded object.
#[derive(Clone)]
pub struct Link {
    pub(crate) session: Arc<Session>,

    /// Descriptor of the owning class
    pub(crate) owner: Arc<MappingDescriptor>,

    pub(crate) attribute: String,

    /// Primary key of the owning object
    pub(crate) owner_key: Value,

    /// Stored foreign key; null for collections
    pub(crate) foreign_key: Value,
}

impl Link {
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn owner_key(&self) -> &Value {
        &self.owner_key
    }

    pub fn foreign_key(&self) -> &Value {
        &self.foreign_key
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("owner", &self.owner.class_name)
            .field("attribute", &self.attribute)
            .field("owner_key", &self.owner_key)
            .field("foreign_key", &self.foreign_key)
            .finish()
    }
}
