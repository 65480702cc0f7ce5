use crate::relation::Relation;
use crate::Result;

use tessera_core::schema::{DeclaredAttribute, MappingSpec};
use tessera_core::stmt::Value;

use std::sync::Arc;

/// Attribute access the engine needs from a domain object.
///
/// The domain type knows nothing about tables or columns; it only exposes
/// its attributes by name. Scalars travel as [`Value`]s. An embedded
/// component travels as a [`Value::Record`] keyed by the component's
/// attribute names, nested components as nested records.
pub trait Entity: Send + Sync {
    /// Current value of a scalar or component attribute, `None` if the
    /// object has no such attribute.
    fn get_attribute(&self, name: &str) -> Option<Value>;

    /// Assigns a scalar or component attribute.
    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()>;

    /// The association stored in attribute `name`.
    fn relation_mut(&mut self, name: &str) -> Option<&mut dyn Relation>;
}

/// A domain class that can be registered and queried.
pub trait Model: Entity + Sized + 'static {
    /// Class name the mapping is registered under.
    const NAME: &'static str;

    /// A blank instance, filled in attribute by attribute when a row is
    /// materialized.
    fn instantiate() -> Self;

    /// Mapping specification. `None` maps the class by convention.
    fn mapping() -> Option<MappingSpec> {
        None
    }

    /// Declared attribute types, consulted to fill gaps in the mapping.
    fn declared_attributes() -> Option<Vec<DeclaredAttribute>> {
        None
    }
}

/// Access to an object held by an association.
///
/// Objects loaded from storage are shared; only an object the association
/// holds exclusively can be written to, e.g. to receive a generated key.
pub trait EntitySlot: Send + Sync {
    fn entity(&self) -> &dyn Entity;

    /// `None` when the object is shared.
    fn entity_mut(&mut self) -> Option<&mut dyn Entity>;
}

impl<T: Model> EntitySlot for Arc<T> {
    fn entity(&self) -> &dyn Entity {
        &**self
    }

    fn entity_mut(&mut self) -> Option<&mut dyn Entity> {
        Arc::get_mut(self).map(|entity| entity as &mut dyn Entity)
    }
}
