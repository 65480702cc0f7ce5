mod association;
pub use association::{AssociationSpec, ManyToManySpec, ManyToOneSpec, OneToManySpec};

mod component;
pub use component::ComponentSpec;

mod field;
pub use field::FieldSpec;

use super::{DeclaredAttribute, DeclaredType, Multiplicity};
use crate::{Error, Result};

use serde::{Deserialize, Serialize};

/// A partial mapping specification for one class.
///
/// Omitted details are filled in by the [`Resolver`](super::Resolver) from
/// naming conventions and declared attribute types. Two front ends produce
/// the same value: the verbose form parsed by [`MappingSpec::from_json`]
/// and the terse form built with the chained methods below.
///
/// ```
/// # use tessera_core::schema::{ComponentSpec, MappingSpec};
/// # use tessera_core::stmt::Type;
/// let terse = MappingSpec::new()
///     .field(("name", Type::String))
///     .component(ComponentSpec::new("address").field(("city", Type::String)))
///     .many_to_one("status", "Status");
///
/// let verbose = MappingSpec::from_json(r#"{
///     "fields": [{ "attribute": "name", "type": "string" }],
///     "components": [{ "attribute": "address", "fields": [{ "attribute": "city", "type": "string" }] }],
///     "associations": [{ "kind": "many_to_one", "attribute": "status", "target": "Status" }]
/// }"#).unwrap();
///
/// assert_eq!(terse, verbose);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<FieldSpec>,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,

    #[serde(default)]
    pub components: Vec<ComponentSpec>,

    #[serde(default)]
    pub associations: Vec<AssociationSpec>,
}

impl MappingSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the verbose (hash shaped) form.
    pub fn from_json(src: &str) -> Result<Self> {
        serde_json::from_str(src).map_err(Error::invalid_mapping_spec)
    }

    /// Derives a specification from declared attributes alone: scalars
    /// become fields, embedded values become components, single references
    /// become many-to-one and multi references become one-to-many.
    pub fn from_declared(class: &str, attributes: &[DeclaredAttribute]) -> Result<Self> {
        let mut spec = MappingSpec::new();

        for attribute in attributes {
            let name = attribute.name.as_str();

            spec = match (&attribute.ty, attribute.multiplicity) {
                (DeclaredType::Scalar(_), Multiplicity::One) => spec.field(name),
                (DeclaredType::Scalar(_), Multiplicity::Many) => {
                    return Err(Error::ambiguous_mapping(
                        class,
                        name,
                        "a collection of scalars has no column to map to",
                    ))
                }
                (DeclaredType::Embedded(embedded), _) => {
                    spec.component(ComponentSpec::new(name).class(embedded))
                }
                (DeclaredType::Reference(target), Multiplicity::One) => {
                    spec.many_to_one(name, target)
                }
                (DeclaredType::Reference(target), Multiplicity::Many) => {
                    spec.one_to_many(name, target)
                }
            };
        }

        Ok(spec)
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn primary_key(mut self, primary_key: impl Into<FieldSpec>) -> Self {
        self.primary_key = Some(primary_key.into());
        self
    }

    pub fn field(mut self, field: impl Into<FieldSpec>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn component(mut self, component: ComponentSpec) -> Self {
        self.components.push(component);
        self
    }

    pub fn association(mut self, association: impl Into<AssociationSpec>) -> Self {
        self.associations.push(association.into());
        self
    }

    pub fn many_to_one(self, attribute: impl Into<String>, target: impl Into<String>) -> Self {
        self.association(ManyToOneSpec::new(attribute).target(target))
    }

    pub fn one_to_many(self, attribute: impl Into<String>, target: impl Into<String>) -> Self {
        self.association(OneToManySpec::new(attribute).target(target))
    }

    pub fn many_to_many(self, attribute: impl Into<String>, target: impl Into<String>) -> Self {
        self.association(ManyToManySpec::new(attribute).target(target))
    }
}
