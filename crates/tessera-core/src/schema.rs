//! Mapping model: resolved descriptors, the specifications they are resolved
//! from, and the convention resolver joining the two.

mod component;
pub use component::ComponentBinding;

mod declared;
pub use declared::{DeclaredAttribute, DeclaredType, DeclaredTypes, Multiplicity, TypeSource};

mod descriptor;
pub use descriptor::{Attribute, MappingDescriptor, PathColumn};

mod field;
pub use field::{FieldBinding, PrimaryKey};

pub mod name;

mod relation;
pub use relation::{Association, ManyToMany, ManyToOne, OneToMany};

mod resolve;
pub use resolve::Resolver;

mod spec;
pub use spec::{
    AssociationSpec, ComponentSpec, FieldSpec, ManyToManySpec, ManyToOneSpec, MappingSpec,
    OneToManySpec,
};

mod verify;
