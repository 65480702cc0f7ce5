use super::{
    Association, ComponentBinding, FieldBinding, ManyToMany, ManyToOne, OneToMany, PrimaryKey,
};
use crate::{stmt::Type, Error, Result};

/// Resolved, read-only binding of one domain class to its storage
/// representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDescriptor {
    pub class_name: String,

    /// Table, or collection for document stores
    pub table_name: String,

    pub primary_key: PrimaryKey,

    pub fields: Vec<FieldBinding>,

    pub components: Vec<ComponentBinding>,

    pub many_to_one: Vec<ManyToOne>,

    pub one_to_many: Vec<OneToMany>,

    pub many_to_many: Vec<ManyToMany>,
}

/// An attribute of a descriptor, whatever its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute<'a> {
    PrimaryKey(&'a PrimaryKey),
    Field(&'a FieldBinding),
    Component(&'a ComponentBinding),
    Association(Association<'a>),
}

/// The column a query path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathColumn<'a> {
    pub column: &'a str,

    /// Storage type, unknown for foreign-key columns
    pub ty: Option<Type>,
}

impl MappingDescriptor {
    pub fn attribute(&self, name: &str) -> Option<Attribute<'_>> {
        if self.primary_key.attribute == name {
            return Some(Attribute::PrimaryKey(&self.primary_key));
        }

        if let Some(field) = self.field(name) {
            return Some(Attribute::Field(field));
        }

        if let Some(component) = self.component(name) {
            return Some(Attribute::Component(component));
        }

        self.association(name).map(Attribute::Association)
    }

    pub fn field(&self, attribute: &str) -> Option<&FieldBinding> {
        self.fields.iter().find(|field| field.attribute == attribute)
    }

    pub fn component(&self, attribute: &str) -> Option<&ComponentBinding> {
        self.components
            .iter()
            .find(|component| component.attribute == attribute)
    }

    pub fn association(&self, attribute: &str) -> Option<Association<'_>> {
        self.associations()
            .find(|association| association.attribute() == attribute)
    }

    /// Every association, many-to-one first, then one-to-many, then
    /// many-to-many.
    pub fn associations(&self) -> impl Iterator<Item = Association<'_>> {
        self.many_to_one
            .iter()
            .map(Association::ManyToOne)
            .chain(self.one_to_many.iter().map(Association::OneToMany))
            .chain(self.many_to_many.iter().map(Association::ManyToMany))
    }

    /// Every attribute name, in declaration order per kind.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_key.attribute.as_str())
            .chain(self.fields.iter().map(|f| f.attribute.as_str()))
            .chain(self.components.iter().map(|c| c.attribute.as_str()))
            .chain(self.associations().map(|a| a.attribute()))
    }

    /// Every column of the owner's table: key, fields, flattened component
    /// fields and many-to-one foreign keys.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = vec![self.primary_key.column.as_str()];
        columns.extend(self.fields.iter().map(|f| f.column.as_str()));
        for component in &self.components {
            columns.extend(component.columns());
        }
        columns.extend(self.many_to_one.iter().map(|rel| rel.foreign_key.as_str()));
        columns
    }

    /// Resolves a dotted attribute path to a column of the owner's table.
    ///
    /// Paths descend into components (`address.city`). A bare many-to-one
    /// attribute resolves to its foreign key column. Any other use of an
    /// association fails with `UnsupportedPathTraversal`.
    pub fn resolve_path(&self, path: &str) -> Result<PathColumn<'_>> {
        let mut segments = path.split('.');
        let head = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();

        let unknown = || Error::unknown_attribute(&self.class_name, path);

        match self.attribute(head).ok_or_else(unknown)? {
            Attribute::PrimaryKey(pk) if rest.is_empty() => Ok(PathColumn {
                column: &pk.column,
                ty: Some(pk.ty),
            }),
            Attribute::Field(field) if rest.is_empty() => Ok(PathColumn {
                column: &field.column,
                ty: Some(field.ty),
            }),
            Attribute::Component(component) => {
                resolve_component_path(component, &rest).ok_or_else(unknown)
            }
            Attribute::Association(Association::ManyToOne(rel)) if rest.is_empty() => {
                Ok(PathColumn {
                    column: &rel.foreign_key,
                    ty: None,
                })
            }
            Attribute::Association(association) => Err(Error::unsupported_path_traversal(
                &self.class_name,
                path,
                association.attribute(),
            )),
            Attribute::PrimaryKey(_) | Attribute::Field(_) => Err(unknown()),
        }
    }
}

fn resolve_component_path<'a>(
    component: &'a ComponentBinding,
    path: &[&str],
) -> Option<PathColumn<'a>> {
    match path {
        [attribute] => component.field(attribute).map(|field| PathColumn {
            column: &field.column,
            ty: Some(field.ty),
        }),
        [attribute, rest @ ..] if !rest.is_empty() => {
            resolve_component_path(component.component(attribute)?, rest)
        }
        _ => None,
    }
}
