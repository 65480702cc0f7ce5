use crate::stmt::Type;

use indexmap::IndexMap;
use std::fmt;

/// Optional typing collaborator.
///
/// Exposes the attributes a domain class declares. The resolver consults it
/// only to fill gaps in a mapping specification, or to derive a whole
/// specification by convention.
pub trait TypeSource: Send + Sync + 'static {
    /// Declared attributes of `class`, in declaration order. `None` when the
    /// class declares nothing.
    fn declared_attributes(&self, class: &str) -> Option<Vec<DeclaredAttribute>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredAttribute {
    pub name: String,
    pub ty: DeclaredType,
    pub multiplicity: Multiplicity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    Scalar(Type),

    /// Reference to another mapped class
    Reference(String),

    /// Embedded value of the named (declared) class
    Embedded(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    One,
    Many,
}

impl DeclaredAttribute {
    pub fn scalar(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty: DeclaredType::Scalar(ty),
            multiplicity: Multiplicity::One,
        }
    }

    /// A single reference to `target`.
    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: DeclaredType::Reference(target.into()),
            multiplicity: Multiplicity::One,
        }
    }

    /// A collection of references to `target`.
    pub fn many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: DeclaredType::Reference(target.into()),
            multiplicity: Multiplicity::Many,
        }
    }

    pub fn embedded(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: DeclaredType::Embedded(class.into()),
            multiplicity: Multiplicity::One,
        }
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Multiplicity::One => "one",
            Multiplicity::Many => "many",
        })
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Scalar(ty) => write!(f, "{ty}"),
            DeclaredType::Reference(target) => write!(f, "reference to {target}"),
            DeclaredType::Embedded(class) => write!(f, "embedded {class}"),
        }
    }
}

/// A `TypeSource` backed by an in-memory table, for startup code that
/// declares attribute types by hand.
#[derive(Debug, Default, Clone)]
pub struct DeclaredTypes {
    classes: IndexMap<String, Vec<DeclaredAttribute>>,
}

impl DeclaredTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(
        mut self,
        class: impl Into<String>,
        attributes: impl IntoIterator<Item = DeclaredAttribute>,
    ) -> Self {
        self.insert(class, attributes);
        self
    }

    pub fn insert(
        &mut self,
        class: impl Into<String>,
        attributes: impl IntoIterator<Item = DeclaredAttribute>,
    ) {
        self.classes
            .insert(class.into(), attributes.into_iter().collect());
    }
}

impl TypeSource for DeclaredTypes {
    fn declared_attributes(&self, class: &str) -> Option<Vec<DeclaredAttribute>> {
        self.classes.get(class).cloned()
    }
}
