use crate::stmt::Type;

use serde::{Deserialize, Serialize};

/// Specification of a scalar attribute. Every part but the attribute name
/// may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldSpecRepr")]
pub struct FieldSpec {
    pub attribute: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,

    /// The specified type wins over a conflicting declared type.
    #[serde(rename = "override")]
    pub override_convention: bool,
}

/// The verbose form accepts a bare attribute name in place of an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSpecRepr {
    Name(String),
    Full {
        attribute: String,
        #[serde(default)]
        column: Option<String>,
        #[serde(default, rename = "type")]
        ty: Option<Type>,
        #[serde(default, rename = "override")]
        override_convention: bool,
    },
}

impl FieldSpec {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            column: None,
            ty: None,
            override_convention: false,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn ty(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn override_convention(mut self) -> Self {
        self.override_convention = true;
        self
    }
}

impl From<FieldSpecRepr> for FieldSpec {
    fn from(repr: FieldSpecRepr) -> Self {
        match repr {
            FieldSpecRepr::Name(attribute) => FieldSpec::new(attribute),
            FieldSpecRepr::Full {
                attribute,
                column,
                ty,
                override_convention,
            } => FieldSpec {
                attribute,
                column,
                ty,
                override_convention,
            },
        }
    }
}

impl From<&str> for FieldSpec {
    fn from(attribute: &str) -> Self {
        FieldSpec::new(attribute)
    }
}

impl From<String> for FieldSpec {
    fn from(attribute: String) -> Self {
        FieldSpec::new(attribute)
    }
}

impl From<(&str, Type)> for FieldSpec {
    fn from((attribute, ty): (&str, Type)) -> Self {
        FieldSpec::new(attribute).ty(ty)
    }
}
