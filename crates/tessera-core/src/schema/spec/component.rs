use super::FieldSpec;

use serde::{Deserialize, Serialize};

/// Specification of an embedded value.
///
/// When neither fields nor nested components are listed, they are taken
/// from the declared attributes of `class` (or of the class the owner
/// declares for this attribute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub attribute: String,

    /// Column prefix; defaults to the attribute name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Declared class of the embedded value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,

    #[serde(default)]
    pub components: Vec<ComponentSpec>,

    #[serde(default, rename = "override")]
    pub override_convention: bool,
}

impl ComponentSpec {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            prefix: None,
            class: None,
            fields: vec![],
            components: vec![],
            override_convention: false,
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
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

    pub fn override_convention(mut self) -> Self {
        self.override_convention = true;
        self
    }
}
