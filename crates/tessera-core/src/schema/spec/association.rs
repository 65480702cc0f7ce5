use serde::{Deserialize, Serialize};

/// Specification of an association, tagged by `kind` in the verbose form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssociationSpec {
    ManyToOne(ManyToOneSpec),
    OneToMany(OneToManySpec),
    ManyToMany(ManyToManySpec),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyToOneSpec {
    pub attribute: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,

    #[serde(default, rename = "override")]
    pub override_convention: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneToManySpec {
    pub attribute: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_column: Option<String>,

    #[serde(default, rename = "override")]
    pub override_convention: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyToManySpec {
    pub attribute: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_table: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_column: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_column: Option<String>,

    #[serde(default, rename = "override")]
    pub override_convention: bool,
}

impl AssociationSpec {
    pub fn attribute(&self) -> &str {
        match self {
            AssociationSpec::ManyToOne(spec) => &spec.attribute,
            AssociationSpec::OneToMany(spec) => &spec.attribute,
            AssociationSpec::ManyToMany(spec) => &spec.attribute,
        }
    }
}

impl ManyToOneSpec {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            target: None,
            foreign_key: None,
            override_convention: false,
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn foreign_key(mut self, column: impl Into<String>) -> Self {
        self.foreign_key = Some(column.into());
        self
    }

    pub fn override_convention(mut self) -> Self {
        self.override_convention = true;
        self
    }
}

impl OneToManySpec {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            target: None,
            inverse_column: None,
            override_convention: false,
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn inverse_column(mut self, column: impl Into<String>) -> Self {
        self.inverse_column = Some(column.into());
        self
    }

    pub fn override_convention(mut self) -> Self {
        self.override_convention = true;
        self
    }
}

impl ManyToManySpec {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            target: None,
            join_table: None,
            origin_column: None,
            target_column: None,
            override_convention: false,
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn join_table(mut self, table: impl Into<String>) -> Self {
        self.join_table = Some(table.into());
        self
    }

    pub fn origin_column(mut self, column: impl Into<String>) -> Self {
        self.origin_column = Some(column.into());
        self
    }

    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    pub fn override_convention(mut self) -> Self {
        self.override_convention = true;
        self
    }
}

impl From<ManyToOneSpec> for AssociationSpec {
    fn from(spec: ManyToOneSpec) -> Self {
        AssociationSpec::ManyToOne(spec)
    }
}

impl From<OneToManySpec> for AssociationSpec {
    fn from(spec: OneToManySpec) -> Self {
        AssociationSpec::OneToMany(spec)
    }
}

impl From<ManyToManySpec> for AssociationSpec {
    fn from(spec: ManyToManySpec) -> Self {
        AssociationSpec::ManyToMany(spec)
    }
}
