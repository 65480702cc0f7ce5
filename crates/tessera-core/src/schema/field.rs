use crate::stmt::Type;

/// Binding of a scalar attribute to a column of the owner's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub attribute: String,
    pub column: String,
    pub ty: Type,

    /// Scalar fields are always loaded with their row.
    pub lazy: bool,
}

impl FieldBinding {
    pub fn new(attribute: impl Into<String>, column: impl Into<String>, ty: Type) -> Self {
        Self {
            attribute: attribute.into(),
            column: column.into(),
            ty,
            lazy: false,
        }
    }
}

/// Binding of the identity attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub attribute: String,
    pub column: String,
    pub ty: Type,
}
