use super::Error;

/// Error when two bindings of one descriptor share an attribute name or a
/// column name.
#[derive(Debug)]
pub(super) struct DuplicateAttributeBinding {
    class: Box<str>,
    name: Box<str>,
    column: bool,
}

impl std::error::Error for DuplicateAttributeBinding {}

impl core::fmt::Display for DuplicateAttributeBinding {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let what = if self.column { "column" } else { "attribute" };
        write!(
            f,
            "duplicate attribute binding: {} `{}` is bound more than once in {}",
            what, self.name, self.class
        )
    }
}

impl Error {
    /// Creates a duplicate binding error for an attribute name.
    pub fn duplicate_attribute_binding(class: impl Into<String>, attribute: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateAttributeBinding(
            DuplicateAttributeBinding {
                class: class.into().into(),
                name: attribute.into().into(),
                column: false,
            },
        ))
    }

    /// Creates a duplicate binding error for a column name.
    pub fn duplicate_column_binding(class: impl Into<String>, column: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateAttributeBinding(
            DuplicateAttributeBinding {
                class: class.into().into(),
                name: column.into().into(),
                column: true,
            },
        ))
    }

    /// Returns `true` if this error is a duplicate binding error.
    pub fn is_duplicate_attribute_binding(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::DuplicateAttributeBinding(_)))
    }
}
