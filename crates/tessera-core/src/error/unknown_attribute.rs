use super::Error;

/// Error when a path or attribute name does not name a mapped column.
#[derive(Debug)]
pub(super) struct UnknownAttribute {
    class: Box<str>,
    path: Box<str>,
}

impl std::error::Error for UnknownAttribute {}

impl core::fmt::Display for UnknownAttribute {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown attribute: `{}` does not name a mapped column of {}",
            self.path, self.class
        )
    }
}

impl Error {
    /// Creates an unknown attribute error.
    pub fn unknown_attribute(class: impl Into<String>, path: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownAttribute(UnknownAttribute {
            class: class.into().into(),
            path: path.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown attribute error.
    pub fn is_unknown_attribute(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnknownAttribute(_)))
    }
}
