use super::Error;

/// Error when an association references a class that is neither registered
/// nor part of the registration batch.
#[derive(Debug)]
pub(super) struct UnknownTargetClass {
    class: Box<str>,
    attribute: Box<str>,
    target: Box<str>,
}

impl std::error::Error for UnknownTargetClass {}

impl core::fmt::Display for UnknownTargetClass {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown target class: {}.{} references unmapped class `{}`",
            self.class, self.attribute, self.target
        )
    }
}

impl Error {
    /// Creates an unknown target class error.
    pub fn unknown_target_class(
        class: impl Into<String>,
        attribute: impl Into<String>,
        target: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnknownTargetClass(UnknownTargetClass {
            class: class.into().into(),
            attribute: attribute.into().into(),
            target: target.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown target class error.
    pub fn is_unknown_target_class(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnknownTargetClass(_)))
    }
}
