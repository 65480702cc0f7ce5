use super::Error;

/// Error when the mapping specification and the conventions (or declared
/// types) disagree and the specification did not mark an explicit override.
#[derive(Debug)]
pub(super) struct AmbiguousMapping {
    class: Box<str>,
    attribute: Box<str>,
    message: Box<str>,
}

impl std::error::Error for AmbiguousMapping {}

impl core::fmt::Display for AmbiguousMapping {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "ambiguous mapping for {}.{}: {}",
            self.class, self.attribute, self.message
        )
    }
}

impl Error {
    /// Creates an ambiguous mapping error.
    pub fn ambiguous_mapping(
        class: impl Into<String>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::AmbiguousMapping(AmbiguousMapping {
            class: class.into().into(),
            attribute: attribute.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an ambiguous mapping error.
    pub fn is_ambiguous_mapping(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::AmbiguousMapping(_)))
    }
}
