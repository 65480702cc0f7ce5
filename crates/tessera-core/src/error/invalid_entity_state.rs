use super::Error;

/// Error when a domain object cannot take part in a write, for example a
/// new object shared by several owners that cannot receive its generated key.
#[derive(Debug)]
pub(super) struct InvalidEntityState {
    class: Box<str>,
    message: Box<str>,
}

impl std::error::Error for InvalidEntityState {}

impl core::fmt::Display for InvalidEntityState {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid {} state: {}", self.class, self.message)
    }
}

impl Error {
    /// Creates an invalid entity state error.
    pub fn invalid_entity_state(class: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidEntityState(InvalidEntityState {
            class: class.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid entity state error.
    pub fn is_invalid_entity_state(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidEntityState(_)))
    }
}
