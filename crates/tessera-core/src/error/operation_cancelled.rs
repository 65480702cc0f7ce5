use super::Error;

/// Error when the storage collaborator cancelled an operation.
#[derive(Debug)]
pub(super) struct OperationCancelled {
    reason: Box<str>,
}

impl std::error::Error for OperationCancelled {}

impl core::fmt::Display for OperationCancelled {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "operation cancelled: {}", self.reason)
    }
}

impl Error {
    /// Creates an operation cancelled error.
    pub fn operation_cancelled(reason: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::OperationCancelled(OperationCancelled {
            reason: reason.into().into(),
        }))
    }

    /// Returns `true` if this error is an operation cancelled error.
    pub fn is_operation_cancelled(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::OperationCancelled(_)))
    }
}
