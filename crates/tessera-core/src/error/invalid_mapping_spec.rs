use super::Error;

/// Error when a verbose mapping specification cannot be parsed.
#[derive(Debug)]
pub(super) struct InvalidMappingSpec {
    inner: serde_json::Error,
}

impl std::error::Error for InvalidMappingSpec {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl core::fmt::Display for InvalidMappingSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid mapping specification: {}", self.inner)
    }
}

impl Error {
    /// Creates an invalid mapping specification error.
    pub fn invalid_mapping_spec(err: serde_json::Error) -> Error {
        Error::from(super::ErrorKind::InvalidMappingSpec(InvalidMappingSpec {
            inner: err,
        }))
    }

    /// Returns `true` if this error is an invalid mapping specification error.
    pub fn is_invalid_mapping_spec(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidMappingSpec(_)))
    }
}
