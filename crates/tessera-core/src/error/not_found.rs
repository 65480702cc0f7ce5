use super::Error;

/// Error when a record lookup (by key) or a keyed write matches no row.
#[derive(Debug)]
pub(super) struct NotFound {
    context: Option<Box<str>>,
}

impl std::error::Error for NotFound {}

impl core::fmt::Display for NotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("record not found")?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {}", ctx)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a not found error.
    pub fn not_found(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::NotFound(NotFound {
            context: Some(context.into().into()),
        }))
    }

    /// Returns `true` if this error is a not found error.
    pub fn is_not_found(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::NotFound(_)))
    }
}
