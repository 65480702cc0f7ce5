use super::Error;

/// Error when the storage collaborator reports a transport failure or a
/// timeout.
#[derive(Debug)]
pub(super) struct StorageUnavailable {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for StorageUnavailable {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for StorageUnavailable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("storage unavailable: ")?;
        // Display the error and walk its source chain
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates a storage unavailable error from a driver-level failure.
    ///
    /// Drivers use this to surface connection loss and timeouts; the engine
    /// never retries on them.
    pub fn storage_unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::StorageUnavailable(StorageUnavailable {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is a storage unavailable error.
    pub fn is_storage_unavailable(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::StorageUnavailable(_)))
    }
}
