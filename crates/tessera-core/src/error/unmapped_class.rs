use super::Error;

/// Error when the registry holds no descriptor for a class.
#[derive(Debug)]
pub(super) struct UnmappedClass {
    class: Box<str>,
}

impl std::error::Error for UnmappedClass {}

impl core::fmt::Display for UnmappedClass {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unmapped class: `{}` is not registered", self.class)
    }
}

impl Error {
    /// Creates an unmapped class error.
    pub fn unmapped_class(class: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnmappedClass(UnmappedClass {
            class: class.into().into(),
        }))
    }

    /// Returns `true` if this error is an unmapped class error.
    pub fn is_unmapped_class(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnmappedClass(_)))
    }
}
