use super::Error;

/// Error when a query path crosses an association.
///
/// Paths may descend into embedded components (`address.city`) but never
/// through an association (`tasks.name`); joins across associations in
/// filters are not supported.
#[derive(Debug)]
pub(super) struct UnsupportedPathTraversal {
    class: Box<str>,
    path: Box<str>,
    association: Box<str>,
}

impl std::error::Error for UnsupportedPathTraversal {}

impl core::fmt::Display for UnsupportedPathTraversal {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported path traversal: `{}` on {} crosses association `{}`",
            self.path, self.class, self.association
        )
    }
}

impl Error {
    /// Creates an unsupported path traversal error.
    pub fn unsupported_path_traversal(
        class: impl Into<String>,
        path: impl Into<String>,
        association: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnsupportedPathTraversal(
            UnsupportedPathTraversal {
                class: class.into().into(),
                path: path.into().into(),
                association: association.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an unsupported path traversal error.
    pub fn is_unsupported_path_traversal(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnsupportedPathTraversal(_)))
    }
}
