mod adhoc;
mod ambiguous_mapping;
mod duplicate_attribute_binding;
mod invalid_entity_state;
mod invalid_mapping_spec;
mod missing_type_information;
mod not_found;
mod operation_cancelled;
mod storage_unavailable;
mod type_conversion;
mod unknown_attribute;
mod unknown_target_class;
mod unmapped_class;
mod unsupported_path_traversal;

use adhoc::AdhocError;
use ambiguous_mapping::AmbiguousMapping;
use duplicate_attribute_binding::DuplicateAttributeBinding;
use invalid_entity_state::InvalidEntityState;
use invalid_mapping_spec::InvalidMappingSpec;
use missing_type_information::MissingTypeInformation;
use not_found::NotFound;
use operation_cancelled::OperationCancelled;
use std::sync::Arc;
use storage_unavailable::StorageUnavailable;
use type_conversion::TypeConversionError;
use unknown_attribute::UnknownAttribute;
use unknown_target_class::UnknownTargetClass;
use unmapped_class::UnmappedClass;
use unsupported_path_traversal::UnsupportedPathTraversal;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur in Tessera.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) => inner.kind,
                Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    /// Creates an ad-hoc error from format arguments. Prefer the `err!` and
    /// `bail!` macros.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::new(args.to_string())))
    }

    /// Returns the innermost error of the context chain.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Some(cause) = err.inner.as_ref().and_then(|inner| inner.cause.as_ref()) {
            err = cause;
        }
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }

    /// Returns `true` if any error in the context chain satisfies `f`.
    fn any(&self, f: impl Fn(&ErrorKind) -> bool) -> bool {
        self.chain().any(|err| f(err.kind()))
    }

    /// Returns `true` for errors raised while resolving or registering a
    /// mapping. These are fatal to the registration call.
    pub fn is_mapping_error(&self) -> bool {
        self.any(|kind| {
            matches!(
                kind,
                ErrorKind::MissingTypeInformation(_)
                    | ErrorKind::UnknownTargetClass(_)
                    | ErrorKind::AmbiguousMapping(_)
                    | ErrorKind::DuplicateAttributeBinding(_)
                    | ErrorKind::UnmappedClass(_)
                    | ErrorKind::InvalidMappingSpec(_)
            )
        })
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            ErrorKind::StorageUnavailable(err) => Some(err),
            ErrorKind::InvalidMappingSpec(err) => Some(err),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    MissingTypeInformation(MissingTypeInformation),
    UnknownTargetClass(UnknownTargetClass),
    AmbiguousMapping(AmbiguousMapping),
    DuplicateAttributeBinding(DuplicateAttributeBinding),
    UnmappedClass(UnmappedClass),
    InvalidMappingSpec(InvalidMappingSpec),
    UnsupportedPathTraversal(UnsupportedPathTraversal),
    UnknownAttribute(UnknownAttribute),
    NotFound(NotFound),
    StorageUnavailable(StorageUnavailable),
    OperationCancelled(OperationCancelled),
    TypeConversion(TypeConversionError),
    InvalidEntityState(InvalidEntityState),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            MissingTypeInformation(err) => core::fmt::Display::fmt(err, f),
            UnknownTargetClass(err) => core::fmt::Display::fmt(err, f),
            AmbiguousMapping(err) => core::fmt::Display::fmt(err, f),
            DuplicateAttributeBinding(err) => core::fmt::Display::fmt(err, f),
            UnmappedClass(err) => core::fmt::Display::fmt(err, f),
            InvalidMappingSpec(err) => core::fmt::Display::fmt(err, f),
            UnsupportedPathTraversal(err) => core::fmt::Display::fmt(err, f),
            UnknownAttribute(err) => core::fmt::Display::fmt(err, f),
            NotFound(err) => core::fmt::Display::fmt(err, f),
            StorageUnavailable(err) => core::fmt::Display::fmt(err, f),
            OperationCancelled(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            InvalidEntityState(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown tessera error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}
