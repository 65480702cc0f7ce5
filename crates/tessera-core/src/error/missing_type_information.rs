use super::Error;

/// Error when neither the mapping specification nor the declared attribute
/// types provide a storage type for an attribute.
#[derive(Debug)]
pub(super) struct MissingTypeInformation {
    class: Box<str>,
    attribute: Option<Box<str>>,
}

impl std::error::Error for MissingTypeInformation {}

impl core::fmt::Display for MissingTypeInformation {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.attribute {
            Some(attribute) => write!(
                f,
                "missing type information: {}.{} has no declared or specified type",
                self.class, attribute
            ),
            None => write!(
                f,
                "missing type information: {} declares no attributes to map by convention",
                self.class
            ),
        }
    }
}

impl Error {
    /// Creates a missing type information error for one attribute.
    pub fn missing_type_information(class: impl Into<String>, attribute: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingTypeInformation(
            MissingTypeInformation {
                class: class.into().into(),
                attribute: Some(attribute.into().into()),
            },
        ))
    }

    /// Creates a missing type information error for a class that has no
    /// declared attributes at all.
    pub fn missing_declared_attributes(class: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MissingTypeInformation(
            MissingTypeInformation {
                class: class.into().into(),
                attribute: None,
            },
        ))
    }

    /// Returns `true` if this error is a missing type information error.
    pub fn is_missing_type_information(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::MissingTypeInformation(_)))
    }
}
