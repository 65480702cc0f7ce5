pub mod driver;
pub use driver::Driver;

mod error;
pub use error::{Error, IntoError};

pub mod schema;
pub use schema::MappingDescriptor;

pub mod stmt;

/// A Result type alias that uses Tessera's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
