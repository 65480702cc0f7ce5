mod capability;
pub use capability::Capability;

mod key;
pub use key::Key;

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::async_trait;

use std::fmt::Debug;

/// The storage collaborator.
///
/// A driver executes one [`Operation`] at a time against a table (or
/// collection) of rows. Drivers report transport failures and timeouts as
/// [`Error::storage_unavailable`](crate::Error::storage_unavailable) and
/// cancellations as
/// [`Error::operation_cancelled`](crate::Error::operation_cancelled); the
/// engine propagates them without retrying.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the driver's capability, which informs the engine.
    fn capability(&self) -> &Capability;

    /// Execute a storage operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;
}
