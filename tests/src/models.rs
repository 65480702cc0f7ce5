//! Domain classes shared by the integration tests.
//!
//! `User` and `Task` carry explicit mappings; `Status` and `Group` are
//! mapped by convention from their declared attributes.

mod address;
pub use address::Address;

mod group;
pub use group::Group;

mod status;
pub use status::Status;

pub use task::Task;

mod user;
pub use user::User;
