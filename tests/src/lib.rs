pub use exec_log::ExecLog;

mod failing_driver;
pub use failing_driver::{FailingDriver, Failure};

mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver};

pub mod models;

mod setup;
pub use setup::{init_tracing, Setup};

pub use std_util::*;

/// A `Db` builder with the given models registered.
#[macro_export]
macro_rules! models {
    (
        $( $model:ty ),*
    ) => {{
        let mut builder = tessera::Db::builder();
        $( builder.register::<$model>(); )*
        builder
    }};
}
