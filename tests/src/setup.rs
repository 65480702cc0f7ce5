use crate::{ExecLog, FailingDriver, LoggingDriver};

use std::sync::{Arc, Once};
use tessera::{db::Builder, Db};
use tessera_core::driver::Driver;
use tessera_driver_memory::Memory;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber once per test binary, filtered by `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A `Db` over an in-memory store, with every operation logged and a
/// failure injection point between the engine and the store.
pub struct Setup {
    pub db: Db,

    /// The store itself, for inspecting rows
    pub memory: Arc<Memory>,

    pub log: ExecLog,

    pub faults: FailingDriver,
}

impl Setup {
    pub fn new(builder: &mut Builder) -> Self {
        init_tracing();

        let memory = Arc::new(Memory::new());
        let faults = FailingDriver::new(memory.clone() as Arc<dyn Driver>);
        let logging = LoggingDriver::new(Arc::new(faults.clone()));
        let log = ExecLog::new(logging.ops_log_handle());

        let db = builder.build(logging).unwrap();

        Self {
            db,
            memory,
            log,
            faults,
        }
    }
}
