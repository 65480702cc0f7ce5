use std::sync::{Arc, Mutex};
use tessera_core::{
    async_trait,
    driver::{Capability, Driver, Operation, Response},
    Result,
};

/// A driver wrapper that records every operation and its outcome.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Arc<dyn Driver>,

    /// Shared with the `ExecLog` handed to tests
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,

    /// `None` when the operation failed
    pub response: Option<Response>,
}

impl LoggingDriver {
    pub fn new(inner: Arc<dyn Driver>) -> Self {
        Self {
            inner,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn capability(&self) -> &Capability {
        self.inner.capability()
    }

    async fn exec(&self, operation: Operation) -> Result<Response> {
        let logged = operation.clone();
        let result = self.inner.exec(operation).await;

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                operation: logged,
                response: result.as_ref().ok().cloned(),
            });

        result
    }
}
