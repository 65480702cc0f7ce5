use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tessera_core::{
    async_trait,
    driver::{Capability, Driver, Operation, Response},
    Error, Result,
};

/// What an injected failure looks like to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The store timed out
    Timeout,

    /// The caller's operation was cancelled
    Cancelled,

    /// The store never answers
    Stall,
}

type Matcher = Box<dyn Fn(&Operation) -> bool + Send + Sync>;

/// A driver wrapper that fails every operation matching a predicate until
/// healed.
#[derive(Clone)]
pub struct FailingDriver {
    inner: Arc<dyn Driver>,
    plan: Arc<Mutex<Option<(Failure, Matcher)>>>,

    /// Yield to the scheduler before every operation
    interleave: Arc<AtomicBool>,
}

impl FailingDriver {
    pub fn new(inner: Arc<dyn Driver>) -> Self {
        Self {
            inner,
            plan: Arc::new(Mutex::new(None)),
            interleave: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_on<F>(&self, failure: Failure, when: F)
    where
        F: Fn(&Operation) -> bool + Send + Sync + 'static,
    {
        *self.plan.lock().unwrap() = Some((failure, Box::new(when)));
    }

    pub fn heal(&self) {
        *self.plan.lock().unwrap() = None;
    }

    /// Lets concurrent callers interleave at every operation.
    pub fn interleave(&self) {
        self.interleave.store(true, Ordering::Relaxed);
    }

    fn injected(&self, operation: &Operation) -> Option<Failure> {
        let plan = self.plan.lock().unwrap();
        let (failure, when) = plan.as_ref()?;

        when(operation).then_some(*failure)
    }
}

#[async_trait]
impl Driver for FailingDriver {
    fn capability(&self) -> &Capability {
        self.inner.capability()
    }

    async fn exec(&self, operation: Operation) -> Result<Response> {
        if self.interleave.load(Ordering::Relaxed) {
            tokio::task::yield_now().await;
        }

        let Some(failure) = self.injected(&operation) else {
            return self.inner.exec(operation).await;
        };
        tracing::debug!(%operation, ?failure, "injecting failure");

        Err(match failure {
            Failure::Timeout => Error::storage_unavailable(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("injected timeout on {operation}"),
            )),
            Failure::Cancelled => Error::operation_cancelled(format!("injected on {operation}")),
            Failure::Stall => std::future::pending().await,
        })
    }
}

impl fmt::Debug for FailingDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailingDriver")
            .field("inner", &self.inner)
            .finish()
    }
}
