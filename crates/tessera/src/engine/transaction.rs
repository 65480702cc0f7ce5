use super::Session;
use crate::Result;

use tessera_core::driver::{operation::Transaction as TransactionOp, Driver};
use tokio::sync::OwnedMutexGuard;

use std::sync::Arc;

/// Scoped transaction around one top-level write.
///
/// Inactive when the driver has no transactions or the configuration
/// turns them off; `commit` and `rollback` are then no-ops. An active
/// transaction holds the engine's write lock until it ends. Dropped
/// without ending, e.g. when the save future is cancelled, it rolls back
/// in the background before releasing the lock.
pub(crate) struct Transaction<'a> {
    session: &'a Session,
    open: Option<Open>,
}

struct Open {
    driver: Arc<dyn Driver>,
    permit: OwnedMutexGuard<()>,
}

impl<'a> Transaction<'a> {
    pub(crate) async fn start(session: &'a Session) -> Result<Self> {
        let engine = session.engine();
        let active = engine.driver.capability().transactions && engine.config.transactional_writes;

        if !active {
            return Ok(Self { session, open: None });
        }

        let permit = engine.writes.clone().lock_owned().await;
        let driver = engine.driver.clone();

        // Until `Start` succeeds there is nothing to roll back
        session.exec(TransactionOp::Start).await?;

        Ok(Self {
            session,
            open: Some(Open { driver, permit }),
        })
    }

    pub(crate) async fn commit(mut self) -> Result<()> {
        self.end(TransactionOp::Commit).await
    }

    pub(crate) async fn rollback(mut self) -> Result<()> {
        self.end(TransactionOp::Rollback).await
    }

    /// Commits on success, rolls back on failure. A failed rollback is
    /// logged; the original error is returned.
    pub(crate) async fn finish<T>(self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.rollback().await {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn end(&mut self, op: TransactionOp) -> Result<()> {
        if self.open.is_none() {
            return Ok(());
        }

        let result = self.session.exec(op).await;

        // Releases the write lock
        self.open = None;
        result.map(drop)
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        let Some(Open { driver, permit }) = self.open.take() else {
            return;
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("transaction abandoned outside a runtime; not rolled back");
            return;
        };

        runtime.spawn(async move {
            if let Err(err) = driver.exec(TransactionOp::Rollback.into()).await {
                tracing::warn!(error = %err, "rollback of abandoned transaction failed");
            }
            drop(permit);
        });
    }
}
