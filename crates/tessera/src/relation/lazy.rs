use super::Link;
use crate::Result;

use tokio::sync::{Mutex, OnceCell};

use std::future::Future;
use std::sync::{Arc, Weak};

/// A deferred association value, resolved at most once.
///
/// Concurrent readers of an unresolved handle wait on the same resolution,
/// so there is one storage round trip however many tasks read it.
#[derive(Debug, Clone)]
pub(crate) struct Lazy<V> {
    link: Link,
    cell: OnceCell<V>,
}

impl<V> Lazy<V> {
    pub(crate) fn new(link: Link) -> Self {
        Self {
            link,
            cell: OnceCell::new(),
        }
    }

    pub(crate) fn link(&self) -> &Link {
        &self.link
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.cell.initialized()
    }

    pub(crate) async fn get<'a, F, Fut>(&'a self, resolve: F) -> Result<&'a V>
    where
        F: FnOnce(&'a Link) -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        self.cell.get_or_try_init(|| resolve(&self.link)).await
    }
}

/// A deferred many-to-one target.
///
/// Holds the resolved target weakly so that objects referring to each
/// other are freed once callers let go of them. While anything else holds
/// the target it is returned from the cache; after that the next read
/// resolves it again. Readers take turns, so one resolution serves every
/// reader waiting on it.
pub(crate) struct LazyOne<T> {
    link: Link,
    cached: Mutex<Option<Target<T>>>,
}

enum Target<T> {
    Missing,
    Found(Weak<T>),
}

impl<T> LazyOne<T> {
    pub(crate) fn new(link: Link) -> Self {
        Self {
            link,
            cached: Mutex::new(None),
        }
    }

    pub(crate) fn link(&self) -> &Link {
        &self.link
    }

    /// Resolved and, for a present target, still alive.
    pub(crate) fn is_resolved(&self) -> bool {
        match self.cached.try_lock().as_deref() {
            Ok(Some(Target::Missing)) => true,
            Ok(Some(Target::Found(target))) => target.strong_count() > 0,
            _ => false,
        }
    }

    pub(crate) async fn get<'a, F, Fut>(&'a self, resolve: F) -> Result<Option<Arc<T>>>
    where
        F: FnOnce(&'a Link) -> Fut,
        Fut: Future<Output = Result<Option<Arc<T>>>>,
    {
        let mut cached = self.cached.lock().await;

        match &*cached {
            Some(Target::Missing) => return Ok(None),
            Some(Target::Found(target)) => {
                if let Some(target) = target.upgrade() {
                    return Ok(Some(target));
                }
            }
            None => {}
        }

        let target = resolve(&self.link).await?;
        *cached = Some(match &target {
            Some(target) => Target::Found(Arc::downgrade(target)),
            None => Target::Missing,
        });
        Ok(target)
    }
}

impl<T> Clone for LazyOne<T> {
    fn clone(&self) -> Self {
        let cached = match self.cached.try_lock().as_deref() {
            Ok(Some(Target::Missing)) => Some(Target::Missing),
            Ok(Some(Target::Found(target))) => Some(Target::Found(target.clone())),
            _ => None,
        };

        Self {
            link: self.link.clone(),
            cached: Mutex::new(cached),
        }
    }
}
