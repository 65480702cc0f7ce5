use super::{LazyOne, Link, Pending, Relation};
use crate::{EntitySlot, Model, Result};

use std::fmt;
use std::sync::Arc;

/// The owning side of a many-to-one association. The owner's row holds
/// the target's key.
pub struct BelongsTo<T> {
    state: One<T>,
}

enum One<T> {
    Unset,
    Assigned(Arc<T>),
    Linked(LazyOne<T>),
}

impl<T: Model> BelongsTo<T> {
    pub fn new(target: Arc<T>) -> Self {
        Self {
            state: One::Assigned(target),
        }
    }

    /// The target, loading it on first access. A loaded object that refers
    /// back to an instance already materialized in the same unit of work
    /// gets that very instance.
    ///
    /// The handle does not keep a loaded target alive; once nothing else
    /// holds it, the next call loads it again.
    pub async fn get(&self) -> Result<Option<Arc<T>>> {
        match &self.state {
            One::Unset => Ok(None),
            One::Assigned(target) => Ok(Some(target.clone())),
            One::Linked(lazy) => lazy.get(|link| link.session.resolve_one::<T>(link)).await,
        }
    }

    pub fn set(&mut self, target: impl Into<Option<Arc<T>>>) {
        self.state = match target.into() {
            Some(target) => One::Assigned(target),
            None => One::Unset,
        };
    }

    pub fn is_loaded(&self) -> bool {
        match &self.state {
            One::Linked(lazy) => lazy.is_resolved(),
            _ => true,
        }
    }
}

impl<T: Model> Relation for BelongsTo<T> {
    fn install(&mut self, link: Link) {
        self.state = One::Linked(LazyOne::new(link));
    }

    fn pending(&mut self) -> Pending<'_> {
        match &mut self.state {
            One::Unset => Pending::One(None),
            One::Assigned(target) => Pending::One(Some(target as &mut dyn EntitySlot)),
            One::Linked(lazy) => Pending::Linked(lazy.link()),
        }
    }
}

impl<T> Default for BelongsTo<T> {
    fn default() -> Self {
        Self { state: One::Unset }
    }
}

impl<T: Model> From<Arc<T>> for BelongsTo<T> {
    fn from(target: Arc<T>) -> Self {
        Self::new(target)
    }
}

impl<T: Model> From<T> for BelongsTo<T> {
    fn from(target: T) -> Self {
        Self::new(Arc::new(target))
    }
}

impl<T> Clone for BelongsTo<T> {
    fn clone(&self) -> Self {
        let state = match &self.state {
            One::Unset => One::Unset,
            One::Assigned(target) => One::Assigned(target.clone()),
            One::Linked(lazy) => One::Linked(lazy.clone()),
        };
        Self { state }
    }
}

impl<T> fmt::Debug for BelongsTo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            One::Unset => f.write_str("BelongsTo(unset)"),
            One::Assigned(_) => f.write_str("BelongsTo(assigned)"),
            One::Linked(lazy) => f
                .debug_tuple("BelongsTo")
                .field(lazy.link().foreign_key())
                .finish(),
        }
    }
}
