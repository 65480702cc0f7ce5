use super::{Link, Many, Pending, Relation};
use crate::{Model, Result};

use std::fmt;
use std::sync::Arc;

/// The inverse side of a one-to-many association. The target rows hold the
/// owner's key; the owner's row has no column for it.
pub struct HasMany<T> {
    items: Many<T>,
}

impl<T: Model> HasMany<T> {
    pub fn new(items: Vec<Arc<T>>) -> Self {
        Self {
            items: Many::Assigned(items),
        }
    }

    /// The collection, loading it on first access. Every later call
    /// returns the same cached slice.
    pub async fn get(&self) -> Result<&[Arc<T>]> {
        self.items.get().await
    }

    /// Replaces the whole collection.
    pub fn set(&mut self, items: Vec<Arc<T>>) {
        self.items.set(items);
    }

    /// Appends `item`, loading the stored collection first if needed.
    pub async fn push(&mut self, item: impl Into<Arc<T>>) -> Result<()> {
        self.items.push(item.into()).await
    }

    pub fn is_loaded(&self) -> bool {
        self.items.is_loaded()
    }
}

impl<T: Model> Relation for HasMany<T> {
    fn install(&mut self, link: Link) {
        self.items.install(link);
    }

    fn pending(&mut self) -> Pending<'_> {
        self.items.pending()
    }
}

impl<T> Default for HasMany<T> {
    fn default() -> Self {
        Self {
            items: Many::default(),
        }
    }
}

impl<T: Model> From<Vec<Arc<T>>> for HasMany<T> {
    fn from(items: Vec<Arc<T>>) -> Self {
        Self::new(items)
    }
}

impl<T> Clone for HasMany<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T> fmt::Debug for HasMany<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.items {
            Many::Assigned(items) => write!(f, "HasMany({} assigned)", items.len()),
            Many::Linked(_) => f.write_str("HasMany(linked)"),
        }
    }
}
