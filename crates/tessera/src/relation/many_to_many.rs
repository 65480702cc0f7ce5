use super::{Link, Many, Pending, Relation};
use crate::{Model, Result};

use std::fmt;
use std::sync::Arc;

/// A many-to-many association, stored as pairs of keys in a join table.
pub struct ManyToMany<T> {
    items: Many<T>,
}

impl<T: Model> ManyToMany<T> {
    pub fn new(items: Vec<Arc<T>>) -> Self {
        Self {
            items: Many::Assigned(items),
        }
    }

    /// Targets in join-row order. Duplicate join rows yield duplicate
    /// entries.
    pub async fn get(&self) -> Result<&[Arc<T>]> {
        self.items.get().await
    }

    /// Replaces the collection. The next save rewrites the join rows of
    /// the owner to match it.
    pub fn set(&mut self, items: Vec<Arc<T>>) {
        self.items.set(items);
    }

    pub async fn push(&mut self, item: impl Into<Arc<T>>) -> Result<()> {
        self.items.push(item.into()).await
    }

    pub fn is_loaded(&self) -> bool {
        self.items.is_loaded()
    }
}

impl<T: Model> Relation for ManyToMany<T> {
    fn install(&mut self, link: Link) {
        self.items.install(link);
    }

    fn pending(&mut self) -> Pending<'_> {
        self.items.pending()
    }
}

impl<T> Default for ManyToMany<T> {
    fn default() -> Self {
        Self {
            items: Many::default(),
        }
    }
}

impl<T: Model> From<Vec<Arc<T>>> for ManyToMany<T> {
    fn from(items: Vec<Arc<T>>) -> Self {
        Self::new(items)
    }
}

impl<T> Clone for ManyToMany<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}

impl<T> fmt::Debug for ManyToMany<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.items {
            Many::Assigned(items) => write!(f, "ManyToMany({} assigned)", items.len()),
            Many::Linked(_) => f.write_str("ManyToMany(linked)"),
        }
    }
}
