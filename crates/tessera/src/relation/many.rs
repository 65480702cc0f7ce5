use super::{Lazy, Link, Pending};
use crate::{EntitySlot, Model, Result};

use std::sync::Arc;

/// State shared by the collection associations.
pub(crate) enum Many<T> {
    /// Set in memory, or loaded and then modified
    Assigned(Vec<Arc<T>>),

    /// As loaded; resolved on first read
    Linked(Lazy<Vec<Arc<T>>>),
}

impl<T: Model> Many<T> {
    pub(crate) async fn get(&self) -> Result<&[Arc<T>]> {
        match self {
            Many::Assigned(items) => Ok(items),
            Many::Linked(lazy) => {
                let items = lazy
                    .get(|link| link.session.resolve_many::<T>(link))
                    .await?;
                Ok(items)
            }
        }
    }

    pub(crate) fn set(&mut self, items: Vec<Arc<T>>) {
        *self = Many::Assigned(items);
    }

    /// Loads the collection first when it is still a lazy handle, so the
    /// next save writes the complete collection.
    pub(crate) async fn push(&mut self, item: Arc<T>) -> Result<()> {
        if let Many::Linked(lazy) = self {
            let loaded = lazy
                .get(|link| link.session.resolve_many::<T>(link))
                .await?
                .clone();
            *self = Many::Assigned(loaded);
        }

        if let Many::Assigned(items) = self {
            items.push(item);
        }
        Ok(())
    }

    pub(crate) fn is_loaded(&self) -> bool {
        match self {
            Many::Assigned(_) => true,
            Many::Linked(lazy) => lazy.is_resolved(),
        }
    }

    pub(crate) fn install(&mut self, link: Link) {
        *self = Many::Linked(Lazy::new(link));
    }

    pub(crate) fn pending(&mut self) -> Pending<'_> {
        match self {
            Many::Linked(lazy) => Pending::Linked(lazy.link()),
            Many::Assigned(items) => Pending::Many(
                items
                    .iter_mut()
                    .map(|item| item as &mut dyn EntitySlot)
                    .collect(),
            ),
        }
    }
}

impl<T> Default for Many<T> {
    fn default() -> Self {
        Many::Assigned(vec![])
    }
}

impl<T> Clone for Many<T> {
    fn clone(&self) -> Self {
        match self {
            Many::Assigned(items) => Many::Assigned(items.clone()),
            Many::Linked(lazy) => Many::Linked(lazy.clone()),
        }
    }
}
