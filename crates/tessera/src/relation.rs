mod belongs_to;
pub use belongs_to::BelongsTo;

mod has_many;
pub use has_many::HasMany;

mod lazy;
use lazy::{Lazy, LazyOne};

mod link;
pub use link::Link;

mod many;
use many::Many;

mod many_to_many;
pub use many_to_many::ManyToMany;

use crate::EntitySlot;

/// An association attribute of a domain object, as seen by the engine.
///
/// Implemented by [`BelongsTo`], [`HasMany`] and [`ManyToMany`]; domain
/// types hand them out through
/// [`Entity::relation_mut`](crate::Entity::relation_mut).
pub trait Relation: Send + Sync {
    /// Replaces the current value with an unresolved lazy handle. Called
    /// once, when the owner is materialized.
    fn install(&mut self, link: Link);

    /// What a save has to write for this association.
    fn pending(&mut self) -> Pending<'_>;
}

pub enum Pending<'a> {
    /// Still the handle installed at load time. The stored state is
    /// current, a many-to-one keeps the foreign key it was loaded with.
    Linked(&'a Link),

    /// A many-to-one assigned in memory, `None` when cleared.
    One(Option<&'a mut dyn EntitySlot>),

    /// A collection assigned or modified in memory.
    Many(Vec<&'a mut dyn EntitySlot>),
}
