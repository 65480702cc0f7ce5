pub mod config;
pub use config::{Config, OrphanPolicy};

pub mod db;
pub use db::Db;

mod engine;

mod model;
pub use model::{Entity, EntitySlot, Model};

pub mod registry;
pub use registry::{Mapping, Registry};

pub mod relation;
pub use relation::{BelongsTo, HasMany, ManyToMany};

mod repository;
pub use repository::Repository;

pub mod stmt;

pub use tessera_core::{
    driver, schema,
    stmt::{Direction, Op, Record, Type, Value},
    Error, Result,
};
