use crate::Result;

use serde::{Deserialize, Serialize};
use tessera_core::{err, Error};

/// Engine settings, usually loaded alongside the mapping registrations.
///
/// ```
/// # use tessera::{Config, OrphanPolicy};
/// let config = Config::from_json(r#"{ "table_name_prefix": "app_", "orphans": "detach" }"#).unwrap();
/// assert_eq!(config.orphans, OrphanPolicy::Detach);
/// assert!(config.transactional_writes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prepended to every table and join-table name
    pub table_name_prefix: Option<String>,

    /// What `save` does with children no longer in a one-to-many collection
    pub orphans: OrphanPolicy,

    /// Wrap each top-level save and delete in a transaction when the driver
    /// supports them
    pub transactional_writes: bool,
}

/// Handling of children that were stored under an owner but are missing
/// from the owner's in-memory one-to-many collection at save time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Leave them untouched
    #[default]
    Retain,

    /// Null their inverse column
    Detach,

    /// Delete their rows
    Delete,
}

impl Config {
    pub fn from_json(src: &str) -> Result<Self> {
        serde_json::from_str(src)
            .map_err(|e| Error::from(anyhow::Error::new(e)).context(err!("invalid configuration")))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name_prefix: None,
            orphans: OrphanPolicy::Retain,
            transactional_writes: true,
        }
    }
}
