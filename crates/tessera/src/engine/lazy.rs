use super::{KeyRepr, Session};
use crate::{relation::Link, Model, Result};

use tessera_core::{
    bail,
    driver::operation::Query,
    schema::{Association, ManyToMany, MappingDescriptor, OneToMany},
    stmt::{Op, OrderBy, Predicate, Value},
};

use std::collections::HashMap;
use std::sync::Arc;

impl Session {
    /// The object of class `T` with primary key `key`, from the identity
    /// map when possible.
    pub(crate) async fn find<T: Model>(self: &Arc<Self>, key: &Value) -> Result<Option<Arc<T>>> {
        let descriptor = self.descriptor(T::NAME)?;

        let existing = self.identity().get::<T>(T::NAME, key)?;
        if existing.is_some() {
            return Ok(existing);
        }

        let query = Query::new(&descriptor.table_name)
            .filter(Predicate::equals(&descriptor.primary_key.column, key.clone()))
            .limit(1);

        let rows = self.exec(query).await?.rows.into_values()?;

        rows.into_iter()
            .next()
            .map(|row| self.materialize::<T>(&descriptor, row))
            .transpose()
    }

    /// Resolves a many-to-one handle.
    pub(crate) async fn resolve_one<T: Model>(self: &Arc<Self>, link: &Link) -> Result<Option<Arc<T>>> {
        let association = self.association::<T>(link)?;
        let Association::ManyToOne(_) = association else {
            bail!(
                "{}.{} is not a many-to-one association",
                link.owner.class_name,
                link.attribute
            );
        };

        if link.foreign_key.is_null() {
            return Ok(None);
        }

        self.find::<T>(&link.foreign_key).await
    }

    /// Resolves a one-to-many or many-to-many handle.
    pub(crate) async fn resolve_many<T: Model>(self: &Arc<Self>, link: &Link) -> Result<Vec<Arc<T>>> {
        let target = self.descriptor(T::NAME)?;

        match self.association::<T>(link)? {
            Association::OneToMany(rel) => self.load_children::<T>(&target, rel, link).await,
            Association::ManyToMany(rel) => self.load_joined::<T>(&target, rel, link).await,
            Association::ManyToOne(_) => bail!(
                "{}.{} is a many-to-one association",
                link.owner.class_name,
                link.attribute
            ),
        }
    }

    fn association<'a, T: Model>(&self, link: &'a Link) -> Result<Association<'a>> {
        let Some(association) = link.owner.association(&link.attribute) else {
            bail!(
                "{} has no association `{}`",
                link.owner.class_name,
                link.attribute
            );
        };

        if association.target() != T::NAME {
            bail!(
                "{}.{} targets {}, not {}",
                link.owner.class_name,
                link.attribute,
                association.target(),
                T::NAME
            );
        }

        Ok(association)
    }

    /// Target rows whose inverse column holds the owner's key, in key
    /// order.
    async fn load_children<T: Model>(
        self: &Arc<Self>,
        target: &Arc<MappingDescriptor>,
        rel: &OneToMany,
        link: &Link,
    ) -> Result<Vec<Arc<T>>> {
        let query = Query::new(&target.table_name)
            .filter(Predicate::equals(&rel.inverse_column, link.owner_key.clone()))
            .order_by(OrderBy::asc(&target.primary_key.column));

        let rows = self.exec(query).await?.rows.into_values()?;

        rows.into_iter()
            .map(|row| self.materialize::<T>(target, row))
            .collect()
    }

    /// Join rows of the owner, then the targets they point to, assembled
    /// in join-row order.
    async fn load_joined<T: Model>(
        self: &Arc<Self>,
        target: &Arc<MappingDescriptor>,
        rel: &ManyToMany,
        link: &Link,
    ) -> Result<Vec<Arc<T>>> {
        let query = Query::new(&rel.join_table)
            .filter(Predicate::equals(&rel.origin_column, link.owner_key.clone()));

        let keys: Vec<Value> = self
            .exec(query)
            .await?
            .rows
            .into_values()?
            .into_iter()
            .map(|mut row| row.take(&rel.target_column))
            .filter(|key| {
                if key.is_null() {
                    tracing::warn!(join_table = %rel.join_table, "join row without target key");
                }
                !key.is_null()
            })
            .collect();

        let mut resolved = HashMap::new();
        let mut missing = vec![];

        for key in &keys {
            let repr = KeyRepr::new(key)?;
            if resolved.contains_key(&repr) {
                continue;
            }

            let existing = self.identity().get::<T>(T::NAME, key)?;
            match existing {
                Some(existing) => {
                    resolved.insert(repr, existing);
                }
                None => missing.push(key.clone()),
            }
        }

        if !missing.is_empty() {
            let query = Query::new(&target.table_name).filter(Predicate::new(
                &target.primary_key.column,
                Op::In,
                Value::List(missing),
            ));

            for row in self.exec(query).await?.rows.into_values()? {
                let key = row.get_or_null(&target.primary_key.column).clone();
                let entity = self.materialize::<T>(target, row)?;
                resolved.insert(KeyRepr::new(&key)?, entity);
            }
        }

        let mut items = Vec::with_capacity(keys.len());
        for key in keys {
            match resolved.get(&KeyRepr::new(&key)?) {
                Some(entity) => items.push(entity.clone()),
                None => tracing::warn!(
                    join_table = %rel.join_table,
                    key = ?key,
                    "join row refers to a missing {}",
                    T::NAME
                ),
            }
        }

        Ok(items)
    }
}
