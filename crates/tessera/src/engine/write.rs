use super::{materialize::missing_relation, KeyRepr, Session, Transaction};
use crate::{relation::Pending, Entity, EntitySlot, OrphanPolicy, Result};

use async_recursion::async_recursion;
use tessera_core::{
    bail,
    driver::{
        operation::{Delete, Insert, Query, Update},
        Key,
    },
    err,
    schema::{ComponentBinding, FieldBinding, ManyToMany, ManyToOne, MappingDescriptor, OneToMany},
    stmt::{Predicate, Record, Row, Value},
    Error,
};

use std::collections::HashSet;
use std::sync::Arc;

impl Session {
    /// Inserts `entity` when it has no key, updates it otherwise, then
    /// writes its associations. The whole graph is written in one scoped
    /// transaction.
    pub(crate) async fn save(self: &Arc<Self>, class: &str, entity: &mut dyn Entity) -> Result<()> {
        let descriptor = self.descriptor(class)?;

        let tx = Transaction::start(self).await?;
        let result = save_entity(self, descriptor.clone(), entity, Row::new()).await;
        let result = tx.finish(result).await;

        // Rolled back rows take their generated keys with them
        if result.is_err() {
            self.forget_assigned_keys(&descriptor, entity);
        }

        result
    }

    /// Resets every key generated during a failed save back to null, so the
    /// objects are inserted again on the next save.
    fn forget_assigned_keys(&self, descriptor: &MappingDescriptor, entity: &mut dyn Entity) {
        let pk = &descriptor.primary_key;
        let key = entity.get_attribute(&pk.attribute).unwrap_or_default();

        if self.was_assigned(&descriptor.class_name, &key) {
            if let Err(err) = entity.set_attribute(&pk.attribute, Value::Null) {
                tracing::warn!(class = %descriptor.class_name, error = %err, "failed to reset key");
            }
        }

        let targets = descriptor
            .many_to_one
            .iter()
            .map(|rel| (&rel.attribute, &rel.target))
            .chain(descriptor.one_to_many.iter().map(|rel| (&rel.attribute, &rel.target)))
            .chain(descriptor.many_to_many.iter().map(|rel| (&rel.attribute, &rel.target)));

        for (attribute, target) in targets {
            let Ok(target) = self.descriptor(target) else {
                continue;
            };
            let Some(relation) = entity.relation_mut(attribute) else {
                continue;
            };

            let slots = match relation.pending() {
                Pending::One(Some(slot)) => vec![slot],
                Pending::Many(slots) => slots,
                Pending::One(None) | Pending::Linked(_) => vec![],
            };

            // Only exclusively held objects can have received a key
            for slot in slots {
                if let Some(entity) = slot.entity_mut() {
                    self.forget_assigned_keys(&target, entity);
                }
            }
        }
    }

    /// Deletes the join rows of `entity`, then its own row. One-to-many
    /// children are left alone.
    pub(crate) async fn delete(self: &Arc<Self>, class: &str, entity: &dyn Entity) -> Result<()> {
        let descriptor = self.descriptor(class)?;
        let key = entity
            .get_attribute(&descriptor.primary_key.attribute)
            .unwrap_or_default();

        if key.is_null() {
            return Err(Error::invalid_entity_state(
                class,
                "cannot delete an object that was never saved",
            ));
        }

        let tx = Transaction::start(self).await?;
        let result = self.delete_rows(&descriptor, key).await;
        tx.finish(result).await
    }

    async fn delete_rows(&self, descriptor: &MappingDescriptor, key: Value) -> Result<()> {
        for rel in &descriptor.many_to_many {
            self.exec(Delete {
                table: rel.join_table.clone(),
                key: Key::new(&rel.origin_column, key.clone()),
            })
            .await?;
        }

        let count = self
            .exec(Delete {
                table: descriptor.table_name.clone(),
                key: Key::new(&descriptor.primary_key.column, key.clone()),
            })
            .await?
            .rows
            .into_count()?;

        if count == 0 {
            return Err(not_found(descriptor, &key));
        }

        Ok(())
    }
}

/// Writes one object and, recursively, the new objects it references.
///
/// `overrides` are written last, over the object's own columns; a parent
/// uses them to point a child's inverse column at itself.
#[async_recursion]
async fn save_entity(
    session: &Arc<Session>,
    descriptor: Arc<MappingDescriptor>,
    entity: &mut dyn Entity,
    overrides: Row,
) -> Result<()> {
    let pk = &descriptor.primary_key;
    let mut row = Row::new();

    // Referenced objects first, so their keys exist
    for rel in &descriptor.many_to_one {
        let foreign_key = save_reference(session, &descriptor, rel, entity).await?;
        row.insert(rel.foreign_key.as_str(), foreign_key);
    }

    let key = entity.get_attribute(&pk.attribute).unwrap_or_default();
    let is_new = key.is_null();

    write_fields(&descriptor, &*entity, &mut row)?;
    row.merge(overrides);

    let key = if is_new {
        let insert = Insert {
            table: descriptor.table_name.clone(),
            key_column: Some(pk.column.clone()),
            values: row,
        };
        let key = session.exec(insert).await?.rows.into_key()?;

        if key.is_null() {
            bail!("storage generated no key for the new {}", descriptor.class_name);
        }

        session.record_assigned(&descriptor.class_name, &key)?;
        entity.set_attribute(&pk.attribute, key.clone())?;
        key
    } else {
        let update = Update {
            table: descriptor.table_name.clone(),
            key: Key::new(&pk.column, key.clone()),
            values: row,
        };
        let count = session.exec(update).await?.rows.into_count()?;

        if count == 0 {
            return Err(not_found(&descriptor, &key));
        }
        key
    };

    for rel in &descriptor.one_to_many {
        save_children(session, &descriptor, rel, entity, &key, is_new).await?;
    }

    for rel in &descriptor.many_to_many {
        save_joined(session, &descriptor, rel, entity, &key, is_new).await?;
    }

    Ok(())
}

/// Foreign key value for a many-to-one.
async fn save_reference(
    session: &Arc<Session>,
    owner: &MappingDescriptor,
    rel: &ManyToOne,
    entity: &mut dyn Entity,
) -> Result<Value> {
    let target = session.descriptor(&rel.target)?;
    let relation = entity
        .relation_mut(&rel.attribute)
        .ok_or_else(|| missing_relation(&owner.class_name, &rel.attribute))?;

    match relation.pending() {
        Pending::Linked(link) => Ok(link.foreign_key().clone()),
        Pending::One(None) => Ok(Value::Null),
        Pending::One(Some(slot)) => save_target(session, target, slot).await,
        Pending::Many(_) => bail!(
            "{}.{} is many-to-one but holds a collection",
            owner.class_name,
            rel.attribute
        ),
    }
}

/// Key of an associated object, saving the object first when it has none.
async fn save_target(
    session: &Arc<Session>,
    target: Arc<MappingDescriptor>,
    slot: &mut dyn EntitySlot,
) -> Result<Value> {
    let key = slot
        .entity()
        .get_attribute(&target.primary_key.attribute)
        .unwrap_or_default();

    if !key.is_null() {
        return Ok(key);
    }

    let Some(entity) = slot.entity_mut() else {
        return Err(shared_new_object(&target));
    };

    save_entity(session, target.clone(), entity, Row::new()).await?;

    Ok(entity
        .get_attribute(&target.primary_key.attribute)
        .unwrap_or_default())
}

/// Points every child of a one-to-many at the owner, then applies the
/// orphan policy to stored children missing from the collection.
async fn save_children(
    session: &Arc<Session>,
    owner: &MappingDescriptor,
    rel: &OneToMany,
    entity: &mut dyn Entity,
    owner_key: &Value,
    is_new: bool,
) -> Result<()> {
    let target = session.descriptor(&rel.target)?;
    let relation = entity
        .relation_mut(&rel.attribute)
        .ok_or_else(|| missing_relation(&owner.class_name, &rel.attribute))?;

    // Untouched since load
    let Pending::Many(children) = relation.pending() else {
        return Ok(());
    };

    let target_pk = &target.primary_key;
    let mut current = HashSet::new();

    for child in children {
        let inverse = Row::new().with(rel.inverse_column.as_str(), owner_key.clone());
        let stored_key = child
            .entity()
            .get_attribute(&target_pk.attribute)
            .unwrap_or_default();

        let key = match child.entity_mut() {
            Some(child) => {
                save_entity(session, target.clone(), child, inverse).await?;
                child.get_attribute(&target_pk.attribute).unwrap_or_default()
            }
            // A shared, stored child only moves under the owner
            None if !stored_key.is_null() => {
                let update = Update {
                    table: target.table_name.clone(),
                    key: Key::new(&target_pk.column, stored_key.clone()),
                    values: inverse,
                };
                session.exec(update).await?;
                stored_key
            }
            None => return Err(shared_new_object(&target)),
        };

        current.insert(KeyRepr::new(&key)?);
    }

    let policy = session.engine().config.orphans;
    if is_new || policy == OrphanPolicy::Retain {
        return Ok(());
    }

    let mut query = Query::new(&target.table_name)
        .filter(Predicate::equals(&rel.inverse_column, owner_key.clone()));
    query.projection = Some(vec![target_pk.column.clone()]);

    for mut row in session.exec(query).await?.rows.into_values()? {
        let key = row.take(&target_pk.column);
        if current.contains(&KeyRepr::new(&key)?) {
            continue;
        }

        let key = Key::new(&target_pk.column, key);
        if policy == OrphanPolicy::Detach {
            session
                .exec(Update {
                    table: target.table_name.clone(),
                    key,
                    values: Row::new().with(rel.inverse_column.as_str(), Value::Null),
                })
                .await?;
        } else {
            session
                .exec(Delete {
                    table: target.table_name.clone(),
                    key,
                })
                .await?;
        }
    }

    Ok(())
}

/// Replaces the owner's join rows with one row per collection entry.
async fn save_joined(
    session: &Arc<Session>,
    owner: &MappingDescriptor,
    rel: &ManyToMany,
    entity: &mut dyn Entity,
    owner_key: &Value,
    is_new: bool,
) -> Result<()> {
    let target = session.descriptor(&rel.target)?;
    let relation = entity
        .relation_mut(&rel.attribute)
        .ok_or_else(|| missing_relation(&owner.class_name, &rel.attribute))?;

    let Pending::Many(items) = relation.pending() else {
        return Ok(());
    };

    let mut keys = Vec::with_capacity(items.len());
    for item in items {
        keys.push(save_target(session, target.clone(), item).await?);
    }

    if !is_new {
        session
            .exec(Delete {
                table: rel.join_table.clone(),
                key: Key::new(&rel.origin_column, owner_key.clone()),
            })
            .await?;
    }

    for key in keys {
        let values = Row::new()
            .with(rel.origin_column.as_str(), owner_key.clone())
            .with(rel.target_column.as_str(), key);

        session
            .exec(Insert {
                table: rel.join_table.clone(),
                key_column: None,
                values,
            })
            .await?;
    }

    Ok(())
}

/// Scalar and component columns of `entity`.
fn write_fields(descriptor: &MappingDescriptor, entity: &dyn Entity, row: &mut Row) -> Result<()> {
    for field in &descriptor.fields {
        let value = entity.get_attribute(&field.attribute).unwrap_or_default();
        check_type(&descriptor.class_name, field, &value)?;
        row.insert(field.column.as_str(), value);
    }

    for component in &descriptor.components {
        let record = entity
            .get_attribute(&component.attribute)
            .unwrap_or_default()
            .to_record()?;
        let label = format!("{}.{}", descriptor.class_name, component.attribute);
        flatten_component(&label, component, record, row)?;
    }

    Ok(())
}

fn flatten_component(
    label: &str,
    component: &ComponentBinding,
    mut record: Record,
    row: &mut Row,
) -> Result<()> {
    for field in &component.fields {
        let value = record.take(&field.attribute);
        check_type(label, field, &value)?;
        row.insert(field.column.as_str(), value);
    }

    for nested in &component.components {
        let nested_record = record.take(&nested.attribute).to_record()?;
        let label = format!("{label}.{}", nested.attribute);
        flatten_component(&label, nested, nested_record, row)?;
    }

    Ok(())
}

fn check_type(owner: &str, field: &FieldBinding, value: &Value) -> Result<()> {
    if value.is_a(&field.ty) {
        return Ok(());
    }

    Err(Error::type_conversion(value.clone(), field.ty.name())
        .context(err!("{owner}.{} is mapped as {}", field.attribute, field.ty)))
}

fn not_found(descriptor: &MappingDescriptor, key: &Value) -> Error {
    Error::not_found(format!("{} with key {key:?}", descriptor.class_name))
}

fn shared_new_object(target: &MappingDescriptor) -> Error {
    Error::invalid_entity_state(
        &target.class_name,
        "a new object must be held by a single association until it is saved",
    )
}
