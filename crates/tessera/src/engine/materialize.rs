use super::Session;
use crate::{relation::Link, Model, Result};

use tessera_core::{
    schema::{ComponentBinding, MappingDescriptor},
    stmt::{Record, Row, Value},
    Error,
};

use std::sync::Arc;

impl Session {
    /// Turns a row of `descriptor`'s table into an object.
    ///
    /// When the identity map already holds an instance for the row's key,
    /// that instance is returned and the row is discarded. Otherwise the new
    /// instance gets its scalar and component attributes from the row and an
    /// unresolved handle per association, and is mapped before anything can
    /// resolve those handles.
    pub(crate) fn materialize<T: Model>(
        self: &Arc<Self>,
        descriptor: &Arc<MappingDescriptor>,
        mut row: Row,
    ) -> Result<Arc<T>> {
        let class = &descriptor.class_name;
        let pk = &descriptor.primary_key;
        let key = row.take(&pk.column);

        if key.is_null() {
            return Err(Error::invalid_entity_state(
                class,
                format!("row has no value for key column `{}`", pk.column),
            ));
        }

        if let Some(existing) = self.identity().get::<T>(class, &key)? {
            return Ok(existing);
        }

        let mut entity = T::instantiate();
        entity.set_attribute(&pk.attribute, key.clone())?;

        for field in &descriptor.fields {
            entity.set_attribute(&field.attribute, row.take(&field.column))?;
        }

        for component in &descriptor.components {
            let record = component_record(component, &mut row);
            entity.set_attribute(&component.attribute, Value::Record(record))?;
        }

        for rel in &descriptor.many_to_one {
            let foreign_key = row.take(&rel.foreign_key);
            self.install(&mut entity, descriptor, &rel.attribute, &key, foreign_key)?;
        }

        for rel in &descriptor.one_to_many {
            self.install(&mut entity, descriptor, &rel.attribute, &key, Value::Null)?;
        }

        for rel in &descriptor.many_to_many {
            self.install(&mut entity, descriptor, &rel.attribute, &key, Value::Null)?;
        }

        self.identity().insert(class, &key, entity)
    }

    fn install<T: Model>(
        self: &Arc<Self>,
        entity: &mut T,
        descriptor: &Arc<MappingDescriptor>,
        attribute: &str,
        owner_key: &Value,
        foreign_key: Value,
    ) -> Result<()> {
        let relation = entity
            .relation_mut(attribute)
            .ok_or_else(|| missing_relation(&descriptor.class_name, attribute))?;

        relation.install(Link {
            session: self.clone(),
            owner: descriptor.clone(),
            attribute: attribute.to_string(),
            owner_key: owner_key.clone(),
            foreign_key,
        });

        Ok(())
    }
}

pub(super) fn missing_relation(class: &str, attribute: &str) -> Error {
    Error::invalid_entity_state(
        class,
        format!("`relation_mut` returns nothing for association `{attribute}`"),
    )
}

/// Collects a component's columns from `row` into a record keyed by the
/// component's attribute names.
fn component_record(component: &ComponentBinding, row: &mut Row) -> Record {
    let mut record = Record::new();

    for field in &component.fields {
        record.insert(field.attribute.as_str(), row.take(&field.column));
    }

    for nested in &component.components {
        record.insert(nested.attribute.as_str(), component_record(nested, row));
    }

    record
}

/// A row keyed by attribute path instead of column: key and fields by
/// attribute name, component fields by dotted path, many-to-one attributes
/// by name holding the foreign key.
pub(super) fn attribute_record(descriptor: &MappingDescriptor, mut row: Row) -> Record {
    let mut record = Record::new();

    record.insert(
        descriptor.primary_key.attribute.as_str(),
        row.take(&descriptor.primary_key.column),
    );

    for field in &descriptor.fields {
        record.insert(field.attribute.as_str(), row.take(&field.column));
    }

    for component in &descriptor.components {
        flatten_paths(component, &component.attribute, &mut row, &mut record);
    }

    for rel in &descriptor.many_to_one {
        record.insert(rel.attribute.as_str(), row.take(&rel.foreign_key));
    }

    record
}

fn flatten_paths(component: &ComponentBinding, prefix: &str, row: &mut Row, record: &mut Record) {
    for field in &component.fields {
        record.insert(format!("{prefix}.{}", field.attribute), row.take(&field.column));
    }

    for nested in &component.components {
        let prefix = format!("{prefix}.{}", nested.attribute);
        flatten_paths(nested, &prefix, row, record);
    }
}
