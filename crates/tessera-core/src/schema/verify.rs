use super::{ComponentBinding, MappingDescriptor};
use crate::{Error, Result};

use std::collections::HashSet;

impl MappingDescriptor {
    /// Checks that every attribute and every column of the owner's table is
    /// bound once.
    pub fn verify(&self) -> Result<()> {
        let mut attributes = HashSet::new();
        for attribute in self.attribute_names() {
            if !attributes.insert(attribute) {
                return Err(Error::duplicate_attribute_binding(&self.class_name, attribute));
            }
        }

        for component in &self.components {
            verify_component(&self.class_name, component)?;
        }

        let mut columns = HashSet::new();
        for column in self.columns() {
            if !columns.insert(column) {
                return Err(Error::duplicate_column_binding(&self.class_name, column));
            }
        }

        Ok(())
    }
}

fn verify_component(class: &str, component: &ComponentBinding) -> Result<()> {
    let label = format!("{class}.{}", component.attribute);
    let mut attributes = HashSet::new();

    let names = component
        .fields
        .iter()
        .map(|field| field.attribute.as_str())
        .chain(component.components.iter().map(|c| c.attribute.as_str()));

    for attribute in names {
        if !attributes.insert(attribute) {
            return Err(Error::duplicate_attribute_binding(&label, attribute));
        }
    }

    for nested in &component.components {
        verify_component(&label, nested)?;
    }

    Ok(())
}
