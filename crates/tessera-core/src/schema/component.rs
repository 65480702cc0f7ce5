use super::FieldBinding;

/// An embedded value flattened into the owner's table.
///
/// A component has no identity and no table of its own. Its field columns
/// are already prefixed (`address_city`), including those of nested
/// components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentBinding {
    pub attribute: String,

    /// Column prefix applied to fields without an explicit column
    pub prefix: String,

    pub fields: Vec<FieldBinding>,

    pub components: Vec<ComponentBinding>,
}

impl ComponentBinding {
    pub fn field(&self, attribute: &str) -> Option<&FieldBinding> {
        self.fields.iter().find(|field| field.attribute == attribute)
    }

    pub fn component(&self, attribute: &str) -> Option<&ComponentBinding> {
        self.components
            .iter()
            .find(|component| component.attribute == attribute)
    }

    /// Every column of the component, nested components included.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.fields.iter().map(|f| f.column.as_str()).collect();
        for component in &self.components {
            columns.extend(component.columns());
        }
        columns
    }
}
