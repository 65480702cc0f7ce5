use super::User;

use tessera::{
    relation::Relation,
    schema::DeclaredAttribute,
    BelongsTo, Entity, Model, Result, Type, Value,
};
use tessera_core::bail;

/// Refers back to the `User` that refers to it.
#[derive(Debug, Default, Clone)]
pub struct Status {
    pub id: Option<i64>,
    pub label: String,
    pub user: BelongsTo<User>,
}

impl Status {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }
}

impl Entity for Status {
    fn get_attribute(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "label" => self.label.as_str().into(),
            _ => return None,
        })
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "id" => self.id = value.to_option_i64()?,
            "label" => self.label = value.to_string()?,
            _ => bail!("Status has no attribute `{name}`"),
        }
        Ok(())
    }

    fn relation_mut(&mut self, name: &str) -> Option<&mut dyn Relation> {
        match name {
            "user" => Some(&mut self.user),
            _ => None,
        }
    }
}

impl Model for Status {
    const NAME: &'static str = "Status";

    fn instantiate() -> Self {
        Self::default()
    }

    fn declared_attributes() -> Option<Vec<DeclaredAttribute>> {
        Some(vec![
            DeclaredAttribute::scalar("id", Type::Integer),
            DeclaredAttribute::scalar("label", Type::String),
            DeclaredAttribute::reference("user", "User"),
        ])
    }
}
