use tessera::{relation::Relation, schema::DeclaredAttribute, Entity, Model, Result, Type, Value};
use tessera_core::bail;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Group {
    pub id: Option<i64>,
    pub name: String,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
        }
    }
}

impl Entity for Group {
    fn get_attribute(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            _ => return None,
        })
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "id" => self.id = value.to_option_i64()?,
            "name" => self.name = value.to_string()?,
            _ => bail!("Group has no attribute `{name}`"),
        }
        Ok(())
    }

    fn relation_mut(&mut self, _name: &str) -> Option<&mut dyn Relation> {
        None
    }
}

impl Model for Group {
    const NAME: &'static str = "Group";

    fn instantiate() -> Self {
        Self::default()
    }

    fn declared_attributes() -> Option<Vec<DeclaredAttribute>> {
        Some(vec![
            DeclaredAttribute::scalar("id", Type::Integer),
            DeclaredAttribute::scalar("name", Type::String),
        ])
    }
}
