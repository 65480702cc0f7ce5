use super::{Address, Group, Status, Task};

use tessera::{
    relation::Relation,
    schema::{ComponentSpec, MappingSpec},
    BelongsTo, Entity, HasMany, ManyToMany, Model, Result, Type, Value,
};
use tessera_core::bail;

#[derive(Debug, Default, Clone)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub age: Option<i64>,
    pub address: Address,
    pub status: BelongsTo<Status>,
    pub tasks: HasMany<Task>,
    pub groups: ManyToMany<Group>,
}

impl User {
    pub fn new(name: &str, age: i64, address: Address) -> Self {
        Self {
            name: name.to_string(),
            age: Some(age),
            address,
            ..Self::default()
        }
    }
}

impl Entity for User {
    fn get_attribute(&self, name: &str) -> Option<Value> {
        Some(match name {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "age" => self.age.into(),
            "address" => self.address.to_value(),
            _ => return None,
        })
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "id" => self.id = value.to_option_i64()?,
            "name" => self.name = value.to_option_string()?.unwrap_or_default(),
            "age" => self.age = value.to_option_i64()?,
            "address" => self.address = Address::from_value(value)?,
            _ => bail!("User has no attribute `{name}`"),
        }
        Ok(())
    }

    fn relation_mut(&mut self, name: &str) -> Option<&mut dyn Relation> {
        match name {
            "status" => Some(&mut self.status),
            "tasks" => Some(&mut self.tasks),
            "groups" => Some(&mut self.groups),
            _ => None,
        }
    }
}

impl Model for User {
    const NAME: &'static str = "User";

    fn instantiate() -> Self {
        Self::default()
    }

    fn mapping() -> Option<MappingSpec> {
        Some(
            MappingSpec::new()
                .field(("name", Type::String))
                .field(("age", Type::Integer))
                .component(
                    ComponentSpec::new("address")
                        .field(("street", Type::String))
                        .field(("city", Type::String)),
                )
                .many_to_one("status", "Status")
                .one_to_many("tasks", "Task")
                .many_to_many("groups", "Group"),
        )
    }
}
