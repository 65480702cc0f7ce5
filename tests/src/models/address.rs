use tessera::{stmt::Record, Result, Value};

/// Embedded in `User`, stored in the `address_*` columns.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
}

impl Address {
    pub fn new(street: &str, city: &str) -> Self {
        Self {
            street: street.to_string(),
            city: city.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        Record::new()
            .with("street", self.street.as_str())
            .with("city", self.city.as_str())
            .into()
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let mut record = value.to_record()?;
        Ok(Self {
            street: record.take("street").to_option_string()?.unwrap_or_default(),
            city: record.take("city").to_option_string()?.unwrap_or_default(),
        })
    }
}
