//! Default naming conventions.

/// Table of a class without an explicit table name.
pub fn table(class: &str) -> String {
    class.to_string()
}

/// Column of an attribute without an explicit column name.
pub fn column(attribute: &str) -> String {
    attribute.to_string()
}

/// Column of a component field: `<prefix>_<attribute>`.
pub fn component_column(prefix: &str, attribute: &str) -> String {
    format!("{prefix}_{attribute}")
}

/// Many-to-one foreign key: `<attribute>_id`.
pub fn foreign_key(attribute: &str) -> String {
    format!("{attribute}_id")
}

/// One-to-many inverse column: `<owner class lowercased>_id`.
pub fn inverse_column(owner: &str) -> String {
    format!("{}_id", owner.to_lowercase())
}

/// Many-to-many join table: `<Owner>_<Target>`.
pub fn join_table(owner: &str, target: &str) -> String {
    format!("{owner}_{target}")
}

/// Many-to-many join column of a class: `<Class>_id`.
pub fn join_column(class: &str) -> String {
    format!("{class}_id")
}
