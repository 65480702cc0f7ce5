/// Pairs of owner and target keys held in a join table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManyToMany {
    pub attribute: String,

    pub target: String,

    pub join_table: String,

    /// Join table column holding the owner's key
    pub origin_column: String,

    /// Join table column holding the target's key
    pub target_column: String,

    pub lazy: bool,
}
