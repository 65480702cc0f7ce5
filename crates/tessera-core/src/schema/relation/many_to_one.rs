/// The owning side holds a foreign key to the target's primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManyToOne {
    pub attribute: String,

    /// Column of the owner's table holding the target key
    pub foreign_key: String,

    /// Target class. Stored by name so that cyclic classes resolve.
    pub target: String,

    pub lazy: bool,
}
