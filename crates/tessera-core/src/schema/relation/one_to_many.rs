/// The owner has no column; each target row holds a back-reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneToMany {
    pub attribute: String,

    pub target: String,

    /// Column of the target's table holding the owner's key
    pub inverse_column: String,

    pub lazy: bool,
}
