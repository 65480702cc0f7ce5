mod many_to_many;
pub use many_to_many::ManyToMany;

mod many_to_one;
pub use many_to_one::ManyToOne;

mod one_to_many;
pub use one_to_many::OneToMany;

/// Any association binding of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association<'a> {
    ManyToOne(&'a ManyToOne),
    OneToMany(&'a OneToMany),
    ManyToMany(&'a ManyToMany),
}

impl<'a> Association<'a> {
    pub fn attribute(&self) -> &'a str {
        match self {
            Association::ManyToOne(rel) => &rel.attribute,
            Association::OneToMany(rel) => &rel.attribute,
            Association::ManyToMany(rel) => &rel.attribute,
        }
    }

    pub fn target(&self) -> &'a str {
        match self {
            Association::ManyToOne(rel) => &rel.target,
            Association::OneToMany(rel) => &rel.target,
            Association::ManyToMany(rel) => &rel.target,
        }
    }
}
