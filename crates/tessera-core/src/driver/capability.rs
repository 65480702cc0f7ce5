#[derive(Debug, Clone)]
pub struct Capability {
    /// The driver accepts `Transaction` operations. When false, the engine
    /// performs writes without a surrounding transaction.
    pub transactions: bool,

    /// The store is document oriented; tables are collections and rows are
    /// documents keyed by column name.
    pub document: bool,
}

impl Capability {
    /// Capabilities of a relational store.
    pub const RELATIONAL: Self = Self {
        transactions: true,
        document: false,
    };

    /// Capabilities of a document store without multi-document transactions.
    pub const DOCUMENT: Self = Self {
        transactions: false,
        document: true,
    };
}
