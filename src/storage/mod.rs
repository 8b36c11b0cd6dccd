mod fs;
mod store;

pub use store::*;

/// Location of the data file relative to the install root.
pub const DEFAULT_DATA_FILE: &str = "data/transactions.json";
