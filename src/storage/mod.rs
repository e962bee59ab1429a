pub mod table;
pub mod catalog;

pub use table::{MemoryModel, DEFAULT_ADAPTER};
pub use catalog::MemoryRegistry;
