pub mod error;

pub use error::{ModelError, PlumberError, Result};
