pub mod options;

pub use options::{BRUTAL_ENV, IGNORED_ADAPTERS_ENV, InspectOptions};
