pub mod filter;
pub mod leak_finder;
pub mod threshold;

pub use filter::{BUILTIN_IGNORED_MODELS, JOIN_MODEL_PREFIX, ModelFilter, SkipReason, is_join_model};
pub use leak_finder::{LeakFinder, scan};
pub use threshold::threshold_for;
