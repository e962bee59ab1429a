pub mod plumber;
pub mod session;

pub use plumber::{BRUTAL_EXIT_CODE, Inspection, Plumber};
pub use session::{SessionContext, SessionSlot};
