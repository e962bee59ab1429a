pub mod leak;

pub use leak::LeakReport;
