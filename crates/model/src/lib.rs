pub mod env;
pub mod record;

pub use record::{Record, RecordError};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
