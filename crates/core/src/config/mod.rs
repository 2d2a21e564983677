//! Configuration loading and schema definitions

mod loader;
mod schema;

pub use loader::{Config, LOG_FORMATS, MAX_RESULTS_LIMIT};
pub use schema::*;
