//! Durable CSV record of services and their per-run outcomes.
//!
//! The file layout is `service_name,host,port,<run>,<run>,...`: every run
//! appends one column keyed by its timestamp and the whole file is rewritten
//! on save.

mod error;
mod load;
mod merge;
mod models;
mod save;

pub use error::StoreError;
pub use load::{load, load_from_reader};
pub use models::{ServiceSet, FIXED_COLUMNS};
pub use save::{save, save_to_writer};
