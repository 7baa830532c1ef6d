//! Catalog persistence boundary.
//!
//! The matching core only decides; stores own atomic application of those
//! decisions and surface races as `Conflict`.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryCatalogStore;
pub use r#trait::{CatalogSnapshot, CatalogStore};
