//! Infrastructure layer: catalog persistence and the services built on it.

pub mod catalog_service;
pub mod catalog_store;

pub use catalog_service::{CatalogService, IngestOutcome, ScoredRecord};
pub use catalog_store::{CatalogSnapshot, CatalogStore, InMemoryCatalogStore};
