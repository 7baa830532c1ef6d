//! Inventory catalog domain module.
//!
//! This crate contains business rules for the inventory catalog, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage):
//! catalog records, stock movements, and the merge-or-create resolver that
//! keeps near-duplicate item names from piling up.

pub mod record;
pub mod resolver;
pub mod stock;

pub use record::{CatalogRecord, DEFAULT_UNIT, NewEntry, PendingRecord};
pub use resolver::{ResolutionDecision, resolve};
pub use stock::{StockDirection, adjust, low_stock};
