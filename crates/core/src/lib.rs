//! `stockmerge-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod concurrency;
pub mod config;
pub mod entity;
pub mod error;
pub mod id;
pub mod threshold;
pub mod value_object;

pub use concurrency::ExpectedVersion;
pub use config::{GroupingMode, MatchingConfig};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CatalogId, RecordId};
pub use threshold::Threshold;
pub use value_object::ValueObject;
