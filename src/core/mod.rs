//! Core business logic: projection and ordering of market data

pub mod asset;
pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod projector;
pub mod source;
pub mod view;

// Re-export main types for cleaner imports
pub use asset::{FlatAssetRecord, RawAssetRecord};
pub use currency::{Currency, CurrencyKind};
pub use error::ViewError;
pub use source::{DatasetSnapshot, DatasetSource};
pub use view::{SortColumn, SortDirection, SortState, ViewStore};
