//! # gridcrate
//!
//! Translate data-grid state (filters, free-text search, multi-column sort and
//! pagination) into queries over your own record types, plus the matching count.
//!
//! ```rust,ignore
//! use gridcrate::{GridRecord, GridEnum, MemoryQuery, QueryState, FilterDescriptor,
//!                 FilterOperator, SortDescriptor};
//!
//! #[derive(GridEnum)]
//! enum Status { Open, Closed }
//!
//! #[derive(GridRecord)]
//! struct Ticket {
//!     title: String,
//!     status: Status,
//!     priority: i32,
//! }
//!
//! let state = QueryState::new()
//!     .filter(FilterDescriptor::new("status", FilterOperator::Equals, "Open"))
//!     .search("printer")
//!     .sort(SortDescriptor::descending("priority"))
//!     .page(1, 20);
//!
//! let page = MemoryQuery::from_slice(&tickets).load_page(Some(&state));
//! ```
//!
//! The same state drives a Sea-ORM `Select<E>` when `E::Model` derives
//! `GridRecord`; see [`QueryTranslator::load_page`].

extern crate self as gridcrate;

pub mod config;
pub mod core;
pub mod database;
pub mod errors;
pub mod filtering;
pub mod memory;
pub mod models;
pub mod translator;

#[cfg(feature = "derive")]
pub use gridcrate_derive::*; // Export the proc macros

pub use config::GridConfig;
pub use crate::core::{
    FieldDef, FieldKind, FieldRegistry, FieldRegistryBuilder, FieldValue, GridEnum, GridRecord,
    IntoFieldValue,
};
pub use errors::GridError;
pub use filtering::{GridParams, PageWindow, Predicate, SortKey, calculate_content_range};
pub use memory::MemoryQuery;
pub use models::{
    FilterDescriptor, FilterGroup, FilterLogic, FilterOperator, GridPage, QueryState,
    SortDescriptor, SortDirection,
};
pub use translator::{CountableQuery, GridQuery, QueryTranslator, apply_state, total_count};
