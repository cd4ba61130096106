//! # Filtering, Search, Sorting & Pagination
//!
//! This module turns the declarative parts of a [`QueryState`](crate::QueryState) into
//! backend-neutral building blocks. Nothing here touches a collection or a database:
//! the backends in [`memory`](crate::memory) and [`database`](crate::database) consume
//! what these builders produce.
//!
//! ## Main Components
//!
//! - **[`build_filter_predicate`]**: one [`FilterDescriptor`](crate::FilterDescriptor)
//!   to a [`Predicate`], with type coercion and null semantics
//! - **[`build_group_predicate`]**: AND/OR groups of filters
//! - **[`build_search_predicate`]**: free text across declared string fields
//! - **[`resolve_sort_keys`]**: priority-ordered, resolvable sort keys
//! - **[`PageWindow`]**: clamped offset/limit
//! - **[`GridParams`]**: REST query parameters to a `QueryState`
//!
//! ## Failure Model
//!
//! Every builder fails open. A filter on an unknown field, a value that does not
//! convert, or an operator that makes no sense for the field's type is dropped and
//! logged at `debug` level. The rest of the state still applies.
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Equality and comparisons
//! GET /tickets?filter={"status":"Open","priority_gte":3}
//!
//! // Substring match (case-insensitive)
//! GET /tickets?filter={"title_like":"printer"}
//!
//! // Any of several values
//! GET /tickets?filter={"status":["Open","InProgress"]}
//!
//! // Free-text search
//! GET /tickets?q=printer
//!
//! // Sorting, highest priority first, then oldest first
//! GET /tickets?sort=priority_desc,created_at_asc
//!
//! // Pagination
//! GET /tickets?page=2&per_page=25
//! GET /tickets?range=[0,9]
//! ```

pub mod coercion;
pub mod conditions;
pub mod pagination;
pub mod predicate;
pub mod query_parser;
pub mod search;
pub mod sort;

pub use coercion::coerce_value;
pub use conditions::{
    build_filter_predicate, build_filter_predicate_with, build_group_predicate,
    build_group_predicate_with, build_state_predicate,
};
pub use pagination::{PageWindow, calculate_content_range};
pub use predicate::{CompareOp, Predicate, PredicateVisitor, TextOp};
pub use query_parser::GridParams;
pub use search::{build_search_predicate, build_search_predicate_with};
pub use sort::{SortKey, resolve_sort_keys};
