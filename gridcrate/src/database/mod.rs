//! Sea-ORM backend.
//!
//! Predicates become `Condition`s on the entity's columns, sort keys become
//! `ORDER BY` clauses and the page window becomes `LIMIT`/`OFFSET`. Fields map to
//! columns by name; nested record paths have no column and are skipped.

pub mod conditions;
pub mod select;

pub use conditions::{ConditionBuilder, build_condition, resolve_column};
pub use select::{load_page, total_count_db};
