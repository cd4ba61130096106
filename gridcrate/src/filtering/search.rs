use crate::{config::GridConfig, core::GridRecord};

use super::predicate::{Predicate, TextOp};

/// Build the free-text search predicate for record type `R`.
///
/// Matches a record when any declared string field contains the query, ignoring
/// case. Null fields never match. Returns `None` for an empty query or a record
/// type without string fields.
#[must_use]
pub fn build_search_predicate<R: GridRecord>(query: &str) -> Option<Predicate> {
    build_search_predicate_with::<R>(query, &GridConfig::default())
}

#[must_use]
pub fn build_search_predicate_with<R: GridRecord>(
    query: &str,
    config: &GridConfig,
) -> Option<Predicate> {
    let needle = sanitize_search_query(query, config.max_search_length)?.to_lowercase();

    let parts = R::field_registry()
        .searchable_fields()
        .map(|def| Predicate::Text {
            field: def.path().to_owned(),
            op: TextOp::Contains,
            value: needle.clone(),
            case_sensitive: false,
        })
        .collect::<Vec<_>>();

    if parts.is_empty() {
        tracing::debug!("Search ignored: record type has no string fields");
    }
    Predicate::any(parts)
}

/// Trim the query and cut it to `max_chars` characters. `None` when nothing is left.
fn sanitize_search_query(query: &str, max_chars: usize) -> Option<&str> {
    let trimmed = query.trim();
    let end = trimmed
        .char_indices()
        .nth(max_chars)
        .map_or(trimmed.len(), |(idx, _)| idx);
    let sanitized = trimmed[..end].trim_end();
    (!sanitized.is_empty()).then_some(sanitized)
}
