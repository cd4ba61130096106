use crate::{
    core::GridRecord,
    models::{SortDescriptor, SortDirection},
};

/// A sort descriptor whose field resolved against the record's registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Canonical field path as registered.
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    #[must_use]
    pub const fn descending(&self) -> bool {
        matches!(self.direction, SortDirection::Descending)
    }
}

/// Resolve sort descriptors into ordered keys.
///
/// Unknown fields are dropped. The remaining keys are ordered by ascending
/// `priority`; equal priorities keep their input order. The first key is the
/// primary ordering and the rest break ties.
#[must_use]
pub fn resolve_sort_keys<R: GridRecord>(sorts: &[SortDescriptor]) -> Vec<SortKey> {
    let registry = R::field_registry();
    let mut resolved: Vec<(i32, SortKey)> = sorts
        .iter()
        .filter_map(|sort| {
            let Some(def) = registry.resolve(&sort.field) else {
                tracing::debug!(field = %sort.field, "Dropping sort on unknown field");
                return None;
            };
            Some((
                sort.priority,
                SortKey {
                    field: def.path().to_owned(),
                    direction: sort.direction,
                },
            ))
        })
        .collect();

    // `sort_by_key` is stable, so ties keep input order.
    resolved.sort_by_key(|(priority, _)| *priority);
    resolved.into_iter().map(|(_, key)| key).collect()
}
