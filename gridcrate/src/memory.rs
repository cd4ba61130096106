//! In-memory backend: grid queries over borrowed slices.
//!
//! Predicates are compiled once into closures over the record's field getters, then
//! run over the rows. Sorting is stable and reads each sort value once per row.

use std::cmp::Ordering;

use crate::{
    core::{FieldValue, GridRecord, Getter},
    filtering::{CompareOp, PageWindow, Predicate, PredicateVisitor, SortKey, TextOp},
    models::{GridPage, QueryState},
    translator::{CountableQuery, GridQuery, QueryTranslator},
};

/// Compiled predicate over one record.
pub type Matcher<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// Borrowed rows, in their current order.
#[derive(Debug)]
pub struct MemoryQuery<'a, R> {
    rows: Vec<&'a R>,
}

impl<R> Clone for MemoryQuery<'_, R> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

impl<'a, R: GridRecord> MemoryQuery<'a, R> {
    #[must_use]
    pub fn from_slice(rows: &'a [R]) -> Self {
        Self {
            rows: rows.iter().collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a R> + '_ {
        self.rows.iter().copied()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<&'a R> {
        self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total, then the requested page, with the default configuration.
    #[must_use]
    pub fn load_page(self, state: Option<&QueryState>) -> GridPage<&'a R> {
        self.load_page_with(&QueryTranslator::default(), state)
    }

    /// Total, then the requested page. Without a state every row is one page.
    #[must_use]
    pub fn load_page_with(
        self,
        translator: &QueryTranslator,
        state: Option<&QueryState>,
    ) -> GridPage<&'a R> {
        let Some(state) = state else {
            let total = self.count();
            return GridPage::new(self.rows, total, 1, total.max(1));
        };
        let matching = translator.count_query(self, Some(state));
        let total = matching.count();
        let window = translator.state_window(state);
        let rows = translator.apply_sort(matching, &state.sorts).window(window);
        GridPage::new(rows.rows, total, window.page, window.page_size)
    }
}

impl<'a, R> IntoIterator for MemoryQuery<'a, R> {
    type Item = &'a R;
    type IntoIter = std::vec::IntoIter<&'a R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<R: GridRecord> GridQuery for MemoryQuery<'_, R> {
    type Record = R;

    fn filter(mut self, predicate: &Predicate) -> Self {
        if let Some(matcher) = compile_predicate::<R>(predicate) {
            self.rows.retain(|row| matcher(*row));
        }
        self
    }

    fn order_by(mut self, keys: &[SortKey]) -> Self {
        let registry = R::field_registry();
        let columns: Vec<(Getter<R>, bool)> = keys
            .iter()
            .filter_map(|key| {
                registry
                    .resolve(&key.field)
                    .map(|def| (def.getter(), key.descending()))
            })
            .collect();
        if columns.is_empty() {
            return self;
        }

        let mut decorated: Vec<(Vec<FieldValue>, &R)> = self
            .rows
            .into_iter()
            .map(|row| (columns.iter().map(|(get, _)| get(row)).collect(), row))
            .collect();

        // `sort_by` is stable, so rows equal on every key keep their order.
        decorated.sort_by(|(a, _), (b, _)| {
            a.iter()
                .zip(b)
                .zip(&columns)
                .map(|((a, b), (_, descending))| {
                    let ordering = a.sort_cmp(b);
                    if *descending { ordering.reverse() } else { ordering }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        self.rows = decorated.into_iter().map(|(_, row)| row).collect();
        self
    }

    fn window(self, window: PageWindow) -> Self {
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        Self {
            rows: self.rows.into_iter().skip(offset).take(limit).collect(),
        }
    }
}

impl<R: GridRecord> CountableQuery for MemoryQuery<'_, R> {
    fn count(&self) -> u64 {
        self.rows.len() as u64
    }
}

/// Compile a predicate for record type `R`.
///
/// Returns `None` when nothing in the tree applies, e.g. it only names fields `R`
/// does not have; such parts are skipped rather than matching nothing.
#[must_use]
pub fn compile_predicate<R: GridRecord>(predicate: &Predicate) -> Option<Matcher<R>> {
    predicate.accept(&mut ClosureCompiler::<R>::new())
}

/// Turns a [`Predicate`] into a [`Matcher`].
pub struct ClosureCompiler<R> {
    _record: std::marker::PhantomData<fn(&R)>,
}

impl<R: GridRecord> ClosureCompiler<R> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _record: std::marker::PhantomData,
        }
    }

    fn getter(field: &str) -> Option<Getter<R>> {
        let getter = R::field_registry().resolve(field).map(|def| def.getter());
        if getter.is_none() {
            tracing::debug!(field, "Skipping predicate on unknown field");
        }
        getter
    }
}

impl<R: GridRecord> Default for ClosureCompiler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: GridRecord> PredicateVisitor for ClosureCompiler<R> {
    type Output = Option<Matcher<R>>;

    fn visit_constant(&mut self, value: bool) -> Self::Output {
        Some(Box::new(move |_: &R| value))
    }

    fn visit_compare(&mut self, field: &str, op: CompareOp, value: &FieldValue) -> Self::Output {
        let get = Self::getter(field)?;
        let target = value.clone();
        Some(Box::new(move |row: &R| {
            get(row)
                .compare(&target)
                .is_some_and(|ordering| op.matches(ordering))
        }))
    }

    fn visit_text(
        &mut self,
        field: &str,
        op: TextOp,
        value: &str,
        case_sensitive: bool,
    ) -> Self::Output {
        let get = Self::getter(field)?;
        let needle = if case_sensitive {
            value.to_owned()
        } else {
            value.to_lowercase()
        };
        Some(Box::new(move |row: &R| match get(row) {
            FieldValue::String(haystack) if case_sensitive => op.matches(&haystack, &needle),
            FieldValue::String(haystack) => op.matches(&haystack.to_lowercase(), &needle),
            _ => false,
        }))
    }

    fn visit_null(&mut self, field: &str, is_null: bool) -> Self::Output {
        let get = Self::getter(field)?;
        Some(Box::new(move |row: &R| get(row).is_null() == is_null))
    }

    fn visit_all(&mut self, parts: Vec<Self::Output>) -> Self::Output {
        let parts: Vec<Matcher<R>> = parts.into_iter().flatten().collect();
        match parts.len() {
            0 => None,
            1 => parts.into_iter().next(),
            _ => Some(Box::new(move |row: &R| parts.iter().all(|part| part(row)))),
        }
    }

    fn visit_any(&mut self, parts: Vec<Self::Output>) -> Self::Output {
        let parts: Vec<Matcher<R>> = parts.into_iter().flatten().collect();
        match parts.len() {
            0 => None,
            1 => parts.into_iter().next(),
            _ => Some(Box::new(move |row: &R| parts.iter().any(|part| part(row)))),
        }
    }
}
