//! # State Translator
//!
//! Applies a [`QueryState`] to a query in a fixed order: filters, then search, then
//! sort, then pagination. The count path applies filters and search only, so the
//! total reflects every matching record rather than the current page.
//!
//! Any query type implementing [`GridQuery`] can be translated. The crate ships
//! two: [`MemoryQuery`](crate::memory::MemoryQuery) over borrowed slices, and
//! Sea-ORM's `Select<E>` for entities whose model implements
//! [`GridRecord`].
//!
//! ```rust,ignore
//! let state = QueryState::new()
//!     .filter(FilterDescriptor::new("status", FilterOperator::Equals, "Open"))
//!     .sort(SortDescriptor::descending("created_at"))
//!     .page(2, 10);
//!
//! let translator = QueryTranslator::default();
//! let total = translator.total_count(MemoryQuery::from_slice(&tickets), Some(&state));
//! let rows = translator.apply_state(MemoryQuery::from_slice(&tickets), Some(&state));
//! ```

use crate::{
    config::GridConfig,
    core::GridRecord,
    filtering::{
        PageWindow, Predicate, SortKey, build_search_predicate_with, build_state_predicate,
        resolve_sort_keys,
    },
    models::{FilterDescriptor, FilterGroup, QueryState, SortDescriptor},
};

/// A query the translator can narrow, order and window.
///
/// Each method consumes the query and returns the refined one. Implementations
/// must not reorder records in `filter` or `window`.
pub trait GridQuery: Sized {
    type Record: GridRecord;

    /// Keep only records matching `predicate`.
    #[must_use]
    fn filter(self, predicate: &Predicate) -> Self;

    /// Order by `keys`, first key primary. `keys` is never empty.
    #[must_use]
    fn order_by(self, keys: &[SortKey]) -> Self;

    /// Skip `window.offset` records and keep at most `window.limit`.
    #[must_use]
    fn window(self, window: PageWindow) -> Self;
}

/// A [`GridQuery`] that can count its records without a round trip.
pub trait CountableQuery: GridQuery {
    fn count(&self) -> u64;
}

/// Translates grid state into queries, using one [`GridConfig`].
#[derive(Debug, Clone, Default)]
pub struct QueryTranslator {
    config: GridConfig,
}

impl QueryTranslator {
    #[must_use]
    pub const fn new(config: GridConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    /// AND of every filter and group that builds. Dropped ones are skipped.
    #[must_use]
    pub fn apply_filters<Q: GridQuery>(
        &self,
        query: Q,
        filters: &[FilterDescriptor],
        groups: &[FilterGroup],
    ) -> Q {
        match build_state_predicate::<Q::Record>(filters, groups, &self.config) {
            Some(predicate) => query.filter(&predicate),
            None => query,
        }
    }

    #[must_use]
    pub fn apply_search<Q: GridQuery>(&self, query: Q, search: Option<&str>) -> Q {
        match search.and_then(|text| build_search_predicate_with::<Q::Record>(text, &self.config)) {
            Some(predicate) => query.filter(&predicate),
            None => query,
        }
    }

    /// Order by the resolvable sorts. Returns the query untouched when none resolve.
    #[must_use]
    pub fn apply_sort<Q: GridQuery>(&self, query: Q, sorts: &[SortDescriptor]) -> Q {
        let keys = resolve_sort_keys::<Q::Record>(sorts);
        if keys.is_empty() {
            query
        } else {
            query.order_by(&keys)
        }
    }

    #[must_use]
    pub fn apply_pagination<Q: GridQuery>(&self, query: Q, page: i64, page_size: i64) -> Q {
        query.window(self.page_window(page, page_size))
    }

    #[must_use]
    pub fn page_window(&self, page: i64, page_size: i64) -> PageWindow {
        PageWindow::new(page, page_size, &self.config)
    }

    /// The window a state asks for: its `offset` when set, otherwise its page.
    #[must_use]
    pub fn state_window(&self, state: &QueryState) -> PageWindow {
        match state.offset {
            Some(offset) => PageWindow::at_offset(offset, state.page_size, &self.config),
            None => self.page_window(state.current_page, state.page_size),
        }
    }

    /// Filters, search, sort, then pagination. `None` returns the query unchanged.
    #[must_use]
    pub fn apply_state<Q: GridQuery>(&self, query: Q, state: Option<&QueryState>) -> Q {
        let Some(state) = state else {
            return query;
        };
        let query = self.apply_count_filters(query, state);
        let query = self.apply_sort(query, &state.sorts);
        query.window(self.state_window(state))
    }

    /// Filters and search only: the query whose size is the grid's total.
    #[must_use]
    pub fn count_query<Q: GridQuery>(&self, query: Q, state: Option<&QueryState>) -> Q {
        match state {
            Some(state) => self.apply_count_filters(query, state),
            None => query,
        }
    }

    /// Number of records matching filters and search, ignoring pagination.
    #[must_use]
    pub fn total_count<Q: CountableQuery>(&self, query: Q, state: Option<&QueryState>) -> u64 {
        self.count_query(query, state).count()
    }

    fn apply_count_filters<Q: GridQuery>(&self, query: Q, state: &QueryState) -> Q {
        let query = self.apply_filters(query, &state.filters, &state.groups);
        self.apply_search(query, state.search_query.as_deref())
    }
}

/// [`QueryTranslator::apply_state`] with the default configuration.
#[must_use]
pub fn apply_state<Q: GridQuery>(query: Q, state: Option<&QueryState>) -> Q {
    QueryTranslator::default().apply_state(query, state)
}

/// [`QueryTranslator::total_count`] with the default configuration.
#[must_use]
pub fn total_count<Q: CountableQuery>(query: Q, state: Option<&QueryState>) -> u64 {
    QueryTranslator::default().total_count(query, state)
}
