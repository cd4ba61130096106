use sea_orm::{
    ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{NullOrdering, Order},
};

use crate::{
    core::GridRecord,
    errors::GridError,
    filtering::{PageWindow, Predicate, SortKey},
    models::{GridPage, QueryState},
    translator::{GridQuery, QueryTranslator},
};

use super::conditions::{build_condition, resolve_column};

/// Largest offset handed to the database; drivers bind offsets as signed 64-bit.
const MAX_DB_OFFSET: u64 = i64::MAX.unsigned_abs();

impl<E> GridQuery for Select<E>
where
    E: EntityTrait,
    E::Model: GridRecord,
{
    type Record = E::Model;

    fn filter(self, predicate: &Predicate) -> Self {
        match build_condition::<E>(predicate) {
            Some(condition) => QueryFilter::filter(self, condition),
            None => self,
        }
    }

    /// Nulls sort first ascending and last descending, matching the in-memory order.
    fn order_by(self, keys: &[SortKey]) -> Self {
        keys.iter().fold(self, |select, key| {
            let Some(column) = resolve_column::<E>(&key.field) else {
                return select;
            };
            let (order, nulls) = if key.descending() {
                (Order::Desc, NullOrdering::Last)
            } else {
                (Order::Asc, NullOrdering::First)
            };
            select.order_by_with_nulls(column, order, nulls)
        })
    }

    fn window(self, window: PageWindow) -> Self {
        self.offset(window.offset.min(MAX_DB_OFFSET))
            .limit(window.limit.min(MAX_DB_OFFSET))
    }
}

impl QueryTranslator {
    /// Count the rows matching filters and search, ignoring sort and pagination.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] when the count query fails.
    pub async fn total_count_db<E, C>(
        &self,
        select: Select<E>,
        state: Option<&QueryState>,
        db: &C,
    ) -> Result<u64, GridError>
    where
        E: EntityTrait,
        E::Model: GridRecord + Sync,
        C: ConnectionTrait,
    {
        let total = self.count_query(select, state).count(db).await?;
        Ok(total)
    }

    /// Run the count query, then fetch the requested page.
    ///
    /// Without a state every row is fetched as a single page.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] when either query fails.
    pub async fn load_page<E, C>(
        &self,
        select: Select<E>,
        state: Option<&QueryState>,
        db: &C,
    ) -> Result<GridPage<E::Model>, GridError>
    where
        E: EntityTrait,
        E::Model: GridRecord + Sync,
        C: ConnectionTrait,
    {
        let Some(state) = state else {
            let items = select.all(db).await?;
            let total = items.len() as u64;
            return Ok(GridPage::new(items, total, 1, total.max(1)));
        };

        let matching = self.count_query(select, Some(state));
        let total = matching.clone().count(db).await?;
        let window = self.state_window(state);
        let items = self
            .apply_sort(matching, &state.sorts)
            .window(window)
            .all(db)
            .await?;

        tracing::debug!(
            total,
            page = window.page,
            page_size = window.page_size,
            returned = items.len(),
            "Loaded grid page"
        );
        Ok(GridPage::new(items, total, window.page, window.page_size))
    }
}

/// [`QueryTranslator::total_count_db`] with the default configuration.
///
/// # Errors
///
/// Returns [`GridError`] when the count query fails.
pub async fn total_count_db<E, C>(
    select: Select<E>,
    state: Option<&QueryState>,
    db: &C,
) -> Result<u64, GridError>
where
    E: EntityTrait,
    E::Model: GridRecord + Sync,
    C: ConnectionTrait,
{
    QueryTranslator::default()
        .total_count_db(select, state, db)
        .await
}

/// [`QueryTranslator::load_page`] with the default configuration.
///
/// # Errors
///
/// Returns [`GridError`] when either query fails.
pub async fn load_page<E, C>(
    select: Select<E>,
    state: Option<&QueryState>,
    db: &C,
) -> Result<GridPage<E::Model>, GridError>
where
    E: EntityTrait,
    E::Model: GridRecord + Sync,
    C: ConnectionTrait,
{
    QueryTranslator::default().load_page(select, state, db).await
}
