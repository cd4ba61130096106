use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::DEFAULT_PAGE_SIZE;

/// Comparison operator of a [`FilterDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum FilterOperator {
    Contains,
    NotContains,
    Equals,
    NotEquals,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    IsNull,
    IsNotNull,
    Between,
}

impl FilterOperator {
    /// Operators that never look at `value`.
    #[must_use]
    pub const fn is_null_check(self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Parse a REST-style field suffix (`_gte`, `_like`, ...), as used by the
    /// object form of the `filter` query parameter.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "_gte" => Some(Self::GreaterThanOrEqual),
            "_lte" => Some(Self::LessThanOrEqual),
            "_gt" => Some(Self::GreaterThan),
            "_lt" => Some(Self::LessThan),
            "_neq" => Some(Self::NotEquals),
            "_like" => Some(Self::Contains),
            "_nlike" => Some(Self::NotContains),
            "_starts" => Some(Self::StartsWith),
            "_ends" => Some(Self::EndsWith),
            _ => None,
        }
    }
}

/// A single declarative filter on one (possibly dotted) field.
///
/// `value` and `second_value` are untyped; they are coerced to the field's type when
/// the filter is built. A filter whose `value` is null is inert unless the operator
/// is `IsNull` or `IsNotNull`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    /// Dotted path into the record, e.g. `address.city`.
    pub field: String,
    pub operator: FilterOperator,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub value: Option<serde_json::Value>,
    /// Upper bound for `Between`.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub second_value: Option<serde_json::Value>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl FilterDescriptor {
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: Some(value.into()),
            second_value: None,
            case_sensitive: false,
        }
    }

    #[must_use]
    pub fn between(
        field: impl Into<String>,
        low: impl Into<serde_json::Value>,
        high: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            second_value: Some(high.into()),
            ..Self::new(field, FilterOperator::Between, low)
        }
    }

    /// `IsNull` / `IsNotNull` filter, which carries no value.
    #[must_use]
    pub fn null_check(field: impl Into<String>, is_null: bool) -> Self {
        Self {
            field: field.into(),
            operator: if is_null {
                FilterOperator::IsNull
            } else {
                FilterOperator::IsNotNull
            },
            value: None,
            second_value: None,
            case_sensitive: false,
        }
    }

    #[must_use]
    pub const fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Whether the descriptor is skipped without inspecting the field.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        !self.operator.is_null_check()
            && self.value.as_ref().is_none_or(serde_json::Value::is_null)
    }
}

/// How the members of a [`FilterGroup`] combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FilterLogic {
    #[default]
    And,
    Or,
}

/// A boolean group of filters and sub-groups.
///
/// Top-level [`QueryState::filters`] always combine with AND; a group is how an OR
/// (or a nested AND inside an OR) is expressed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    #[serde(default)]
    pub logic: FilterLogic,
    #[serde(default)]
    pub filters: Vec<FilterDescriptor>,
    #[serde(default)]
    pub groups: Vec<FilterGroup>,
}

impl FilterGroup {
    #[must_use]
    pub fn any(filters: Vec<FilterDescriptor>) -> Self {
        Self {
            logic: FilterLogic::Or,
            filters,
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn all(filters: Vec<FilterDescriptor>) -> Self {
        Self {
            logic: FilterLogic::And,
            filters,
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: Self) -> Self {
        self.groups.push(group);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// `ASC`/`DESC` in any case; anything that isn't `ASC` sorts descending.
    #[must_use]
    pub fn parse(order: &str) -> Self {
        if order.trim().eq_ignore_ascii_case("asc") {
            Self::Ascending
        } else {
            Self::Descending
        }
    }
}

/// One sort key. Lower `priority` sorts first; equal priorities keep input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortDescriptor {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default)]
    pub priority: i32,
}

impl SortDescriptor {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection, priority: i32) -> Self {
        Self {
            field: field.into(),
            direction,
            priority,
        }
    }

    #[must_use]
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending, 0)
    }

    #[must_use]
    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending, 0)
    }
}

const fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    i64::try_from(DEFAULT_PAGE_SIZE).unwrap_or(i64::MAX)
}

/// Everything a grid asks of a query in one render cycle.
///
/// Built fresh by the caller and never mutated by the translator. `current_page`
/// and `page_size` may hold any value; they are clamped when applied. A set
/// `offset` replaces `current_page` as the start of the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    #[serde(default)]
    pub filters: Vec<FilterDescriptor>,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub groups: Vec<FilterGroup>,
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub sorts: Vec<SortDescriptor>,
    /// 1-based.
    #[serde(default = "default_page")]
    pub current_page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Row offset from a `[start, end]` range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    /// Output only; filled from the count path by the caller.
    #[serde(default)]
    pub total_items: Option<u64>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            groups: Vec::new(),
            search_query: None,
            sorts: Vec::new(),
            current_page: default_page(),
            page_size: default_page_size(),
            offset: None,
            total_items: None,
        }
    }
}

impl QueryState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: FilterDescriptor) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn group(mut self, group: FilterGroup) -> Self {
        self.groups.push(group);
        self
    }

    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortDescriptor) -> Self {
        self.sorts.push(sort);
        self
    }

    #[must_use]
    pub const fn page(mut self, current_page: i64, page_size: i64) -> Self {
        self.current_page = current_page;
        self.page_size = page_size;
        self.offset = None;
        self
    }

    /// Window over the inclusive row range `[start, end]`, which need not align
    /// with a page boundary.
    #[must_use]
    pub fn range(mut self, start: u64, end: u64) -> Self {
        let size = end.saturating_sub(start).saturating_add(1);
        self.page_size = i64::try_from(size).unwrap_or(i64::MAX);
        self.current_page = i64::try_from(start / size + 1).unwrap_or(i64::MAX);
        self.offset = Some(start);
        self
    }
}

/// One page of results plus the totals a grid needs for its pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPage<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> GridPage<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total_items: u64, page: u64, page_size: u64) -> Self {
        Self {
            items,
            total_items,
            page,
            page_size,
            total_pages: total_items.div_ceil(page_size.max(1)),
        }
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> GridPage<U> {
        GridPage {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_value_filter_is_inert() {
        let mut filter = FilterDescriptor::new("status", FilterOperator::Equals, "Open");
        assert!(!filter.is_inert());
        filter.value = Some(serde_json::Value::Null);
        assert!(filter.is_inert());
        filter.value = None;
        assert!(filter.is_inert());
        assert!(!FilterDescriptor::null_check("status", true).is_inert());
    }

    #[test]
    fn test_query_state_deserializes_with_defaults() {
        let state: QueryState = serde_json::from_value(json!({
            "filters": [{ "field": "status", "operator": "Equals", "value": "Open", "logic": "Or" }],
            "sorts": [{ "field": "createdAt", "direction": "Descending" }]
        }))
        .unwrap();
        assert_eq!(state.current_page, 1);
        assert_eq!(state.page_size, 10);
        assert_eq!(state.filters.len(), 1);
        assert!(!state.filters[0].case_sensitive);
        assert_eq!(state.sorts[0].priority, 0);
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("ASC"), SortDirection::Ascending);
        assert_eq!(SortDirection::parse("asc"), SortDirection::Ascending);
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Descending);
        assert_eq!(SortDirection::parse("random"), SortDirection::Descending);
    }

    #[test]
    fn test_grid_page_total_pages() {
        assert_eq!(GridPage::new(vec![1, 2], 25, 1, 10).total_pages, 3);
        assert_eq!(GridPage::<i32>::new(vec![], 0, 1, 10).total_pages, 0);
        assert_eq!(GridPage::<i32>::new(vec![], 20, 1, 10).total_pages, 2);
    }
}
