use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::IntoParams;

use crate::models::{
    FilterDescriptor, FilterGroup, FilterOperator, QueryState, SortDescriptor, SortDirection,
};

/// Longest suffixes first so `_gte` wins over `_gt`.
const OPERATOR_SUFFIXES: &[&str] = &[
    "_nlike", "_starts", "_like", "_ends", "_gte", "_lte", "_neq", "_gt", "_lt",
];

/// Query parameters for a grid endpoint.
///
/// # Filtering
/// The `filter` parameter is JSON in one of two shapes:
/// - **Descriptor list:** an array of filter descriptors, for example:
///   ```json
///   [{"field": "status", "operator": "Equals", "value": "Open"}]
///   ```
/// - **Object form:** field/value pairs, all combined with AND. `"q"` is free-text
///   search, a `null` value matches missing values, an array matches any of its
///   items, and a suffix selects the operator (`_gte`, `_lte`, `_gt`, `_lt`,
///   `_neq`, `_like`, `_nlike`, `_starts`, `_ends`), for example:
///   ```json
///   {"q": "printer", "priority_gte": 3, "status": ["Open", "InProgress"]}
///   ```
///
/// # Pagination
/// - **Standard REST format:** `page=1&per_page=10`
/// - **React Admin format:** `range=[0,9]`
///
/// # Sorting
/// - **Standard REST format:** `sort_by=title&order=DESC`
/// - **React Admin format:** `sort=["title","DESC"]`
/// - **Comma list:** `sort=priority_desc,title`
/// - **Descriptor list:** `sort=[{"field":"title","direction":"Descending"}]`
///
/// Malformed parts are logged and ignored; they never reject the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GridParams {
    /// JSON-encoded filters.
    #[param(example = json!({"status": "Open", "priority_gte": 3}))]
    pub filter: Option<String>,
    /// JSON-encoded list of filter groups, for OR logic.
    #[param(example = r#"[{"logic":"Or","filters":[{"field":"status","operator":"Equals","value":"Open"}]}]"#)]
    pub groups: Option<String>,
    /// Free-text search across string fields.
    #[param(example = "printer")]
    pub q: Option<String>,
    /// Sort order, see the type docs for accepted formats.
    #[param(example = r#"["created_at", "DESC"]"#)]
    pub sort: Option<String>,
    /// Sort column for standard REST format.
    #[param(example = "title")]
    pub sort_by: Option<String>,
    /// Sort order for standard REST format (ASC or DESC).
    #[param(example = "ASC")]
    pub order: Option<String>,
    /// Page number for standard REST pagination (1-based).
    #[param(example = 1)]
    pub page: Option<i64>,
    /// Number of items per page for standard REST pagination.
    #[param(example = 10)]
    pub per_page: Option<i64>,
    /// Inclusive range for React Admin pagination, e.g. `[0,9]`.
    #[param(example = "[0,9]")]
    pub range: Option<String>,
}

impl GridParams {
    /// Convert to a [`QueryState`]. Never fails: malformed parts are dropped.
    #[must_use]
    pub fn to_state(&self) -> QueryState {
        let mut state = QueryState::new();

        if let Some(filter) = self.filter.as_deref() {
            parse_filter(filter, &mut state);
        }
        if let Some(groups) = self.groups.as_deref() {
            match serde_json::from_str::<Vec<FilterGroup>>(groups) {
                Ok(groups) => state.groups.extend(groups),
                Err(e) => tracing::warn!(error = %e, "Ignoring malformed groups parameter"),
            }
        }
        if let Some(q) = self.q.as_deref().filter(|q| !q.trim().is_empty()) {
            state.search_query = Some(q.to_owned());
        }

        state.sorts = self.parse_sorts();
        self.apply_page(state)
    }

    fn parse_sorts(&self) -> Vec<SortDescriptor> {
        let direction = || {
            self.order
                .as_deref()
                .map_or(SortDirection::Ascending, SortDirection::parse)
        };

        if let Some(sort_by) = self.sort_by.as_deref().filter(|s| !s.trim().is_empty()) {
            return vec![SortDescriptor::new(sort_by.trim(), direction(), 0)];
        }
        let Some(sort) = self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Vec::new();
        };

        if sort.starts_with('[') {
            return parse_json_sort(sort);
        }
        if !sort.contains(',') && self.order.is_some() {
            return vec![SortDescriptor::new(sort, direction(), 0)];
        }
        parse_sort_list(sort)
    }

    /// `page`/`per_page` win over `range`; missing parts keep the state's defaults.
    fn apply_page(&self, state: QueryState) -> QueryState {
        if self.page.is_some() || self.per_page.is_some() {
            let page = self.page.unwrap_or(state.current_page);
            let page_size = self.per_page.unwrap_or(state.page_size);
            return state.page(page, page_size);
        }
        let Some(range) = self.range.as_deref() else {
            return state;
        };
        match serde_json::from_str::<[u64; 2]>(range) {
            Ok([start, end]) => state.range(start, end),
            Err(e) => {
                tracing::warn!(error = %e, range, "Ignoring malformed range parameter");
                state
            }
        }
    }
}

fn parse_filter(filter: &str, state: &mut QueryState) {
    match serde_json::from_str::<Value>(filter) {
        Ok(Value::Array(items)) => {
            for item in items {
                match serde_json::from_value::<FilterDescriptor>(item) {
                    Ok(descriptor) => state.filters.push(descriptor),
                    Err(e) => tracing::warn!(error = %e, "Ignoring malformed filter descriptor"),
                }
            }
        }
        Ok(Value::Object(map)) => parse_filter_object(map, state),
        Ok(other) => tracing::warn!(filter = %other, "Ignoring filter parameter that is neither a list nor an object"),
        Err(e) => tracing::warn!(error = %e, "Ignoring malformed filter parameter"),
    }
}

fn parse_filter_object(map: Map<String, Value>, state: &mut QueryState) {
    for (key, value) in map {
        if key == "q" {
            match value {
                Value::String(q) if !q.trim().is_empty() => state.search_query = Some(q),
                _ => tracing::debug!("Ignoring non-text search value in filter"),
            }
            continue;
        }

        let (field, operator) = split_operator_suffix(&key);
        match value {
            Value::Null => state.filters.push(FilterDescriptor::null_check(field, true)),
            Value::Array(items) => {
                let members = items
                    .into_iter()
                    .map(|item| FilterDescriptor::new(field, operator, item))
                    .collect();
                state.groups.push(FilterGroup::any(members));
            }
            Value::Object(_) => {
                tracing::debug!(field, "Ignoring object-valued filter");
            }
            scalar => state.filters.push(FilterDescriptor::new(field, operator, scalar)),
        }
    }
}

/// Split `priority_gte` into (`priority`, `GreaterThanOrEqual`). Keys without a
/// known suffix are equality filters.
fn split_operator_suffix(key: &str) -> (&str, FilterOperator) {
    OPERATOR_SUFFIXES
        .iter()
        .find_map(|suffix| {
            let field = key.strip_suffix(suffix)?;
            let operator = FilterOperator::from_suffix(suffix)?;
            (!field.is_empty()).then_some((field, operator))
        })
        .unwrap_or((key, FilterOperator::Equals))
}

/// `["col","DESC"]` or a list of sort descriptors.
fn parse_json_sort(sort: &str) -> Vec<SortDescriptor> {
    if let Ok(descriptors) = serde_json::from_str::<Vec<SortDescriptor>>(sort) {
        return descriptors;
    }
    match serde_json::from_str::<Vec<String>>(sort) {
        Ok(pair) => match pair.as_slice() {
            [column] => vec![SortDescriptor::ascending(column.as_str())],
            [column, order, ..] => vec![SortDescriptor::new(
                column.as_str(),
                SortDirection::parse(order),
                0,
            )],
            [] => Vec::new(),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed sort parameter");
            Vec::new()
        }
    }
}

/// `created_at_desc,priority_asc,title`; priorities follow list order.
fn parse_sort_list(sort: &str) -> Vec<SortDescriptor> {
    sort.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .zip(0..)
        .map(|(token, priority)| {
            if let Some(field) = token.strip_suffix("_desc") {
                SortDescriptor::new(field, SortDirection::Descending, priority)
            } else if let Some(field) = token.strip_suffix("_asc") {
                SortDescriptor::new(field, SortDirection::Ascending, priority)
            } else {
                SortDescriptor::new(token, SortDirection::Ascending, priority)
            }
        })
        .collect()
}
