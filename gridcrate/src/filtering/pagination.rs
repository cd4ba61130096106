use axum::http::header::HeaderMap;

use crate::config::GridConfig;

/// A clamped offset/limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page after clamping.
    pub page: u64,
    pub page_size: u64,
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Clamp a requested page and page size.
    ///
    /// A page below 1 becomes 1. A size below 1 becomes the configured default, and
    /// sizes are capped by `max_page_size` when set. The offset saturates instead of
    /// overflowing, so an absurd page simply lands past the end.
    #[must_use]
    pub fn new(page: i64, page_size: i64, config: &GridConfig) -> Self {
        let page = u64::try_from(page).ok().filter(|p| *p >= 1).unwrap_or(1);
        let page_size = config.effective_page_size(page_size);
        Self {
            page,
            page_size,
            offset: (page - 1).saturating_mul(page_size),
            limit: page_size,
        }
    }

    /// Window starting at row `offset`, clamping the size like [`PageWindow::new`].
    /// `page` reports the page the offset falls on.
    #[must_use]
    pub fn at_offset(offset: u64, page_size: i64, config: &GridConfig) -> Self {
        let page_size = config.effective_page_size(page_size);
        Self {
            page: offset / page_size + 1,
            page_size,
            offset,
            limit: page_size,
        }
    }

    /// Window from a React Admin style inclusive `[start, end]` range.
    #[must_use]
    pub fn from_range(start: u64, end: u64, config: &GridConfig) -> Self {
        let requested = end.saturating_sub(start).saturating_add(1);
        Self::at_offset(start, i64::try_from(requested).unwrap_or(i64::MAX), config)
    }
}

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect()
}

/// Build the `Content-Range` header for a page, e.g. `tickets 0-9/25`.
///
/// The resource name is stripped of non-ASCII and control characters so it
/// always forms a valid header value.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    limit: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let last = offset
        .saturating_add(limit)
        .saturating_sub(1)
        .min(total_count.saturating_sub(1))
        .max(offset.min(total_count));

    let safe_name = sanitize_resource_name(resource_name);
    let content_range = format!("{safe_name} {offset}-{last}/{total_count}");

    let mut headers = HeaderMap::new();
    if let Ok(value) = content_range.parse() {
        headers.insert("Content-Range", value);
    } else {
        tracing::debug!(resource = %safe_name, "Falling back to generic Content-Range unit");
        if let Ok(value) = format!("items {offset}-{last}/{total_count}").parse() {
            headers.insert("Content-Range", value);
        }
    }
    headers
}
