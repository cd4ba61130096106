//! Translator configuration.
//!
//! All limits have defaults, so an empty config section is valid:
//!
//! ```rust,ignore
//! let config: GridConfig = serde_json::from_str(r#"{ "maxPageSize": 100 }"#)?;
//! let translator = QueryTranslator::new(config);
//! ```

use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_SEARCH_QUERY_LENGTH: usize = 10_000;
pub const MAX_FIELD_VALUE_LENGTH: usize = 10_000;
pub const MAX_FIELD_PATH_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Page size used when the requested size is below 1.
    pub default_page_size: u64,
    /// Upper bound applied to every page size, if set.
    pub max_page_size: Option<u64>,
    /// Search text is truncated to this many characters.
    pub max_search_length: usize,
    /// String filter values longer than this are dropped.
    pub max_field_value_length: usize,
    /// Field paths longer than this are dropped.
    pub max_field_path_length: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: None,
            max_search_length: MAX_SEARCH_QUERY_LENGTH,
            max_field_value_length: MAX_FIELD_VALUE_LENGTH,
            max_field_path_length: MAX_FIELD_PATH_LENGTH,
        }
    }
}

impl GridConfig {
    /// Basic field path validation: non-empty, bounded, no empty segments.
    #[must_use]
    pub fn is_valid_field_path(&self, path: &str) -> bool {
        !path.is_empty()
            && path.len() <= self.max_field_path_length
            && !path.starts_with('.')
            && !path.ends_with('.')
            && !path.contains("..")
    }

    #[must_use]
    pub const fn is_valid_field_value(&self, value: &str) -> bool {
        value.len() <= self.max_field_value_length
    }

    /// Resolve a requested page size: below 1 falls back to the default, and the
    /// result never exceeds `max_page_size`.
    #[must_use]
    pub fn effective_page_size(&self, requested: i64) -> u64 {
        let size = u64::try_from(requested)
            .ok()
            .filter(|size| *size >= 1)
            .unwrap_or(self.default_page_size.max(1));
        self.max_page_size
            .map_or(size, |max| size.min(max.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, None);
        assert_eq!(config.max_search_length, 10_000);
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: GridConfig = serde_json::from_str(r#"{ "maxPageSize": 100 }"#).unwrap();
        assert_eq!(config.max_page_size, Some(100));
        assert_eq!(config.default_page_size, 10);
    }

    #[test]
    fn test_effective_page_size() {
        let config = GridConfig::default();
        assert_eq!(config.effective_page_size(25), 25);
        assert_eq!(config.effective_page_size(0), 10);
        assert_eq!(config.effective_page_size(-5), 10);

        let capped = GridConfig {
            max_page_size: Some(50),
            ..GridConfig::default()
        };
        assert_eq!(capped.effective_page_size(500), 50);
    }

    #[test]
    fn test_field_path_validation() {
        let config = GridConfig::default();
        assert!(config.is_valid_field_path("status"));
        assert!(config.is_valid_field_path("address.city"));
        assert!(!config.is_valid_field_path(""));
        assert!(!config.is_valid_field_path("address..city"));
        assert!(!config.is_valid_field_path(".city"));
        assert!(!config.is_valid_field_path(&"a".repeat(101)));
    }
}
