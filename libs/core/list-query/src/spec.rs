use serde::Deserialize;
use std::borrow::Cow;
use utoipa::IntoParams;
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;
/// Highest page a caller may ask for; keeps `skip` well inside i64
pub const MAX_PAGE: u64 = 1_000_000;

/// Fields a caller may sort by, across every catalog collection
pub const SORTABLE_FIELDS: &[&str] = &[
    "name",
    "title",
    "price",
    "quantity",
    "sold",
    "ratingsAverage",
    "createdAt",
    "updatedAt",
];

/// A caller's list request, as decoded from the query string.
///
/// `?page=2&limit=20&sort=-price,title&fields=title,price&keyword=red`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuerySpec {
    /// Page number, starting at 1
    #[validate(range(min = 1, max = 1_000_000))]
    #[param(minimum = 1, maximum = 1_000_000, example = 1)]
    pub page: Option<u64>,

    /// Items per page (1-100)
    #[validate(range(min = 1, max = 100))]
    #[param(minimum = 1, maximum = 100, example = 50)]
    pub limit: Option<i64>,

    /// Comma-separated sort keys, `-` prefix for descending
    #[validate(custom(function = "validate_sort"))]
    #[param(example = "-createdAt,name")]
    pub sort: Option<String>,

    /// Comma-separated fields to return
    #[validate(custom(function = "validate_fields"))]
    #[param(example = "name,slug")]
    pub fields: Option<String>,

    /// Case-insensitive substring to search for
    #[validate(length(min = 2, max = 50))]
    pub keyword: Option<String>,
}

impl QuerySpec {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// `(field, 1 | -1)` pairs in the order given
    pub fn sort_keys(&self) -> Vec<(&str, i32)> {
        split_list(self.sort.as_deref())
            .map(|key| match key.strip_prefix('-') {
                Some(field) => (field, -1),
                None => (key, 1),
            })
            .collect()
    }

    pub fn projected_fields(&self) -> Vec<&str> {
        split_list(self.fields.as_deref()).collect()
    }

    /// The keyword, or `None` when absent or blank
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn validate_sort(sort: &str) -> Result<(), ValidationError> {
    for key in split_list(Some(sort)) {
        let field = key.strip_prefix('-').unwrap_or(key);
        if !SORTABLE_FIELDS.contains(&field) {
            return Err(ValidationError::new("sort").with_message(Cow::Owned(format!(
                "cannot sort by '{field}', expected one of: {}",
                SORTABLE_FIELDS.join(", ")
            ))));
        }
    }
    Ok(())
}

fn validate_fields(fields: &str) -> Result<(), ValidationError> {
    let is_identifier =
        |f: &str| f.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    match split_list(Some(fields)).find(|f| !is_identifier(f)) {
        Some(bad) => Err(ValidationError::new("fields")
            .with_message(Cow::Owned(format!("'{bad}' is not a field name")))),
        None => Ok(()),
    }
}
