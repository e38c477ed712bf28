use serde::Serialize;
use utoipa::ToSchema;

use crate::pagination::Pagination;

/// One page of items plus its summary
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<T> {
    /// Number of items on this page
    pub count: usize,
    pub pagination: Pagination,
    pub items: Vec<T>,
}

impl<T> ListResult<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self {
            count: items.len(),
            pagination,
            items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResult<U> {
        ListResult::new(self.items.into_iter().map(f).collect(), self.pagination)
    }

    /// Replace the items, keeping the pagination
    pub fn with_items<U>(self, items: Vec<U>) -> ListResult<U> {
        ListResult::new(items, self.pagination)
    }
}

/// Wire shape of a list endpoint
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T: ToSchema> {
    /// Number of items in `data`
    pub results: usize,
    pub pagination_result: Pagination,
    pub data: Vec<T>,
}

impl<T: ToSchema> From<ListResult<T>> for ListResponse<T> {
    fn from(result: ListResult<T>) -> Self {
        Self {
            results: result.count,
            pagination_result: result.pagination,
            data: result.items,
        }
    }
}
