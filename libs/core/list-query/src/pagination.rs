use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Offsets handed to the store's `skip`/`limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: i64,
}

/// Page summary returned next to a list of items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub items_per_page: i64,
    pub number_of_pages: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<u64>,
}

impl Pagination {
    /// Window and summary for `page` of `limit` items out of `total`.
    ///
    /// Callers pass a validated page (>= 1) and limit (1-100); anything
    /// lower is treated as 1 rather than rejected. Offsets saturate instead
    /// of wrapping, and `skip` never exceeds `i64::MAX`.
    pub fn compute(page: u64, limit: i64, total: u64) -> (PageWindow, Pagination) {
        let page = page.max(1);
        let limit = limit.max(1);
        let per_page = limit as u64;

        let skip = (page - 1).saturating_mul(per_page).min(i64::MAX as u64);
        let pagination = Pagination {
            current_page: page,
            items_per_page: limit,
            number_of_pages: total.div_ceil(per_page),
            next_page: (page.saturating_mul(per_page) < total).then(|| page + 1),
            prev_page: (skip > 0).then(|| page - 1),
        };

        (PageWindow { skip, limit }, pagination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_partial_page() {
        // 125 documents, page 3 of 50: items 101..=125
        let (window, pagination) = Pagination::compute(3, 50, 125);

        assert_eq!(window, PageWindow { skip: 100, limit: 50 });
        assert_eq!(pagination.current_page, 3);
        assert_eq!(pagination.items_per_page, 50);
        assert_eq!(pagination.number_of_pages, 3);
        assert_eq!(pagination.next_page, None);
        assert_eq!(pagination.prev_page, Some(2));
    }

    #[test]
    fn test_first_page() {
        let (window, pagination) = Pagination::compute(1, 50, 125);
        assert_eq!(window.skip, 0);
        assert_eq!(pagination.next_page, Some(2));
        assert_eq!(pagination.prev_page, None);
    }

    #[test]
    fn test_exact_multiple_has_no_next_page() {
        let (_, pagination) = Pagination::compute(2, 50, 100);
        assert_eq!(pagination.number_of_pages, 2);
        assert_eq!(pagination.next_page, None);
    }

    #[test]
    fn test_empty_collection() {
        let (window, pagination) = Pagination::compute(1, 10, 0);
        assert_eq!(window.skip, 0);
        assert_eq!(pagination.number_of_pages, 0);
        assert_eq!(pagination.next_page, None);
        assert_eq!(pagination.prev_page, None);
    }

    #[test]
    fn test_properties_hold_over_grid() {
        for page in 1..=6u64 {
            for limit in 1..=12i64 {
                for total in 0..=40u64 {
                    let (window, p) = Pagination::compute(page, limit, total);
                    let per = limit as u64;

                    assert_eq!(window.skip, (page - 1) * per);
                    assert_eq!(p.number_of_pages, total.div_ceil(per));
                    assert_eq!(p.next_page.is_some(), page * per < total);
                    assert_eq!(p.prev_page.is_some(), (page - 1) * per > 0);
                }
            }
        }
    }

    #[test]
    fn test_huge_page_saturates() {
        let (window, pagination) = Pagination::compute(u64::MAX / 10, 50, 125);

        assert_eq!(window.skip, i64::MAX as u64);
        assert_eq!(pagination.number_of_pages, 3);
        assert_eq!(pagination.next_page, None);
        assert_eq!(pagination.prev_page, Some(u64::MAX / 10 - 1));

        let (window, pagination) = Pagination::compute(u64::MAX, 100, u64::MAX);
        assert_eq!(window.skip, i64::MAX as u64);
        assert_eq!(pagination.next_page, None);
    }

    #[test]
    fn test_serializes_camel_case_and_omits_absent_pages() {
        let (_, pagination) = Pagination::compute(1, 50, 10);
        let json = serde_json::to_value(pagination).unwrap();

        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["itemsPerPage"], 50);
        assert_eq!(json["numberOfPages"], 1);
        assert!(json.get("nextPage").is_none());
        assert!(json.get("prevPage").is_none());
    }
}
