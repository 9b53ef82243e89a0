//! Page/limit arithmetic shared by the list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upper bound on `limit` accepted from clients
pub const MAX_PAGE_SIZE: u64 = 100;

/// A resolved page request: `page` is 1-based, `limit` is 1..=[`MAX_PAGE_SIZE`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    /// Missing or zero values fall back to page 1 and `default_limit`.
    ///
    /// `page` is capped so that [`Pagination::skip`] stays within `i64`, the
    /// range MongoDB accepts for a skip.
    pub fn new(page: Option<u64>, limit: Option<u64>, default_limit: u64) -> Self {
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .clamp(1, MAX_PAGE_SIZE);
        let last_page = i64::MAX as u64 / limit;
        let page = page.filter(|p| *p > 0).unwrap_or(1).min(last_page);
        Self { page, limit }
    }

    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// Sort direction from `?sortOrder=asc|desc`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// MongoDB sort value
    pub fn direction(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(Pagination::new(None, None, 12), Pagination { page: 1, limit: 12 });
        assert_eq!(Pagination::new(Some(0), Some(0), 10), Pagination { page: 1, limit: 10 });
        assert_eq!(Pagination::new(Some(3), Some(500), 12).limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_skip_and_total_pages() {
        let page = Pagination::new(Some(3), Some(12), 12);
        assert_eq!(page.skip(), 24);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(24), 2);
        assert_eq!(page.total_pages(25), 3);
    }

    #[test]
    fn test_huge_page_keeps_skip_in_range() {
        let page = Pagination::new(Some(u64::MAX), Some(12), 12);
        assert!(page.skip() <= i64::MAX as u64);
        assert_eq!(page.page, i64::MAX as u64 / 12);

        let page = Pagination::new(Some(u64::MAX), None, MAX_PAGE_SIZE);
        assert!(page.skip() <= i64::MAX as u64);
    }

    #[test]
    fn test_sort_order_parses_lowercase() {
        let order: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(order.direction(), 1);
        assert_eq!(SortOrder::Desc.direction(), -1);
    }
}
