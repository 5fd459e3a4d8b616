use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// A normalised `page`/`limit` pair. Pages start at 1 and the limit is kept
/// within `1..=MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// Zero-based page index, as expected by the ORM paginator
    pub fn index(&self) -> u64 {
        self.page - 1
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results together with the total number of matching rows
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    pub total: u64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageRequest::default();
        assert_eq!(page, PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(PageRequest::new(Some(2), Some(0)).limit, 1);
        assert_eq!(PageRequest::new(Some(2), Some(500)).limit, 100);
        assert_eq!(PageRequest::new(Some(0), Some(25)).page, 1);
    }

    #[test]
    fn test_index_and_total_pages() {
        let page = PageRequest::new(Some(3), Some(20));
        assert_eq!(page.index(), 2);
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(41), 3);
        assert_eq!(page.total_pages(40), 2);
    }
}
