//! Pagination request/result types shared by list operations.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

/// 1-indexed page request.
///
/// Construction only guards the lower bounds; list handlers apply the upper
/// clamp with [`PageRequest::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// `page < 1` becomes 1, `page_size < 1` becomes the default size.
    pub fn new(page: i64, page_size: i64) -> Self {
        let page = if page < 1 { DEFAULT_PAGE_NUMBER } else { saturate(page) };
        let page_size = if page_size < 1 { DEFAULT_PAGE_SIZE } else { saturate(page_size) };
        Self { page, page_size }
    }

    /// Copy with `page_size` limited to `[1, max]`.
    pub fn clamped(self, max: u32) -> Self {
        Self {
            page: self.page,
            page_size: self.page_size.clamp(1, max.max(1)),
        }
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn saturate(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// One page of results plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        let size = u64::from(page_size);
        let total_pages = if size > 0 { total.div_ceil(size) } else { 0 };

        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
            has_next: u64::from(page) * size < total,
            has_prev: page > 1,
        }
    }

    pub fn from_request(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self::new(items, total, request.page, request.page_size)
    }

    /// Convert the items, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> PageResult<U>
    where
        F: FnMut(T) -> U,
    {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cut the requested page out of an already filtered, ordered list.
pub fn paginate<T>(items: Vec<T>, request: &PageRequest) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let page = items.into_iter().skip(skip).take(request.limit()).collect();
    (page, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values_normalize_to_defaults() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 20);

        let request = PageRequest::new(-3, -10);
        assert_eq!(request, PageRequest::default());
    }

    #[test]
    fn test_no_upper_clamp_until_asked() {
        let request = PageRequest::new(2, 500);
        assert_eq!(request.page_size, 500);
        assert_eq!(request.clamped(100).page_size, 100);
        assert_eq!(PageRequest::new(1, 5).clamped(100).page_size, 5);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
    }

    #[test]
    fn test_page_result_navigation() {
        let result = PageResult::new(vec![1, 2, 3], 45, 1, 20);
        assert!(result.has_next);
        assert!(!result.has_prev);
        assert_eq!(result.total_pages, 3);

        let last = PageResult::new(vec![41], 41, 3, 20);
        assert!(!last.has_next);
        assert!(last.has_prev);

        let exact = PageResult::new(vec![0; 20], 40, 2, 20);
        assert!(!exact.has_next);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let result = PageResult::new(vec![1, 2], 10, 2, 2).map(|n| n.to_string());
        assert_eq!(result.items, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(result.total, 10);
        assert!(result.has_next);
        assert!(result.has_prev);
    }

    #[test]
    fn test_paginate_slices() {
        let items: Vec<u32> = (1..=25).collect();
        let (page, total) = paginate(items.clone(), &PageRequest::new(2, 10));
        assert_eq!(total, 25);
        assert_eq!(page, (11..=20).collect::<Vec<_>>());

        let (page, _) = paginate(items, &PageRequest::new(4, 10));
        assert!(page.is_empty());
    }
}
