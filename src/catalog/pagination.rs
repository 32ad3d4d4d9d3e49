//! Client-side pagination over a fully fetched result list.

use serde::Serialize;

/// One page of a larger result set. `page` is 1-based.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

/// Number of pages needed for `total` items.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Slice `items` into the requested page.
///
/// Page 0 or any page past the end yields an empty slice.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let count = page_count(items.len(), page_size);
    let slice: &[T] = if page == 0 || page > count {
        &[]
    } else {
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(items.len());
        &items[start..end]
    };

    Page {
        items: slice.to_vec(),
        page,
        page_count: count,
        total: items.len(),
    }
}
