//! Pure page arithmetic shared by every list view.
//!
//! Page numbers are 1-based. Requested pages arrive as `i64` so that "page 0"
//! or "page -3" from arithmetic like `current - 1` are representable and get
//! normalised here instead of at every call site. A `page_size` of zero is
//! treated as one.

use std::ops::RangeInclusive;

/// Maps any requested page to a usable 1-based page: non-positive → 1.
pub fn normalize_page(page: i64) -> usize {
    if page > 0 {
        usize::try_from(page).unwrap_or(usize::MAX)
    } else {
        1
    }
}

/// Returns the `page_size`-bounded slice for `page`. Pages past the end are empty.
pub fn paginate<T>(items: &[T], page: i64, page_size: usize) -> &[T] {
    let size = page_size.max(1);
    let start = (normalize_page(page) - 1).saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `count` items; never less than 1.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if count == 0 {
        return 1;
    }
    count.div_ceil(page_size.max(1)).max(1)
}

/// The page selector sequence `1..=total`, with `total` re-validated to at least 1.
pub fn page_numbers(total: usize) -> RangeInclusive<usize> {
    1..=total.max(1)
}

/// Forces `page` into `[1, total_pages(count, page_size)]`.
pub fn clamp_page(page: i64, count: usize, page_size: usize) -> usize {
    if page < 1 {
        return 1;
    }
    normalize_page(page).min(total_pages(count, page_size))
}
