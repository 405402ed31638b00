//! Pagination

use serde::Serialize;

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// 1-indexed page number after clamping values below 1
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Slice `items` into the requested 1-indexed page.
///
/// Pages below 1 are read as 1. Pages past the end yield no items rather
/// than an error. `total_pages` is `ceil(len / per_page)`, zero when
/// `per_page` is zero.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Paginated<T> {
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = if per_page == 0 {
        0
    } else {
        total_items.div_ceil(per_page)
    };

    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);

    Paginated {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total_items,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let items: Vec<u32> = (1..=13).collect();
        let page = paginate(&items, 2, 6);
        assert_eq!(page.items, vec![7, 8, 9, 10, 11, 12]);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_prev);
        assert!(page.has_next);
    }

    #[test]
    fn test_last_partial_page() {
        let items: Vec<u32> = (1..=13).collect();
        let page = paginate(&items, 3, 6);
        assert_eq!(page.items, vec![13]);
        assert!(!page.has_next);
    }

    #[test]
    fn test_page_below_one_is_first_page() {
        let items: Vec<u32> = (1..=13).collect();
        let page = paginate(&items, 0, 6);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2, 3, 4, 5, 6]);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let items: Vec<u32> = (1..=13).collect();
        let page = paginate(&items, 99, 6);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
    }

    #[test]
    fn test_size_bounds_hold() {
        for len in 0..20usize {
            let items: Vec<usize> = (0..len).collect();
            for per_page in 1..8 {
                for page in 0..6 {
                    let p = paginate(&items, page, per_page);
                    assert!(p.items.len() <= per_page);
                    assert_eq!(p.total_pages, len.div_ceil(per_page));
                }
            }
        }
    }

    #[test]
    fn test_zero_page_size() {
        let items = vec![1, 2, 3];
        let page = paginate(&items, 1, 0);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_works_with_references() {
        let owned = vec!["a".to_string(), "b".to_string()];
        let refs: Vec<&String> = owned.iter().collect();
        let page = paginate(&refs, 1, 1);
        assert_eq!(page.items, vec![&owned[0]]);
    }
}
