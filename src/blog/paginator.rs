//! Pagination of post listings.
//!
//! Listings are counted first, the requested page number is resolved against
//! the page count and only that slice is fetched.

use serde::Serialize;

/// Number of posts on one listing page.
pub const POSTS_PER_PAGE: i64 = 10;

/// Splits `total` items into pages of `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total: i64,
    per_page: i64,
}

impl Paginator {
    /// Create a paginator. A non-positive `per_page` is treated as 1.
    pub fn new(total: i64, per_page: i64) -> Self {
        Self {
            total: total.max(0),
            per_page: per_page.max(1),
        }
    }

    /// Paginator with the listing page size.
    pub fn for_posts(total: i64) -> Self {
        Self::new(total, POSTS_PER_PAGE)
    }

    /// Number of pages. An empty listing still has one (empty) page.
    pub fn num_pages(&self) -> i64 {
        ((self.total + self.per_page - 1) / self.per_page).max(1)
    }

    /// Resolve the raw `page` query value to a valid page number.
    ///
    /// Missing or non-numeric values give the first page. Numbers past the
    /// end, and numbers below 1, give the last page.
    pub fn resolve(&self, requested: Option<&str>) -> i64 {
        let Some(number) = requested.and_then(|raw| raw.trim().parse::<i64>().ok()) else {
            return 1;
        };
        if number < 1 || number > self.num_pages() {
            self.num_pages()
        } else {
            number
        }
    }

    /// Offset of the first item on a (resolved) page.
    pub fn offset(&self, number: i64) -> i64 {
        (number - 1) * self.per_page
    }

    /// Maximum number of items on a page.
    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// Wrap the fetched items of a resolved page.
    pub fn page<T>(&self, number: i64, items: Vec<T>) -> Page<T> {
        let num_pages = self.num_pages();
        let has_previous = number > 1;
        let has_next = number < num_pages;
        Page {
            items,
            number,
            num_pages,
            total: self.total,
            has_previous,
            has_next,
            has_other_pages: num_pages > 1,
            previous_page_number: has_previous.then(|| number - 1),
            next_page_number: has_next.then(|| number + 1),
        }
    }
}

/// One page of a listing plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: i64,
    /// Number of pages in the listing.
    pub num_pages: i64,
    /// Number of items in the whole listing.
    pub total: i64,
    pub has_previous: bool,
    pub has_next: bool,
    /// More than one page exists.
    pub has_other_pages: bool,
    pub previous_page_number: Option<i64>,
    pub next_page_number: Option<i64>,
}

impl<T> Page<T> {
    /// Convert the items, keeping the navigation metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            has_previous: self.has_previous,
            has_next: self.has_next,
            has_other_pages: self.has_other_pages,
            previous_page_number: self.previous_page_number,
            next_page_number: self.next_page_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Items a page would hold when slicing `0..total`.
    fn slice(total: i64, requested: Option<&str>) -> Page<i64> {
        let paginator = Paginator::for_posts(total);
        let number = paginator.resolve(requested);
        let start = paginator.offset(number);
        let end = (start + paginator.per_page()).min(total);
        paginator.page(number, (start..end).collect())
    }

    #[test]
    fn test_num_pages() {
        assert_eq!(Paginator::for_posts(0).num_pages(), 1);
        assert_eq!(Paginator::for_posts(1).num_pages(), 1);
        assert_eq!(Paginator::for_posts(10).num_pages(), 1);
        assert_eq!(Paginator::for_posts(11).num_pages(), 2);
        assert_eq!(Paginator::for_posts(13).num_pages(), 2);
        assert_eq!(Paginator::for_posts(100).num_pages(), 10);
    }

    #[test]
    fn test_resolve_defaults_to_first_page() {
        let paginator = Paginator::for_posts(30);
        assert_eq!(paginator.resolve(None), 1);
        assert_eq!(paginator.resolve(Some("")), 1);
        assert_eq!(paginator.resolve(Some("abc")), 1);
        assert_eq!(paginator.resolve(Some("2.5")), 1);
    }

    #[test]
    fn test_resolve_out_of_range_gives_last_page() {
        let paginator = Paginator::for_posts(30);
        assert_eq!(paginator.resolve(Some("2")), 2);
        assert_eq!(paginator.resolve(Some("4")), 3);
        assert_eq!(paginator.resolve(Some("999")), 3);
        assert_eq!(paginator.resolve(Some("0")), 3);
        assert_eq!(paginator.resolve(Some("-1")), 3);
    }

    #[test]
    fn test_page_sizes_follow_formula() {
        for total in [0_i64, 1, 9, 10, 11, 13, 20, 25] {
            let num_pages = Paginator::for_posts(total).num_pages();
            for requested in 1..=num_pages {
                let page = slice(total, Some(&requested.to_string()));
                let expected = (total - POSTS_PER_PAGE * (requested - 1)).clamp(0, POSTS_PER_PAGE);
                assert_eq!(page.items.len() as i64, expected, "total={total} page={requested}");
            }
        }
    }

    #[test]
    fn test_thirteen_items_split_ten_and_three() {
        let first = slice(13, None);
        assert_eq!(first.items.len(), 10);
        assert!(!first.has_previous);
        assert!(first.has_next);
        assert_eq!(first.next_page_number, Some(2));
        assert_eq!(first.previous_page_number, None);
        assert!(first.has_other_pages);

        let second = slice(13, Some("2"));
        assert_eq!(second.items, vec![10, 11, 12]);
        assert!(second.has_previous);
        assert!(!second.has_next);
        assert_eq!(second.previous_page_number, Some(1));

        let beyond = slice(13, Some("7"));
        assert_eq!(beyond.number, 2);
        assert_eq!(beyond.items, second.items);
    }

    #[test]
    fn test_empty_listing_is_single_empty_page() {
        let page = slice(0, Some("3"));
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_previous);
        assert!(!page.has_next);
        assert!(!page.has_other_pages);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = slice(13, Some("2")).map(|n| n.to_string());
        assert_eq!(page.items, vec!["10", "11", "12"]);
        assert_eq!(page.number, 2);
        assert_eq!(page.total, 13);
    }
}
