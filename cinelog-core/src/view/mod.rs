//! Per-screen state composites.
//!
//! Each screen owns a canonical collection and derives what it shows from it on
//! demand: collection → [`sort`] → [`paginate`] → visible slice. Nothing derived
//! is stored, so a patch to the collection is visible on the next read.

use std::borrow::Cow;
use std::ops::RangeInclusive;

use crate::pagination::{self, clamp_page, paginate, total_pages};
use crate::sort::{sort, Rated, SortMode};

pub mod friends;
pub mod rating;
pub mod search;
pub mod trending;
pub mod user_movies;

pub use friends::FriendsView;
pub use rating::RatingForm;
pub use search::SearchView;
pub use trending::TrendingView;
pub use user_movies::UserMoviesView;

/// Items shown per page when the configuration does not say otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A sortable, paginated collection.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    items: Vec<T>,
    sort_mode: SortMode,
    current_page: usize,
    page_size: usize,
}

impl<T: Rated + Clone> ListView<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            sort_mode: SortMode::Original,
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    /// The canonical collection, in server order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sorted(&self) -> Cow<'_, [T]> {
        sort(&self.items, self.sort_mode)
    }

    /// The items on the current page, in display order.
    pub fn page_slice(&self) -> Vec<T> {
        let sorted = self.sorted();
        paginate(&sorted, self.current_page as i64, self.page_size).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.items.len(), self.page_size)
    }

    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        pagination::page_numbers(self.total_pages())
    }

    /// Swaps in a new collection and returns to page 1.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.current_page = 1;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Changes the ordering and returns to page 1.
    pub fn set_sort(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        self.current_page = 1;
    }

    pub fn cycle_sort(&mut self) {
        self.set_sort(self.sort_mode.next());
    }

    /// Removes every item matching `pred`, then clamps the page. Returns the
    /// number removed.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        self.clamp();
        before - self.items.len()
    }

    /// Replaces the first item matching `pred` with `item`, or appends it, then
    /// clamps the page.
    pub fn upsert(&mut self, item: T, pred: impl Fn(&T) -> bool) {
        match self.items.iter().position(|existing| pred(existing)) {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
        self.clamp();
    }

    fn clamp(&mut self) {
        self.current_page = clamp_page(self.current_page as i64, self.items.len(), self.page_size);
    }

    /// Moves to `page`. Targets outside `[1, total_pages]` are ignored.
    pub fn go_to_page(&mut self, page: i64) -> bool {
        if page < 1 || page > self.total_pages() as i64 {
            return false;
        }
        self.current_page = page as usize;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page as i64 + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.current_page as i64 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserMovie;

    fn items(n: i64) -> Vec<UserMovie> {
        (1..=n)
            .map(|id| UserMovie {
                movie_id: id,
                movie_title: format!("movie {id}"),
                rating: Some((id % 5) as f64),
                review: None,
                poster_url: None,
            })
            .collect()
    }

    #[test]
    fn deleting_only_item_on_last_page_clamps_back() {
        let mut list = ListView::new(10);
        list.replace(items(11));
        assert!(list.go_to_page(2));
        assert_eq!(list.page_slice().len(), 1);

        assert_eq!(list.remove_where(|m| m.movie_id == 11), 1);
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.page_slice().len(), 10);
    }

    #[test]
    fn out_of_range_navigation_is_ignored() {
        let mut list = ListView::new(10);
        list.replace(items(15));
        assert!(!list.go_to_page(0));
        assert!(!list.go_to_page(3));
        assert!(!list.previous_page());
        assert!(list.next_page());
        assert!(!list.next_page());
        assert_eq!(list.current_page(), 2);
    }

    #[test]
    fn sort_and_replace_reset_to_first_page() {
        let mut list = ListView::new(5);
        list.replace(items(12));
        list.go_to_page(3);
        list.cycle_sort();
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.sort_mode(), SortMode::RatingAscending);

        list.go_to_page(2);
        list.replace(items(4));
        assert_eq!(list.current_page(), 1);
    }

    #[test]
    fn upsert_patches_in_place_and_keeps_page() {
        let mut list = ListView::new(5);
        list.replace(items(7));
        list.go_to_page(2);

        let mut updated = list.items()[6].clone();
        updated.rating = Some(0.5);
        list.upsert(updated, |m| m.movie_id == 7);
        assert_eq!(list.len(), 7);
        assert_eq!(list.items()[6].rating, Some(0.5));
        assert_eq!(list.current_page(), 2);
    }
}
