//! Rating-based ordering of list collections.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::types::{Movie, UserMovie};

/// View-only ordering key. Never persisted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Server order, untouched.
    #[default]
    Original,
    RatingAscending,
    RatingDescending,
}

impl SortMode {
    /// Cycles Original → Ascending → Descending → Original.
    pub fn next(self) -> Self {
        match self {
            SortMode::Original => SortMode::RatingAscending,
            SortMode::RatingAscending => SortMode::RatingDescending,
            SortMode::RatingDescending => SortMode::Original,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Original => "original order",
            SortMode::RatingAscending => "rating ↑",
            SortMode::RatingDescending => "rating ↓",
        }
    }
}

/// Anything with an optional numeric rating.
pub trait Rated {
    fn rating(&self) -> Option<f64>;
}

impl Rated for UserMovie {
    fn rating(&self) -> Option<f64> {
        self.rating
    }
}

impl Rated for Movie {
    fn rating(&self) -> Option<f64> {
        self.aggregate_rating
    }
}

/// Orders `items` by `mode`.
///
/// `Original` borrows the input as-is. The rating modes return a stably sorted
/// copy in which unrated items always come last, whatever the direction.
pub fn sort<T: Rated + Clone>(items: &[T], mode: SortMode) -> Cow<'_, [T]> {
    match mode {
        SortMode::Original => Cow::Borrowed(items),
        SortMode::RatingAscending => {
            let mut sorted = items.to_vec();
            sorted.sort_by(|a, b| compare(a.rating(), b.rating(), |x, y| x.total_cmp(&y)));
            Cow::Owned(sorted)
        }
        SortMode::RatingDescending => {
            let mut sorted = items.to_vec();
            sorted.sort_by(|a, b| compare(a.rating(), b.rating(), |x, y| y.total_cmp(&x)));
            Cow::Owned(sorted)
        }
    }
}

fn compare(a: Option<f64>, b: Option<f64>, rated: impl Fn(f64, f64) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => rated(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, rating: Option<f64>) -> UserMovie {
        UserMovie {
            movie_id: id,
            movie_title: format!("movie {id}"),
            rating,
            review: None,
            poster_url: None,
        }
    }

    fn ratings(items: &[UserMovie]) -> Vec<Option<f64>> {
        items.iter().map(|m| m.rating).collect()
    }

    fn sample() -> Vec<UserMovie> {
        vec![item(1, Some(3.0)), item(2, None), item(3, Some(1.0)), item(4, None), item(5, Some(5.0))]
    }

    #[test]
    fn unrated_items_sort_last_in_both_directions() {
        let items = sample();
        assert_eq!(
            ratings(&sort(&items, SortMode::RatingAscending)),
            vec![Some(1.0), Some(3.0), Some(5.0), None, None]
        );
        assert_eq!(
            ratings(&sort(&items, SortMode::RatingDescending)),
            vec![Some(5.0), Some(3.0), Some(1.0), None, None]
        );
    }

    #[test]
    fn original_borrows_without_copying() {
        let items = sample();
        let sorted = sort(&items, SortMode::Original);
        assert!(matches!(sorted, Cow::Borrowed(_)));
        assert!(std::ptr::eq(sorted.as_ref(), items.as_slice()));
    }

    #[test]
    fn equal_ratings_keep_their_relative_order() {
        let items = vec![item(1, Some(4.0)), item(2, Some(2.5)), item(3, Some(4.0)), item(4, None), item(5, None)];
        let ids: Vec<i64> = sort(&items, SortMode::RatingDescending).iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![1, 3, 2, 4, 5]);
    }

    #[test]
    fn mode_cycle_returns_to_original() {
        assert_eq!(SortMode::Original.next().next().next(), SortMode::Original);
    }
}
