//! A user's rated list: load, sort, paginate, delete, rate, look up.
//!
//! Exercises: UserMoviesView, ListView clamping, RatingForm, MovieLookup.

mod common;

use cinelog_core::nav::MovieLookup;
use cinelog_core::sort::SortMode;
use cinelog_core::view::{RatingForm, UserMoviesView};
use common::{movie, rated, session, ScriptedApi};

#[tokio::test]
async fn deleting_the_eleventh_item_on_page_two_clamps_to_page_one() {
    let owner = session(1, "ana");
    let api = ScriptedApi::new()
        .with_account(owner.clone())
        .with_list(1, (1..=11).map(|id| rated(id, Some(3.0))).collect());
    let mut view = UserMoviesView::new(10);

    let request = view.open(1, Some(&owner));
    assert!(view.apply_loaded(request.execute(&api).await));
    assert_eq!(view.list().total_pages(), 2);
    assert!(view.list_mut().go_to_page(2));
    let last = view.list().page_slice();
    assert_eq!(last.len(), 1);

    let command = view.delete(last[0].movie_id, Some(&owner)).unwrap();
    view.apply_delete(command.execute(&api).await);

    assert_eq!(view.list().len(), 10);
    assert_eq!(view.list().current_page(), 1);
    assert_eq!(view.list().total_pages(), 1);
}

#[tokio::test]
async fn sorted_list_pages_rated_items_before_unrated() {
    let api = ScriptedApi::new().with_list(
        5,
        vec![rated(1, Some(3.0)), rated(2, None), rated(3, Some(1.0)), rated(4, None), rated(5, Some(5.0))],
    );
    let mut view = UserMoviesView::new(2);
    let request = view.open(5, None);
    view.apply_loaded(request.execute(&api).await);

    view.list_mut().set_sort(SortMode::RatingAscending);
    let pages: Vec<Vec<Option<f64>>> = view
        .list()
        .page_numbers()
        .map(|p| {
            let mut list = view.list().clone();
            list.go_to_page(p as i64);
            list.page_slice().iter().map(|m| m.rating).collect()
        })
        .collect();
    assert_eq!(
        pages,
        vec![vec![Some(1.0), Some(3.0)], vec![Some(5.0), None], vec![None]]
    );
    assert_eq!(view.list().items()[0].movie_id, 1, "canonical order untouched");
}

#[tokio::test]
async fn saved_rating_patches_the_open_list() {
    let owner = session(1, "ana");
    let api = ScriptedApi::new()
        .with_account(owner.clone())
        .with_movies(vec![movie(42, "Alien", Some(8.5))])
        .with_list(1, vec![rated(7, Some(2.0))]);
    let mut view = UserMoviesView::default();
    let request = view.open(1, Some(&owner));
    view.apply_loaded(request.execute(&api).await);

    let mut form = RatingForm::open(Some(movie(42, "Alien", Some(8.5))), Some(&owner));
    form.set_rating(4.5);
    form.review_mut().push_str("  Still terrifying.  ");
    let command = form.submit(Some(&owner)).unwrap();
    let outcome = command.execute(&api).await;
    let owner_id = outcome.user_id;
    let saved = form.apply(outcome).expect("save succeeded");
    view.apply_rating(owner_id, saved);

    assert_eq!(view.list().len(), 2);
    let alien = view.list().items().iter().find(|m| m.movie_id == 42).unwrap();
    assert_eq!(alien.rating, Some(4.5));
    assert_eq!(alien.review.as_deref(), Some("Still terrifying."));
}

#[tokio::test]
async fn non_owner_sees_no_delete_and_list_survives_failed_delete() {
    let owner = session(1, "ana");
    let visitor = session(2, "bob");
    let api = ScriptedApi::new()
        .with_account(owner.clone())
        .with_list(1, vec![rated(7, Some(2.0))]);
    let mut view = UserMoviesView::default();
    let request = view.open(1, Some(&visitor));
    view.apply_loaded(request.execute(&api).await);

    assert!(!view.is_owner(Some(&visitor)));
    assert!(view.delete(7, Some(&visitor)).is_none());

    let command = view.delete(7, Some(&owner)).unwrap();
    api.set_offline(true);
    view.apply_delete(command.execute(&api).await);
    assert_eq!(view.list().len(), 1);
    assert!(view.error().is_some());
}

#[tokio::test]
async fn movie_lookup_falls_back_to_the_list_entry() {
    let api = ScriptedApi::new().with_movies(vec![movie(7, "Heat", Some(8.3))]);

    let found = MovieLookup::for_item(&rated(7, None)).execute(&api).await;
    assert_eq!(found.primary_title, "Heat");
    assert_eq!(found.aggregate_rating, Some(8.3));

    let missing = MovieLookup::for_item(&rated(99, None)).execute(&api).await;
    assert_eq!(missing.id, 99);
    assert_eq!(missing.primary_title, "movie 99");
}
