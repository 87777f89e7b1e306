//! The remote movie service, as the core sees it.
//!
//! [`ApiClient`] is the single seam between client state and the network. The
//! production implementation is [`crate::http::HttpApi`]; tests script their own.
//! Methods that act on behalf of the viewer take the bearer token explicitly so
//! no implementation ever reaches into the session store.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{
    LoginPayload, Movie, RecentRating, RegisterPayload, Session, TopRated, User, UserMovie,
};

#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn login(&self, payload: &LoginPayload) -> Result<Session, ApiError>;

    async fn register(&self, payload: &RegisterPayload) -> Result<Session, ApiError>;

    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>, ApiError>;

    async fn movie(&self, movie_id: i64) -> Result<Movie, ApiError>;

    async fn user(&self, user_id: i64, token: Option<&str>) -> Result<User, ApiError>;

    async fn search_users(&self, query: &str, token: Option<&str>) -> Result<Vec<User>, ApiError>;

    /// Users that `user_id` follows.
    async fn following(&self, user_id: i64, token: &str) -> Result<Vec<User>, ApiError>;

    /// Creates the edge `viewer_id → target_id` and returns the followed user.
    async fn follow(&self, viewer_id: i64, target_id: i64, token: &str) -> Result<User, ApiError>;

    async fn unfollow(&self, viewer_id: i64, target_id: i64, token: &str) -> Result<(), ApiError>;

    async fn user_movies(&self, user_id: i64, token: Option<&str>)
        -> Result<Vec<UserMovie>, ApiError>;

    /// Adds `movie_id` to the user's list, or updates its rating/review.
    async fn upsert_user_movie(
        &self,
        user_id: i64,
        movie_id: i64,
        rating: Option<f64>,
        review: Option<&str>,
        token: &str,
    ) -> Result<UserMovie, ApiError>;

    async fn delete_user_movie(&self, user_id: i64, movie_id: i64, token: &str)
        -> Result<(), ApiError>;

    async fn trending_latest(&self) -> Result<Vec<RecentRating>, ApiError>;

    async fn trending_top(&self) -> Result<Vec<TopRated>, ApiError>;
}
