//! Scripted in-memory `ApiClient` shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use cinelog_core::api::ApiClient;
use cinelog_core::error::ApiError;
use cinelog_core::types::{
    LoginPayload, Movie, RecentRating, RegisterPayload, Session, TopRated, User, UserMovie,
};

pub const PASSWORD: &str = "hunter2";

/// Answers every call from in-memory tables and records what was asked.
#[derive(Default)]
pub struct ScriptedApi {
    pub offline: AtomicBool,
    pub accounts: Mutex<Vec<Session>>,
    pub catalog: Mutex<Vec<Movie>>,
    pub users: Mutex<Vec<User>>,
    pub following: Mutex<HashMap<i64, Vec<User>>>,
    pub lists: Mutex<HashMap<i64, Vec<UserMovie>>>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, session: Session) -> Self {
        self.users.lock().unwrap().push(User {
            id: session.id,
            username: session.username.clone(),
            email: session.email.clone(),
        });
        self.accounts.lock().unwrap().push(session);
        self
    }

    pub fn with_user(self, user: User) -> Self {
        self.users.lock().unwrap().push(user);
        self
    }

    pub fn with_movies(self, movies: Vec<Movie>) -> Self {
        self.catalog.lock().unwrap().extend(movies);
        self
    }

    pub fn with_list(self, user_id: i64, items: Vec<UserMovie>) -> Self {
        self.lists.lock().unwrap().insert(user_id, items);
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection refused".into()));
        }
        Ok(())
    }

    fn authorize(&self, token: &str) -> Result<Session, ApiError> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token == token)
            .cloned()
            .ok_or(ApiError::Rejected { status: 401, message: Some("Unauthorized".into()) })
    }

    fn user_by_id(&self, id: i64) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

pub fn session(id: i64, username: &str) -> Session {
    Session {
        id,
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        token: format!("token-{username}"),
    }
}

pub fn user(id: i64, username: &str) -> User {
    User { id, username: username.to_owned(), email: format!("{username}@example.com") }
}

pub fn movie(id: i64, title: &str, rating: Option<f64>) -> Movie {
    Movie {
        id,
        primary_title: title.to_owned(),
        original_title: None,
        start_year: None,
        poster_url: None,
        aggregate_rating: rating,
        vote_count: None,
    }
}

pub fn rated(movie_id: i64, rating: Option<f64>) -> UserMovie {
    UserMovie {
        movie_id,
        movie_title: format!("movie {movie_id}"),
        rating,
        review: None,
        poster_url: None,
    }
}

#[async_trait]
impl ApiClient for ScriptedApi {
    async fn login(&self, payload: &LoginPayload) -> Result<Session, ApiError> {
        self.record(format!("login {}", payload.username))?;
        let accounts = self.accounts.lock().unwrap();
        accounts
            .iter()
            .find(|s| s.username == payload.username && payload.password == PASSWORD)
            .cloned()
            .ok_or(ApiError::Rejected { status: 401, message: Some("Bad credentials".into()) })
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<Session, ApiError> {
        self.record(format!("register {}", payload.username))?;
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|s| s.username == payload.username) {
            return Err(ApiError::Rejected {
                status: 409,
                message: Some("Username already taken".into()),
            });
        }
        let session = Session {
            id: 100 + accounts.len() as i64,
            username: payload.username.clone(),
            email: payload.email.clone(),
            token: format!("token-{}", payload.username),
        };
        accounts.push(session.clone());
        Ok(session)
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<Movie>, ApiError> {
        self.record(format!("search_movies {query}"))?;
        let needle = query.to_lowercase();
        Ok(self
            .catalog
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.primary_title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn movie(&self, movie_id: i64) -> Result<Movie, ApiError> {
        self.record(format!("movie {movie_id}"))?;
        self.catalog
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == movie_id)
            .cloned()
            .ok_or(ApiError::Rejected { status: 404, message: None })
    }

    async fn user(&self, user_id: i64, _token: Option<&str>) -> Result<User, ApiError> {
        self.record(format!("user {user_id}"))?;
        self.user_by_id(user_id).ok_or(ApiError::Rejected { status: 404, message: None })
    }

    async fn search_users(&self, query: &str, _token: Option<&str>) -> Result<Vec<User>, ApiError> {
        self.record(format!("search_users {query}"))?;
        let needle = query.to_lowercase();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.username.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn following(&self, user_id: i64, token: &str) -> Result<Vec<User>, ApiError> {
        self.record(format!("following {user_id}"))?;
        self.authorize(token)?;
        Ok(self.following.lock().unwrap().get(&user_id).cloned().unwrap_or_default())
    }

    async fn follow(&self, viewer_id: i64, target_id: i64, token: &str) -> Result<User, ApiError> {
        self.record(format!("follow {viewer_id} {target_id}"))?;
        self.authorize(token)?;
        let target = self
            .user_by_id(target_id)
            .ok_or(ApiError::Rejected { status: 404, message: None })?;
        let mut following = self.following.lock().unwrap();
        let edges = following.entry(viewer_id).or_default();
        if !edges.iter().any(|u| u.id == target_id) {
            edges.push(target.clone());
        }
        Ok(target)
    }

    async fn unfollow(&self, viewer_id: i64, target_id: i64, token: &str) -> Result<(), ApiError> {
        self.record(format!("unfollow {viewer_id} {target_id}"))?;
        self.authorize(token)?;
        if let Some(edges) = self.following.lock().unwrap().get_mut(&viewer_id) {
            edges.retain(|u| u.id != target_id);
        }
        Ok(())
    }

    async fn user_movies(
        &self,
        user_id: i64,
        _token: Option<&str>,
    ) -> Result<Vec<UserMovie>, ApiError> {
        self.record(format!("user_movies {user_id}"))?;
        Ok(self.lists.lock().unwrap().get(&user_id).cloned().unwrap_or_default())
    }

    async fn upsert_user_movie(
        &self,
        user_id: i64,
        movie_id: i64,
        rating: Option<f64>,
        review: Option<&str>,
        token: &str,
    ) -> Result<UserMovie, ApiError> {
        self.record(format!("upsert {user_id} {movie_id}"))?;
        self.authorize(token)?;
        let title = self
            .catalog
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == movie_id)
            .map(|m| m.primary_title.clone())
            .unwrap_or_default();
        let item = UserMovie {
            movie_id,
            movie_title: title,
            rating,
            review: review.map(str::to_owned),
            poster_url: None,
        };
        let mut lists = self.lists.lock().unwrap();
        let list = lists.entry(user_id).or_default();
        match list.iter_mut().find(|m| m.movie_id == movie_id) {
            Some(existing) => *existing = item.clone(),
            None => list.push(item.clone()),
        }
        Ok(item)
    }

    async fn delete_user_movie(
        &self,
        user_id: i64,
        movie_id: i64,
        token: &str,
    ) -> Result<(), ApiError> {
        self.record(format!("delete {user_id} {movie_id}"))?;
        self.authorize(token)?;
        if let Some(list) = self.lists.lock().unwrap().get_mut(&user_id) {
            list.retain(|m| m.movie_id != movie_id);
        }
        Ok(())
    }

    async fn trending_latest(&self) -> Result<Vec<RecentRating>, ApiError> {
        self.record("trending_latest".into())?;
        Ok(Vec::new())
    }

    async fn trending_top(&self) -> Result<Vec<TopRated>, ApiError> {
        self.record("trending_top".into())?;
        Ok(Vec::new())
    }
}
