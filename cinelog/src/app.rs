//! Central application state for cinelog.
//!
//! `AppState` owns the session store, one core view per screen, the route
//! history, and the per-list selection state. It never performs I/O: actions
//! that need the network push an [`ApiJob`] onto an internal queue which the
//! main loop drains with [`AppState::take_jobs`], and finished requests come
//! back through [`AppState::apply`]. Rendering reads this state; the keybinding
//! dispatcher mutates it.

use std::mem;

use cinelog_core::nav::{History, MovieLookup, Route};
use cinelog_core::session::{validate_login, validate_register, SessionStore};
use cinelog_core::types::{LoginPayload, Movie, RegisterPayload, Session, User, UserMovie};
use cinelog_core::view::rating::{RatingForm, RatingOutcome};
use cinelog_core::view::{FriendsView, ListView, SearchView, TrendingView, UserMoviesView};
use cinelog_core::ApiError;
use ratatui::widgets::ListState;
use tokio::time::{Duration, Instant};

use crate::worker::{ApiJob, ApiOutcome, ListSlot};

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing into the search box of the current screen.
    Insert,
    HelpOverlay,
    /// A login/register or rating dialog is open.
    Dialog,
}

/// Focused pane on the friends screen. `Tab` cycles Results → Following → Movies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FriendsFocus {
    #[default]
    Results,
    Following,
    Movies,
}

impl FriendsFocus {
    pub fn next(self) -> Self {
        match self {
            FriendsFocus::Results => FriendsFocus::Following,
            FriendsFocus::Following => FriendsFocus::Movies,
            FriendsFocus::Movies => FriendsFocus::Results,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TrendingFocus {
    #[default]
    Latest,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Register,
}

/// The login/register dialog.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub kind: AuthKind,
    pub username: String,
    pub email: String,
    pub password: String,
    /// Index into [`AuthForm::labels`].
    pub field: usize,
    pub submitting: bool,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn new(kind: AuthKind) -> Self {
        Self {
            kind,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            field: 0,
            submitting: false,
            error: None,
        }
    }

    pub fn labels(&self) -> &'static [&'static str] {
        match self.kind {
            AuthKind::Login => &["Username", "Password"],
            AuthKind::Register => &["Username", "Email", "Password"],
        }
    }

    pub fn value(&self, index: usize) -> &str {
        match (self.kind, index) {
            (_, 0) => &self.username,
            (AuthKind::Register, 1) => &self.email,
            _ => &self.password,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match (self.kind, self.field) {
            (_, 0) => &mut self.username,
            (AuthKind::Register, 1) => &mut self.email,
            _ => &mut self.password,
        }
    }

    pub fn is_secret(&self, index: usize) -> bool {
        index == self.labels().len() - 1
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % self.labels().len();
    }

    pub fn prev_field(&mut self) {
        let len = self.labels().len();
        self.field = (self.field + len - 1) % len;
    }

    pub fn push(&mut self, c: char) {
        self.value_mut().push(c);
    }

    pub fn pop(&mut self) {
        self.value_mut().pop();
    }

    /// Validates the form and builds the request.
    fn job(&self) -> Result<ApiJob, ApiError> {
        match self.kind {
            AuthKind::Login => {
                let payload = LoginPayload {
                    username: self.username.trim().to_owned(),
                    password: self.password.clone(),
                };
                validate_login(&payload)?;
                Ok(ApiJob::Login(payload))
            }
            AuthKind::Register => {
                let payload = RegisterPayload {
                    username: self.username.trim().to_owned(),
                    email: self.email.trim().to_owned(),
                    password: self.password.clone(),
                };
                validate_register(&payload)?;
                Ok(ApiJob::Register(payload))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingField {
    Rating,
    Review,
}

pub enum Dialog {
    Auth(AuthForm),
    Rating { form: RatingForm, field: RatingField },
}

/// One-line message shown in the status bar until replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

pub struct AppState {
    pub mode: Mode,
    pub history: History,
    pub session: SessionStore,

    pub search: SearchView,
    pub search_input: String,
    pub search_list: ListState,

    /// The list behind `Route::UserMovies`.
    pub user_movies: UserMoviesView,
    pub movies_list: ListState,

    pub friends: FriendsView,
    pub friends_input: String,
    pub friends_focus: FriendsFocus,
    pub friends_results: ListState,
    pub friends_following: ListState,
    pub friends_movies: ListState,

    pub trending: TrendingView,
    pub trending_focus: TrendingFocus,
    pub trending_list: ListState,

    pub dialog: Option<Dialog>,
    pub help_scroll: u16,
    pub notice: Option<Notice>,
    /// Advanced on every `Tick`; drives the loading spinner.
    pub tick: u64,

    /// Movie id whose information lookup is in flight.
    pending_info: Option<i64>,
    pending: Vec<ApiJob>,
}

impl AppState {
    /// Builds the state around an already-restored session store.
    ///
    /// # Arguments
    ///
    /// * `session` — the session store, restored from disk
    /// * `debounce` — debounce window for both search boxes
    /// * `page_size` — items per page on every paginated list
    pub fn new(session: SessionStore, debounce: Duration, page_size: usize) -> Self {
        Self {
            mode: Mode::default(),
            history: History::new(Route::Search),
            session,
            search: SearchView::new(debounce, page_size),
            search_input: String::new(),
            search_list: ListState::default(),
            user_movies: UserMoviesView::new(page_size),
            movies_list: ListState::default(),
            friends: FriendsView::new(debounce, page_size),
            friends_input: String::new(),
            friends_focus: FriendsFocus::default(),
            friends_results: ListState::default(),
            friends_following: ListState::default(),
            friends_movies: ListState::default(),
            trending: TrendingView::new(),
            trending_focus: TrendingFocus::default(),
            trending_list: ListState::default(),
            dialog: None,
            help_scroll: 0,
            notice: None,
            tick: 0,
            pending_info: None,
            pending: Vec::new(),
        }
    }

    /// Drains the requests queued since the last call.
    pub fn take_jobs(&mut self) -> Vec<ApiJob> {
        mem::take(&mut self.pending)
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session.current()
    }

    pub fn route(&self) -> &Route {
        self.history.current()
    }

    /// Index of the top-level tab (0 = Search, 1 = My movies, 2 = Friends, 3 = Trending).
    pub fn tab_index(&self) -> usize {
        match self.history.root() {
            Route::Search | Route::MovieInfo(_) => 0,
            Route::UserMovies(_) => 1,
            Route::Friends => 2,
            Route::Trending => 3,
        }
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice { text: text.into(), is_error: false });
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice { text: text.into(), is_error: true });
    }

    // -----------------------------------------------------------------------
    // Timers and session
    // -----------------------------------------------------------------------

    /// The earliest open debounce window across both search boxes.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.search.pipeline().deadline(), self.friends.pipeline().deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Closes any elapsed debounce windows and queues the resulting searches.
    pub fn poll_queries(&mut self, now: Instant) {
        if let Some(ticket) = self.search.poll(now) {
            self.pending.push(ApiJob::SearchMovies(ticket));
        }
        let session = self.session.current();
        if let Some(search) = self.friends.poll(now, session.as_ref()) {
            self.pending.push(ApiJob::SearchUsers(search));
        }
    }

    /// Reacts to a published session change (login, register, logout).
    pub fn on_session_change(&mut self, session: Option<&Session>) {
        if let Some(command) = self.friends.on_session(session) {
            self.pending.push(ApiJob::Follow(command));
        }
        if session.is_none() && matches!(self.dialog, Some(Dialog::Rating { .. })) {
            self.close_dialog();
        }
    }

    pub fn logout(&mut self) {
        if !self.session.is_authenticated() {
            return;
        }
        self.session.logout();
        self.notify("Signed out.");
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    pub fn switch_tab(&mut self, index: usize) {
        self.pending_info = None;
        match index {
            0 => self.history.reset(Route::Search),
            1 => match self.session.current() {
                Some(session) => self.open_user_movies(session.id, true),
                None => {
                    self.notify_error("Sign in to see your movies.");
                    self.open_auth(AuthKind::Login);
                }
            },
            2 => self.history.reset(Route::Friends),
            3 => {
                self.history.reset(Route::Trending);
                self.refresh_trending();
            }
            _ => {}
        }
    }

    /// Shows `user_id`'s list, either as a new top-level tab or pushed on the
    /// current history.
    pub fn open_user_movies(&mut self, user_id: i64, as_tab: bool) {
        let session = self.session.current();
        let request = self.user_movies.open(user_id, session.as_ref());
        self.movies_list.select(Some(0));
        self.pending.push(ApiJob::LoadList(ListSlot::Screen, request));
        if as_tab {
            self.history.reset(Route::UserMovies(user_id));
        } else {
            self.history.push(Route::UserMovies(user_id));
        }
    }

    pub fn open_movie_info(&mut self, movie: Movie) {
        self.pending_info = None;
        self.history.push(Route::MovieInfo(movie));
    }

    /// Looks the movie up before showing it; falls back to what `lookup` carries.
    pub fn lookup_movie_info(&mut self, lookup: MovieLookup) {
        self.pending_info = Some(lookup.movie_id);
        self.pending.push(ApiJob::MovieInfo(lookup));
    }

    /// Pops one route. Returning to a list that was replaced reloads it.
    pub fn go_back(&mut self) -> bool {
        self.pending_info = None;
        if !self.history.back() {
            return false;
        }
        if let Route::UserMovies(user_id) = *self.history.current() {
            if self.user_movies.viewing() != Some(user_id) {
                let session = self.session.current();
                let request = self.user_movies.open(user_id, session.as_ref());
                self.movies_list.select(Some(0));
                self.pending.push(ApiJob::LoadList(ListSlot::Screen, request));
            }
        }
        true
    }

    pub fn refresh_trending(&mut self) {
        for command in self.trending.refresh() {
            self.pending.push(ApiJob::Trending(command));
        }
        self.trending_list.select(Some(0));
    }

    pub fn reload_user_movies(&mut self) {
        let session = self.session.current();
        if let Some(request) = self.user_movies.reload(session.as_ref()) {
            self.movies_list.select(Some(0));
            self.pending.push(ApiJob::LoadList(ListSlot::Screen, request));
        }
    }

    // -----------------------------------------------------------------------
    // Search boxes
    // -----------------------------------------------------------------------

    /// True when the current screen has a search box to type into.
    pub fn has_input(&self) -> bool {
        matches!(self.history.current(), Route::Search | Route::Friends)
    }

    pub fn insert_char(&mut self, c: char) {
        let now = Instant::now();
        match self.history.current() {
            Route::Search => {
                self.search_input.push(c);
                self.search.input(self.search_input.clone(), now);
            }
            Route::Friends => {
                self.friends_input.push(c);
                self.friends.input(self.friends_input.clone(), now);
            }
            _ => {}
        }
    }

    pub fn delete_char(&mut self) {
        let now = Instant::now();
        match self.history.current() {
            Route::Search => {
                if self.search_input.pop().is_some() {
                    self.search.input(self.search_input.clone(), now);
                }
            }
            Route::Friends => {
                if self.friends_input.pop().is_some() {
                    self.friends.input(self.friends_input.clone(), now);
                }
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Selection and paging
    // -----------------------------------------------------------------------

    /// The list under the cursor on the current screen, with its visible length.
    fn active_list(&mut self) -> Option<(&mut ListState, usize)> {
        match self.history.current() {
            Route::Search => {
                let len = self.search.results().page_slice().len();
                Some((&mut self.search_list, len))
            }
            Route::UserMovies(_) => {
                let len = self.user_movies.list().page_slice().len();
                Some((&mut self.movies_list, len))
            }
            Route::Friends => match self.friends_focus {
                FriendsFocus::Results => {
                    let len = self.friends.results().len();
                    Some((&mut self.friends_results, len))
                }
                FriendsFocus::Following => {
                    let len = self.friends.follow().following().len();
                    Some((&mut self.friends_following, len))
                }
                FriendsFocus::Movies => {
                    let len = self.friends.movies().list().page_slice().len();
                    Some((&mut self.friends_movies, len))
                }
            },
            Route::Trending => {
                let len = match self.trending_focus {
                    TrendingFocus::Latest => self.trending.latest().items().len(),
                    TrendingFocus::Top => self.trending.top().items().len(),
                };
                Some((&mut self.trending_list, len))
            }
            Route::MovieInfo(_) => None,
        }
    }

    pub fn move_selection(&mut self, delta: i32) {
        let Some((list, len)) = self.active_list() else {
            return;
        };
        if len == 0 {
            list.select(None);
            return;
        }
        let current = list.selected().unwrap_or(0) as i64;
        let next = (current + i64::from(delta)).clamp(0, len as i64 - 1);
        list.select(Some(next as usize));
    }

    /// The paginated list view on the current screen, if any.
    fn active_pages(&mut self) -> Option<Paged<'_>> {
        match self.history.current() {
            Route::Search => Some(Paged::Movies(self.search.results_mut(), &mut self.search_list)),
            Route::UserMovies(_) => {
                Some(Paged::Rated(self.user_movies.list_mut(), &mut self.movies_list))
            }
            Route::Friends if self.friends_focus == FriendsFocus::Movies => Some(Paged::Rated(
                self.friends.movies_mut().list_mut(),
                &mut self.friends_movies,
            )),
            _ => None,
        }
    }

    pub fn next_page(&mut self) {
        if let Some(paged) = self.active_pages() {
            paged.apply(|movies| movies.next_page(), |rated| rated.next_page());
        }
    }

    pub fn previous_page(&mut self) {
        if let Some(paged) = self.active_pages() {
            paged.apply(|movies| movies.previous_page(), |rated| rated.previous_page());
        }
    }

    pub fn cycle_sort(&mut self) {
        if let Some(paged) = self.active_pages() {
            paged.apply(
                |movies| {
                    movies.cycle_sort();
                    true
                },
                |rated| {
                    rated.cycle_sort();
                    true
                },
            );
        }
    }

    pub fn selected_search_movie(&self) -> Option<Movie> {
        let index = self.search_list.selected()?;
        self.search.results().page_slice().get(index).cloned()
    }

    pub fn selected_user_movie(&self) -> Option<UserMovie> {
        let index = self.movies_list.selected()?;
        self.user_movies.list().page_slice().get(index).cloned()
    }

    pub fn selected_friend_movie(&self) -> Option<UserMovie> {
        let index = self.friends_movies.selected()?;
        self.friends.movies().list().page_slice().get(index).cloned()
    }

    pub fn selected_friend(&self) -> Option<User> {
        match self.friends_focus {
            FriendsFocus::Results => {
                let index = self.friends_results.selected()?;
                self.friends.results().get(index).cloned()
            }
            FriendsFocus::Following => {
                let index = self.friends_following.selected()?;
                self.friends.follow().following().get(index).cloned()
            }
            FriendsFocus::Movies => self.friends.selected().cloned(),
        }
    }

    /// `(movie id, title, poster)` of the trending entry under the cursor.
    fn selected_trending(&self) -> Option<(i64, String, Option<String>)> {
        let index = self.trending_list.selected()?;
        match self.trending_focus {
            TrendingFocus::Latest => self
                .trending
                .latest()
                .items()
                .get(index)
                .map(|r| (r.movie_id, r.title.clone(), r.poster_url.clone())),
            TrendingFocus::Top => self
                .trending
                .top()
                .items()
                .get(index)
                .map(|t| (t.movie_id, t.title.clone(), t.poster_url.clone())),
        }
    }

    // -----------------------------------------------------------------------
    // Actions on the selection
    // -----------------------------------------------------------------------

    /// `Enter`: open whatever is under the cursor.
    pub fn activate(&mut self) {
        match self.history.current() {
            Route::Search => {
                if let Some(movie) = self.selected_search_movie() {
                    self.open_movie_info(movie);
                }
            }
            Route::UserMovies(_) => {
                if let Some(item) = self.selected_user_movie() {
                    self.lookup_movie_info(self.user_movies.info_lookup(&item));
                }
            }
            Route::Friends => match self.friends_focus {
                FriendsFocus::Results | FriendsFocus::Following => {
                    if let Some(user) = self.selected_friend() {
                        let session = self.session.current();
                        let request = self.friends.select_user(user, session.as_ref());
                        self.friends_movies.select(Some(0));
                        self.pending.push(ApiJob::LoadList(ListSlot::Friends, request));
                        self.friends_focus = FriendsFocus::Movies;
                    }
                }
                FriendsFocus::Movies => {
                    if let Some(item) = self.selected_friend_movie() {
                        self.lookup_movie_info(self.friends.movies().info_lookup(&item));
                    }
                }
            },
            Route::Trending => {
                if let Some((movie_id, title, poster)) = self.selected_trending() {
                    self.lookup_movie_info(MovieLookup::titled(movie_id, &title, poster));
                }
            }
            Route::MovieInfo(_) => {}
        }
    }

    /// `o` on the friends screen: open the selected user's list full-screen.
    pub fn open_selected_friend_list(&mut self) {
        if let Some(user) = self.friends.selected().cloned() {
            self.open_user_movies(user.id, false);
        }
    }

    pub fn toggle_follow(&mut self) {
        if !matches!(self.history.current(), Route::Friends) {
            return;
        }
        if !self.session.is_authenticated() {
            self.notify_error("Sign in to follow users.");
            return;
        }
        if let Some(command) = self.friends.toggle_follow_selected() {
            self.pending.push(ApiJob::Follow(command));
        }
    }

    pub fn toggle_review(&mut self) {
        match self.history.current() {
            Route::UserMovies(_) => {
                if let Some(item) = self.selected_user_movie() {
                    self.user_movies.toggle_review(item.movie_id);
                }
            }
            Route::Friends if self.friends_focus == FriendsFocus::Movies => {
                if let Some(item) = self.selected_friend_movie() {
                    self.friends.movies_mut().toggle_review(item.movie_id);
                }
            }
            _ => {}
        }
    }

    pub fn delete_selected(&mut self) {
        let session = self.session.current();
        let job = match self.history.current() {
            Route::UserMovies(_) => self.selected_user_movie().and_then(|item| {
                self.user_movies
                    .delete(item.movie_id, session.as_ref())
                    .map(|command| ApiJob::Delete(ListSlot::Screen, command))
            }),
            Route::Friends if self.friends_focus == FriendsFocus::Movies => {
                self.selected_friend_movie().and_then(|item| {
                    self.friends
                        .movies_mut()
                        .delete(item.movie_id, session.as_ref())
                        .map(|command| ApiJob::Delete(ListSlot::Friends, command))
                })
            }
            _ => return,
        };
        match job {
            Some(job) => self.pending.push(job),
            None => self.notify_error("Only the owner can remove movies from this list."),
        }
    }

    // -----------------------------------------------------------------------
    // Dialogs
    // -----------------------------------------------------------------------

    pub fn open_auth(&mut self, kind: AuthKind) {
        self.dialog = Some(Dialog::Auth(AuthForm::new(kind)));
        self.mode = Mode::Dialog;
    }

    /// `a`: rate the movie under the cursor, pre-filled from the viewer's list.
    pub fn open_rating_for_selection(&mut self) {
        let target = match self.history.current() {
            Route::Search => self.selected_search_movie().map(|m| (m, None)),
            Route::MovieInfo(movie) => Some((movie.clone(), None)),
            Route::UserMovies(_) => self
                .selected_user_movie()
                .map(|item| (Movie::fallback_for(&item), Some(item))),
            _ => None,
        };
        if let Some((movie, existing)) = target {
            self.open_rating(movie, existing);
        }
    }

    pub fn open_rating(&mut self, movie: Movie, existing: Option<UserMovie>) {
        let session = self.session.current();
        let existing = existing.or_else(|| {
            self.user_movies
                .is_owner(session.as_ref())
                .then(|| {
                    self.user_movies.list().items().iter().find(|m| m.movie_id == movie.id).cloned()
                })
                .flatten()
        });
        let mut form = RatingForm::open(Some(movie), session.as_ref());
        if let Some(item) = &existing {
            form = form.with_existing(item);
        }
        self.dialog = Some(Dialog::Rating { form, field: RatingField::Rating });
        self.mode = Mode::Dialog;
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
        self.mode = Mode::Normal;
    }

    pub fn submit_dialog(&mut self) {
        let session = self.session.current();
        match self.dialog.as_mut() {
            Some(Dialog::Auth(form)) => {
                if form.submitting {
                    return;
                }
                match form.job() {
                    Ok(job) => {
                        form.submitting = true;
                        form.error = None;
                        self.pending.push(job);
                    }
                    Err(e) => form.error = Some(e.user_message()),
                }
            }
            Some(Dialog::Rating { form, .. }) => {
                if let Ok(command) = form.submit(session.as_ref()) {
                    self.pending.push(ApiJob::Rate(command));
                }
            }
            None => {}
        }
    }

    // -----------------------------------------------------------------------
    // Outcomes
    // -----------------------------------------------------------------------

    /// Applies a finished request.
    pub fn apply(&mut self, outcome: ApiOutcome) {
        match outcome {
            ApiOutcome::Auth(result) => self.apply_auth(result),
            ApiOutcome::MovieSearch(response) => {
                if self.search.apply(response) {
                    self.search_list.select(Some(0));
                }
            }
            ApiOutcome::UserSearch(response) => {
                if self.friends.apply_search(response) {
                    self.friends_results.select(Some(0));
                }
            }
            ApiOutcome::Follow(outcome) => self.friends.apply_follow(outcome),
            ApiOutcome::ListLoaded(ListSlot::Screen, loaded) => {
                if self.user_movies.apply_loaded(loaded) {
                    self.movies_list.select(Some(0));
                }
            }
            ApiOutcome::ListLoaded(ListSlot::Friends, loaded) => {
                if self.friends.movies_mut().apply_loaded(loaded) {
                    self.friends_movies.select(Some(0));
                }
            }
            ApiOutcome::Deleted(slot, outcome) => {
                let ok = outcome.result.is_ok();
                match slot {
                    ListSlot::Screen => self.user_movies.apply_delete(outcome),
                    ListSlot::Friends => self.friends.movies_mut().apply_delete(outcome),
                }
                if ok {
                    self.notify("Removed from the list.");
                }
            }
            ApiOutcome::Rated(outcome) => self.apply_rating(outcome),
            ApiOutcome::Trending(outcome) => self.trending.apply(outcome),
            ApiOutcome::MovieInfo(movie) => {
                if self.pending_info == Some(movie.id) {
                    self.open_movie_info(movie);
                }
            }
        }
    }

    fn apply_auth(&mut self, result: Result<Session, ApiError>) {
        match self.session.complete_auth(result) {
            Ok(session) => {
                if matches!(self.dialog, Some(Dialog::Auth(_))) {
                    self.close_dialog();
                }
                self.notify(format!("Signed in as {}.", session.username));
            }
            Err(e) => {
                if let Some(Dialog::Auth(form)) = self.dialog.as_mut() {
                    form.submitting = false;
                    form.error = Some(e.user_message());
                }
            }
        }
    }

    fn apply_rating(&mut self, outcome: RatingOutcome) {
        let owner_id = outcome.user_id;
        let saved = match self.dialog.as_mut() {
            Some(Dialog::Rating { form, .. }) => form.apply(outcome),
            _ => outcome.result.ok(),
        };
        let Some(item) = saved else {
            return;
        };
        self.user_movies.apply_rating(owner_id, item.clone());
        self.friends.movies_mut().apply_rating(owner_id, item.clone());
        if matches!(self.dialog, Some(Dialog::Rating { .. })) {
            self.close_dialog();
        }
        self.notify(format!("Saved {}.", item.movie_title));
    }
}

/// Mutable access to one of the two paginated list shapes.
enum Paged<'a> {
    Movies(&'a mut ListView<Movie>, &'a mut ListState),
    Rated(&'a mut ListView<UserMovie>, &'a mut ListState),
}

impl Paged<'_> {
    /// Runs the matching closure; when it reports a change the cursor returns
    /// to the top of the page.
    fn apply(
        self,
        movies: impl FnOnce(&mut ListView<Movie>) -> bool,
        rated: impl FnOnce(&mut ListView<UserMovie>) -> bool,
    ) {
        let (changed, list) = match self {
            Paged::Movies(view, list) => (movies(view), list),
            Paged::Rated(view, list) => (rated(view), list),
        };
        if changed {
            list.select(Some(0));
        }
    }
}
