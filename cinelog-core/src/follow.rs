//! The viewer's followee set.
//!
//! [`FollowGraphSync`] holds who the signed-in viewer follows. It is rebuilt from
//! the server whenever the viewer changes and patched after each confirmed
//! follow/unfollow; nothing is inserted or removed before the server agrees.
//!
//! Every command is stamped with the epoch that was current when it was built.
//! Signing out or switching accounts bumps the epoch, so outcomes that belong to
//! a previous viewer are dropped on arrival.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::types::{Session, User};

pub const LOAD_FAILED_MESSAGE: &str = "Unable to load the users you follow right now.";
pub const FOLLOW_FAILED_MESSAGE: &str = "Unable to follow this user right now.";
pub const UNFOLLOW_FAILED_MESSAGE: &str = "Unable to unfollow this user right now.";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Viewer {
    id: i64,
    token: String,
}

/// A follow-graph request to run against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowCommand {
    LoadFollowing { epoch: u64, viewer_id: i64, token: String },
    Follow { epoch: u64, viewer_id: i64, token: String, target: User },
    Unfollow { epoch: u64, viewer_id: i64, token: String, target: User },
}

/// The result of running a [`FollowCommand`].
#[derive(Debug, Clone)]
pub enum FollowOutcome {
    Loaded { epoch: u64, result: Result<Vec<User>, ApiError> },
    Followed { epoch: u64, result: Result<User, ApiError> },
    Unfollowed { epoch: u64, target: User, result: Result<(), ApiError> },
}

impl FollowCommand {
    pub async fn execute(self, api: &dyn ApiClient) -> FollowOutcome {
        match self {
            FollowCommand::LoadFollowing { epoch, viewer_id, token } => FollowOutcome::Loaded {
                epoch,
                result: api.following(viewer_id, &token).await,
            },
            FollowCommand::Follow { epoch, viewer_id, token, target } => FollowOutcome::Followed {
                epoch,
                result: api.follow(viewer_id, target.id, &token).await,
            },
            FollowCommand::Unfollow { epoch, viewer_id, token, target } => {
                let result = api.unfollow(viewer_id, target.id, &token).await;
                FollowOutcome::Unfollowed { epoch, target, result }
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct FollowGraphSync {
    viewer: Option<Viewer>,
    following: Vec<User>,
    loading: bool,
    pending: usize,
    error: Option<String>,
    epoch: u64,
}

impl FollowGraphSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reacts to a session change.
    ///
    /// Returns the initial load when a (different) viewer appears. When the
    /// viewer goes away the set and error are cleared synchronously. Publishing
    /// the same viewer again is a no-op.
    pub fn on_session(&mut self, session: Option<&Session>) -> Option<FollowCommand> {
        let next = session.map(|s| Viewer { id: s.id, token: s.token.clone() });
        if next == self.viewer {
            return None;
        }

        self.epoch += 1;
        self.following.clear();
        self.error = None;
        self.pending = 0;
        self.viewer = next;

        match &self.viewer {
            Some(viewer) => {
                tracing::debug!(viewer_id = viewer.id, epoch = self.epoch, "loading followees");
                self.loading = true;
                Some(FollowCommand::LoadFollowing {
                    epoch: self.epoch,
                    viewer_id: viewer.id,
                    token: viewer.token.clone(),
                })
            }
            None => {
                self.loading = false;
                None
            }
        }
    }

    /// Builds a follow request. `None` without a viewer or when `target` is the viewer.
    pub fn follow(&mut self, target: &User) -> Option<FollowCommand> {
        let viewer = self.mutation_viewer(target)?;
        self.pending += 1;
        Some(FollowCommand::Follow {
            epoch: self.epoch,
            viewer_id: viewer.id,
            token: viewer.token,
            target: target.clone(),
        })
    }

    /// Builds an unfollow request. Same preconditions as [`FollowGraphSync::follow`].
    pub fn unfollow(&mut self, target: &User) -> Option<FollowCommand> {
        let viewer = self.mutation_viewer(target)?;
        self.pending += 1;
        Some(FollowCommand::Unfollow {
            epoch: self.epoch,
            viewer_id: viewer.id,
            token: viewer.token,
            target: target.clone(),
        })
    }

    /// Follows `target` if not yet followed, unfollows otherwise.
    pub fn toggle(&mut self, target: &User) -> Option<FollowCommand> {
        if self.is_following(target.id) {
            self.unfollow(target)
        } else {
            self.follow(target)
        }
    }

    fn mutation_viewer(&self, target: &User) -> Option<Viewer> {
        let viewer = self.viewer.as_ref()?;
        if viewer.id == target.id {
            return None;
        }
        Some(viewer.clone())
    }

    pub fn apply(&mut self, outcome: FollowOutcome) {
        let epoch = match &outcome {
            FollowOutcome::Loaded { epoch, .. }
            | FollowOutcome::Followed { epoch, .. }
            | FollowOutcome::Unfollowed { epoch, .. } => *epoch,
        };
        if epoch != self.epoch {
            tracing::debug!(epoch, current = self.epoch, "dropping follow outcome for previous viewer");
            return;
        }

        match outcome {
            FollowOutcome::Loaded { result, .. } => {
                self.loading = false;
                match result {
                    Ok(users) => {
                        self.following.clear();
                        for user in users {
                            self.insert(user);
                        }
                        self.error = None;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "could not load followees");
                        self.following.clear();
                        self.error = Some(LOAD_FAILED_MESSAGE.to_owned());
                    }
                }
            }
            FollowOutcome::Followed { result, .. } => {
                self.pending = self.pending.saturating_sub(1);
                match result {
                    Ok(user) => {
                        self.insert(user);
                        self.error = None;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "follow failed");
                        self.error = Some(FOLLOW_FAILED_MESSAGE.to_owned());
                    }
                }
            }
            FollowOutcome::Unfollowed { target, result, .. } => {
                self.pending = self.pending.saturating_sub(1);
                match result {
                    Ok(()) => {
                        self.following.retain(|u| u.id != target.id);
                        self.error = None;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, target_id = target.id, "unfollow failed");
                        self.error = Some(UNFOLLOW_FAILED_MESSAGE.to_owned());
                    }
                }
            }
        }
    }

    /// Inserts `user` unless already present or the viewer, then re-sorts.
    fn insert(&mut self, user: User) {
        if self.viewer.as_ref().is_some_and(|v| v.id == user.id) {
            return;
        }
        if self.following.iter().any(|u| u.id == user.id) {
            return;
        }
        self.following.push(user);
        self.following
            .sort_by_cached_key(|u| (u.username.to_lowercase(), u.id));
    }

    pub fn is_following(&self, user_id: i64) -> bool {
        self.following.iter().any(|u| u.id == user_id)
    }

    /// Followees sorted by username, case-insensitively.
    pub fn following(&self) -> &[User] {
        &self.following
    }

    pub fn viewer_id(&self) -> Option<i64> {
        self.viewer.as_ref().map(|v| v.id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn mutation_pending(&self) -> bool {
        self.pending > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: i64) -> Session {
        Session {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            token: format!("token-{id}"),
        }
    }

    fn user(id: i64, name: &str) -> User {
        User { id, username: name.to_owned(), email: String::new() }
    }

    fn signed_in(id: i64) -> (FollowGraphSync, u64) {
        let mut sync = FollowGraphSync::new();
        let Some(FollowCommand::LoadFollowing { epoch, .. }) = sync.on_session(Some(&session(id)))
        else {
            panic!("expected an initial load");
        };
        sync.apply(FollowOutcome::Loaded { epoch, result: Ok(Vec::new()) });
        (sync, epoch)
    }

    #[test]
    fn load_sorts_by_username_case_insensitively_and_drops_self() {
        let mut sync = FollowGraphSync::new();
        let Some(FollowCommand::LoadFollowing { epoch, viewer_id, .. }) =
            sync.on_session(Some(&session(1)))
        else {
            panic!("expected an initial load");
        };
        assert_eq!(viewer_id, 1);
        assert!(sync.is_loading());

        sync.apply(FollowOutcome::Loaded {
            epoch,
            result: Ok(vec![user(3, "zoe"), user(1, "me"), user(2, "Adam"), user(3, "zoe")]),
        });
        let names: Vec<&str> = sync.following().iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["Adam", "zoe"]);
        assert!(!sync.is_loading());
    }

    #[test]
    fn same_viewer_does_not_reload() {
        let (mut sync, _) = signed_in(1);
        assert!(sync.on_session(Some(&session(1))).is_none());
    }

    #[test]
    fn no_mutations_without_viewer_or_on_self() {
        let mut sync = FollowGraphSync::new();
        assert!(sync.follow(&user(2, "bob")).is_none());

        let (mut sync, _) = signed_in(1);
        assert!(sync.follow(&user(1, "me")).is_none());
        assert!(sync.unfollow(&user(1, "me")).is_none());
        assert!(!sync.mutation_pending());
    }

    #[test]
    fn failed_follow_leaves_set_unchanged() {
        let (mut sync, epoch) = signed_in(1);
        sync.follow(&user(2, "bob")).unwrap();
        assert!(sync.mutation_pending());
        sync.apply(FollowOutcome::Followed {
            epoch,
            result: Err(ApiError::Transport("refused".into())),
        });
        assert!(sync.following().is_empty());
        assert_eq!(sync.error(), Some(FOLLOW_FAILED_MESSAGE));
        assert!(!sync.mutation_pending());
    }

    #[test]
    fn toggle_picks_the_inverse_operation() {
        let (mut sync, epoch) = signed_in(1);
        let bob = user(2, "bob");
        assert!(matches!(sync.toggle(&bob), Some(FollowCommand::Follow { .. })));
        sync.apply(FollowOutcome::Followed { epoch, result: Ok(bob.clone()) });
        assert!(matches!(sync.toggle(&bob), Some(FollowCommand::Unfollow { .. })));
        sync.apply(FollowOutcome::Unfollowed { epoch, target: bob.clone(), result: Ok(()) });
        assert!(!sync.is_following(2));
    }

    #[test]
    fn sign_out_clears_and_discards_late_outcomes() {
        let (mut sync, epoch) = signed_in(1);
        sync.follow(&user(2, "bob")).unwrap();
        sync.apply(FollowOutcome::Loaded {
            epoch,
            result: Err(ApiError::Transport("x".into())),
        });
        assert!(sync.error().is_some());

        assert!(sync.on_session(None).is_none());
        assert!(sync.error().is_none());
        assert!(sync.following().is_empty());

        sync.apply(FollowOutcome::Followed { epoch, result: Ok(user(2, "bob")) });
        assert!(!sync.is_following(2));
    }
}
