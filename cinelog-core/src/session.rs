//! Persisted authentication session.
//!
//! [`SessionStore`] is the only owner of the live [`Session`]. Everyone else reads
//! it through [`SessionStore::current`] or follows changes through the `watch`
//! channel returned by [`SessionStore::subscribe`].
//!
//! The persisted record is a trust boundary: [`decode_session`] accepts exactly
//! the four expected fields with the expected primitive types and nothing else.
//! A record that fails the check is deleted on restore and the store starts
//! signed out, without surfacing an error.

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::watch;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::kv::KvStore;
use crate::types::{LoginPayload, RegisterPayload, Session};

/// Storage key of the persisted session record.
pub const SESSION_KEY: &str = "authUser";

const SESSION_FIELDS: [&str; 4] = ["id", "username", "email", "token"];

/// Why a persisted session record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("not valid JSON: {0}")]
    Json(String),
    #[error("expected a JSON object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    Missing(&'static str),
    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),
    #[error("unexpected field `{0}`")]
    Unexpected(String),
}

/// Decodes and structurally validates a persisted session record.
///
/// All-or-nothing: `id` must be an integer, the other three fields strings, and
/// no other fields may be present.
pub fn decode_session(bytes: &[u8]) -> Result<Session, ShapeError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| ShapeError::Json(e.to_string()))?;
    let object = value.as_object().ok_or(ShapeError::NotAnObject)?;

    if let Some(extra) = object.keys().find(|k| !SESSION_FIELDS.contains(&k.as_str())) {
        return Err(ShapeError::Unexpected(extra.clone()));
    }

    let id = field(object, "id")?.as_i64().ok_or(ShapeError::WrongType("id"))?;
    Ok(Session {
        id,
        username: string_field(object, "username")?,
        email: string_field(object, "email")?,
        token: string_field(object, "token")?,
    })
}

fn field<'a>(object: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, ShapeError> {
    object.get(name).ok_or(ShapeError::Missing(name))
}

fn string_field(object: &Map<String, Value>, name: &'static str) -> Result<String, ShapeError> {
    field(object, name)?
        .as_str()
        .map(str::to_owned)
        .ok_or(ShapeError::WrongType(name))
}

/// Rejects empty login credentials before any request is made.
pub fn validate_login(payload: &LoginPayload) -> Result<(), ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("Username is required."));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required."));
    }
    Ok(())
}

/// Rejects incomplete registration forms before any request is made.
pub fn validate_register(payload: &RegisterPayload) -> Result<(), ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("Username is required."));
    }
    let email = payload.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::validation("A valid email address is required."));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required."));
    }
    Ok(())
}

/// Single owner of "who is logged in", durable across restarts.
pub struct SessionStore {
    storage: Box<dyn KvStore>,
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Creates a signed-out store over `storage` without reading it.
    pub fn new(storage: Box<dyn KvStore>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { storage, tx }
    }

    /// Creates a store and immediately runs [`SessionStore::restore`].
    pub fn restore_on_startup(storage: Box<dyn KvStore>) -> Self {
        let mut store = Self::new(storage);
        store.restore();
        store
    }

    /// Reads the persisted record and publishes it if it passes validation.
    ///
    /// A corrupt or mis-shaped record is removed from storage and the store
    /// stays signed out. Storage read failures are logged and treated as
    /// "nothing persisted".
    pub fn restore(&mut self) -> Option<Session> {
        let bytes = match self.storage.get(SESSION_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read persisted session");
                return None;
            }
        };

        match decode_session(&bytes) {
            Ok(session) => {
                tracing::info!(user_id = session.id, "restored session");
                self.tx.send_replace(Some(session.clone()));
                Some(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding persisted session record");
                if let Err(e) = self.storage.remove(SESSION_KEY) {
                    tracing::warn!(error = %e, "could not remove persisted session record");
                }
                self.tx.send_replace(None);
                None
            }
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// A receiver that observes every publish (login, register, logout, restore).
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    /// Read access to the backing store.
    pub fn storage(&self) -> &dyn KvStore {
        self.storage.as_ref()
    }

    /// Validates `payload`, calls the login endpoint, and applies the outcome.
    pub async fn login(
        &mut self,
        api: &dyn ApiClient,
        payload: &LoginPayload,
    ) -> Result<Session, ApiError> {
        validate_login(payload)?;
        let result = api.login(payload).await;
        self.complete_auth(result)
    }

    /// Same contract as [`SessionStore::login`], against the register endpoint.
    pub async fn register(
        &mut self,
        api: &dyn ApiClient,
        payload: &RegisterPayload,
    ) -> Result<Session, ApiError> {
        validate_register(payload)?;
        let result = api.register(payload).await;
        self.complete_auth(result)
    }

    /// Applies the outcome of a login/register call made elsewhere.
    ///
    /// On success the session is persisted and published. On failure the
    /// current session, if any, is left untouched and the error is returned.
    pub fn complete_auth(&mut self, result: Result<Session, ApiError>) -> Result<Session, ApiError> {
        match result {
            Ok(session) => {
                self.persist(&session);
                tracing::info!(user_id = session.id, "signed in");
                self.tx.send_replace(Some(session.clone()));
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "authentication failed");
                Err(e)
            }
        }
    }

    /// Clears the persisted record and publishes "signed out". Never fails.
    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            tracing::warn!(error = %e, "could not remove persisted session record");
        }
        if self.tx.send_replace(None).is_some() {
            tracing::info!("signed out");
        }
    }

    fn persist(&mut self, session: &Session) {
        let bytes = match serde_json::to_vec(session) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode session");
                return;
            }
        };
        if let Err(e) = self.storage.set(SESSION_KEY, &bytes) {
            tracing::warn!(error = %e, "could not persist session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_well_formed_record() {
        let session = decode_session(
            br#"{"id":4,"username":"ana","email":"ana@example.com","token":"t0k"}"#,
        )
        .unwrap();
        assert_eq!(session.id, 4);
        assert_eq!(session.token, "t0k");
    }

    #[test]
    fn rejects_missing_token() {
        let err = decode_session(br#"{"id":4,"username":"ana","email":"a@b.c"}"#).unwrap_err();
        assert_eq!(err, ShapeError::Missing("token"));
    }

    #[test]
    fn rejects_wrong_primitive_types() {
        let err = decode_session(br#"{"id":"4","username":"ana","email":"a@b.c","token":"t"}"#)
            .unwrap_err();
        assert_eq!(err, ShapeError::WrongType("id"));
        let err = decode_session(br#"{"id":4.5,"username":"ana","email":"a@b.c","token":"t"}"#)
            .unwrap_err();
        assert_eq!(err, ShapeError::WrongType("id"));
        let err = decode_session(br#"{"id":4,"username":null,"email":"a@b.c","token":"t"}"#)
            .unwrap_err();
        assert_eq!(err, ShapeError::WrongType("username"));
    }

    #[test]
    fn rejects_extra_fields_and_non_objects() {
        let err = decode_session(
            br#"{"id":4,"username":"ana","email":"a@b.c","token":"t","admin":true}"#,
        )
        .unwrap_err();
        assert_eq!(err, ShapeError::Unexpected("admin".into()));
        assert_eq!(decode_session(b"[1,2]").unwrap_err(), ShapeError::NotAnObject);
        assert!(matches!(decode_session(b"{oops").unwrap_err(), ShapeError::Json(_)));
    }

    #[test]
    fn register_requires_an_email() {
        let payload = RegisterPayload {
            username: "ana".into(),
            email: "not-an-email".into(),
            password: "pw".into(),
        };
        assert!(matches!(validate_register(&payload), Err(ApiError::Validation(_))));
    }

    #[test]
    fn login_rejects_blank_username() {
        let payload = LoginPayload { username: "   ".into(), password: "pw".into() };
        assert_eq!(
            validate_login(&payload),
            Err(ApiError::validation("Username is required."))
        );
    }
}
