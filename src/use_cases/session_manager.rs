use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::errors::SessionError;
use crate::domain::ports::{SessionStorage, TokenSource};
use crate::domain::session::{Role, Session, UserRecord, keys};

#[derive(Debug)]
struct SessionState {
    user: Option<UserRecord>,
    role: Option<Role>,
    token: Option<String>,
    refresh_token: Option<String>,
    // False while the persisted `token` key may disagree with `token`.
    token_synced: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            role: None,
            token: None,
            refresh_token: None,
            token_synced: true,
        }
    }
}

impl SessionState {
    fn snapshot(&self) -> Option<Session> {
        match (&self.user, self.role, &self.token) {
            (Some(user), Some(role), Some(token)) => Some(Session {
                user: user.clone(),
                role,
                token: token.clone(),
                refresh_token: self.refresh_token.clone(),
            }),
            _ => None,
        }
    }
}

/// Single source of truth for who is signed in and as what.
///
/// Every mutation is written through to [`SessionStorage`] on a best-effort
/// basis: a storage failure is logged and the session carries on in memory
/// only, which means it will not survive a restart.
pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Loads a persisted session. Only a complete user/role/token triple
    /// counts; anything that fails to parse is discarded and treated as
    /// no session.
    pub fn restore(&self) -> Option<Session> {
        let restored = self.load_persisted();
        let mut state = self.write_state();
        *state = SessionState::default();

        let (user, role, token, refresh_token) = restored?;
        state.user = Some(user);
        state.role = Some(role);
        state.token = Some(token);
        state.refresh_token = refresh_token;
        tracing::info!(role = %role, "session restored.");
        state.snapshot()
    }

    fn load_persisted(&self) -> Option<(UserRecord, Role, String, Option<String>)> {
        let raw_user = self.read_key(keys::USER);
        let raw_role = self.read_key(keys::ROLE);
        let raw_token = self.read_key(keys::TOKEN);
        let (Some(raw_user), Some(raw_role), Some(token)) = (raw_user, raw_role, raw_token) else {
            return None;
        };

        let user = match serde_json::from_str::<UserRecord>(&raw_user) {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err, "persisted user record is corrupt; discarding session.");
                self.discard_persisted();
                return None;
            }
        };
        let role = match raw_role.parse::<Role>() {
            Ok(role) => role,
            Err(err) => {
                tracing::warn!(error = %err, "persisted role is corrupt; discarding session.");
                self.discard_persisted();
                return None;
            }
        };
        if token.trim().is_empty() {
            tracing::warn!("persisted token is blank; discarding session.");
            self.discard_persisted();
            return None;
        }

        let refresh_token = self.read_key(keys::REFRESH_TOKEN);
        Some((user, role, token, refresh_token))
    }

    // Records a freshly authenticated user. The token is set separately.
    pub fn login(&self, user: UserRecord, role: Role) {
        match serde_json::to_string(&user) {
            Ok(serialized) => {
                self.persist(keys::USER, Some(&serialized));
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize user record; keeping it in memory only.");
            }
        }
        self.persist(keys::ROLE, Some(role.as_str()));

        let mut state = self.write_state();
        state.user = Some(user);
        state.role = Some(role);
        tracing::info!(role = %role, "user signed in.");
    }

    pub fn set_token(&self, token: Option<String>) {
        let synced = self.persist(keys::TOKEN, token.as_deref());
        let mut state = self.write_state();
        state.token = token;
        state.token_synced = synced;
    }

    pub fn set_refresh_token(&self, token: Option<String>) {
        self.persist(keys::REFRESH_TOKEN, token.as_deref());
        self.write_state().refresh_token = token;
    }

    // Token, refresh token and identity in one step, as every sign-in flow needs.
    pub fn establish(
        &self,
        user: UserRecord,
        role: Role,
        token: String,
        refresh_token: Option<String>,
    ) -> Session {
        self.set_token(Some(token.clone()));
        self.set_refresh_token(refresh_token.clone());
        self.login(user.clone(), role);
        Session {
            user,
            role,
            token,
            refresh_token,
        }
    }

    pub fn logout(&self) {
        {
            let mut state = self.write_state();
            state.user = None;
            state.role = None;
            state.refresh_token = None;
        }
        for key in keys::ALL {
            if key != keys::TOKEN {
                self.persist(key, None);
            }
        }
        self.set_token(None);
        tracing::info!("user signed out.");
    }

    pub fn current(&self) -> Option<Session> {
        self.read_state().snapshot()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.current().map(|session| session.role)
    }

    // Guard for views restricted to a single role.
    pub fn require(&self, role: Role) -> Result<Session, SessionError> {
        let session = self
            .current()
            .ok_or(SessionError::NotAuthenticated { required: Some(role) })?;
        if session.role != role {
            return Err(SessionError::WrongRole {
                expected: role,
                actual: session.role,
            });
        }
        Ok(session)
    }

    pub fn redirect_target(&self) -> Option<&'static str> {
        self.role().map(Role::dashboard_path)
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read session storage.");
                None
            }
        }
    }

    // Returns whether storage now holds `value` for `key`.
    fn persist(&self, key: &str, value: Option<&str>) -> bool {
        let result = match value {
            Some(value) => self.storage.set(key, value),
            None => self.storage.remove(key),
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, error = %err, "session storage unavailable; continuing in memory only.");
                false
            }
        }
    }

    fn discard_persisted(&self) {
        for key in keys::ALL {
            self.persist(key, None);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenSource for SessionManager {
    // Storage is re-read so tokens written by other flows are picked up.
    // Once a token write has failed the stored value is stale, so memory
    // answers until the next successful write.
    fn current_token(&self) -> Option<String> {
        let (token, synced) = {
            let state = self.read_state();
            (state.token.clone(), state.token_synced)
        };
        if !synced {
            return token;
        }
        self.read_key(keys::TOKEN)
            .filter(|stored| !stored.is_empty())
            .or(token)
    }
}
