use crate::domain::business_types::{config_for, BusinessTypeConfig};
use crate::domain::model::{Terminology, User};
use crate::domain::ports::Storage;
use crate::utils::error::{DeskError, Result};
use serde::{Deserialize, Serialize};

pub const SESSION_FILE: &str = "session.json";

/// Signed-in state shared by every view: who is logged in and which tenant
/// the requests are scoped to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    user: Option<User>,
    token: Option<String>,
    business_slug: Option<String>,
    is_authenticated: bool,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, user: User, token: impl Into<String>) {
        self.token = Some(token.into());
        if let Some(slug) = user.business.as_ref().and_then(|b| b.slug.clone()) {
            self.business_slug = Some(slug);
        }
        self.user = Some(user);
        self.is_authenticated = true;
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn business_slug(&self) -> Option<&str> {
        self.business_slug.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn require_authenticated(&self) -> Result<&User> {
        match (&self.user, self.is_authenticated) {
            (Some(user), true) => Ok(user),
            _ => Err(DeskError::NotAuthenticated),
        }
    }

    pub fn require_super_admin(&self) -> Result<&User> {
        let user = self.require_authenticated()?;
        if !user.is_super_admin {
            return Err(DeskError::PermissionDenied(
                "platform administration requires a super admin account".to_string(),
            ));
        }
        Ok(user)
    }

    pub fn business_config(&self) -> BusinessTypeConfig {
        let kind = self
            .user
            .as_ref()
            .and_then(|u| u.business.as_ref())
            .map(|b| b.business_type.as_str())
            .unwrap_or("restaurant");
        config_for(kind)
    }

    /// The business's own vocabulary if it set one, otherwise its type's.
    pub fn terminology(&self) -> Terminology {
        self.user
            .as_ref()
            .and_then(|u| u.business.as_ref())
            .and_then(|b| b.terminology.clone())
            .unwrap_or_else(|| self.business_config().terminology)
    }
}

/// Persists the session as JSON through a `Storage` backend.
pub struct SessionStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// A missing or unreadable file is a signed-out session.
    pub async fn load(&self) -> AuthSession {
        match self.storage.read_file(SESSION_FILE).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!("Discarding corrupt session file: {}", e);
                AuthSession::default()
            }),
            Err(_) => AuthSession::default(),
        }
    }

    pub async fn save(&self, session: &AuthSession) -> Result<()> {
        let data = serde_json::to_vec_pretty(session)?;
        self.storage.write_file(SESSION_FILE, &data).await?;
        tracing::debug!("Session saved");
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage.remove_file(SESSION_FILE).await
    }
}
