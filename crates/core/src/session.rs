//! In-memory authentication state

use serde::{Deserialize, Serialize};

use crate::types::{Role, UserProfile};

/// Current authentication state and profile.
///
/// `is_authenticated` only becomes true through [`Session::set_user`], so a
/// session restored from a stored token stays unauthenticated until its
/// profile has been fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
}

impl Session {
    /// Session as it looks right after startup: a persisted token at most
    pub fn with_token(token: Option<String>) -> Self {
        Self {
            token,
            user: None,
            is_authenticated: false,
        }
    }

    /// Session for a user who is signed in
    pub fn authenticated(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
            is_authenticated: true,
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn set_user(&mut self, user: UserProfile) {
        self.user = Some(user);
        self.is_authenticated = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn user_role(&self) -> Option<Role> {
        self.user.as_ref().and_then(|user| user.role)
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(|user| user.username.as_deref())
    }

    /// Account e-mail, which doubles as the login name
    pub fn user_email(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|user| user.email.as_deref().or(user.username.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor() -> UserProfile {
        UserProfile {
            username: Some("house".to_string()),
            role: Some(Role::Doctor),
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_startup_session_is_not_authenticated() {
        let session = Session::with_token(Some("stale".to_string()));
        assert_eq!(session.token.as_deref(), Some("stale"));
        assert!(!session.is_authenticated);
        assert!(session.user_role().is_none());
    }

    #[test]
    fn test_set_user_authenticates() {
        let mut session = Session::default();
        session.set_token("abc");
        assert!(!session.is_authenticated);

        session.set_user(doctor());
        assert!(session.is_authenticated);
        assert_eq!(session.user_role(), Some(Role::Doctor));
        assert_eq!(session.user_name(), Some("house"));
    }

    #[test]
    fn test_email_falls_back_to_username() {
        let mut session = Session::authenticated("abc", doctor());
        assert_eq!(session.user_email(), Some("house"));

        session.set_user(UserProfile {
            email: Some("house@ppth.org".to_string()),
            ..UserProfile::default()
        });
        assert_eq!(session.user_email(), Some("house@ppth.org"));
        assert_eq!(session.user_name(), None);
    }

    #[test]
    fn test_clear() {
        let mut session = Session::authenticated("abc", doctor());
        session.clear();
        assert_eq!(session, Session::default());
    }
}
