//! Where the bearer token comes from.

use std::sync::{PoisonError, RwLock};

/// Source of the bearer token, read on every authenticated call.
pub trait TokenStore: Send + Sync {
    /// Current token, if the user is signed in.
    fn token(&self) -> Option<String>;
}

/// A token fixed at startup, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    /// Wraps a token. Blank tokens count as missing.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.trim().is_empty()))
    }
}

impl TokenStore for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// A token that changes during a session: set on sign-in, cleared on sign-out.
#[derive(Debug, Default)]
pub struct SessionToken {
    inner: RwLock<Option<String>>,
}

impl SessionToken {
    /// Creates an empty (signed-out) session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new token.
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(token).filter(|t| !t.trim().is_empty());
    }

    /// Forgets the token.
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl TokenStore for SessionToken {
    fn token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token_blank_is_missing() {
        assert_eq!(StaticToken::new(Some("  ".into())).token(), None);
        assert_eq!(StaticToken::new(None).token(), None);
        assert_eq!(StaticToken::new(Some("abc".into())).token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_session_token_lifecycle() {
        let session = SessionToken::new();
        assert_eq!(session.token(), None);

        session.set("abc");
        assert_eq!(session.token().as_deref(), Some("abc"));

        session.clear();
        assert_eq!(session.token(), None);
    }
}
