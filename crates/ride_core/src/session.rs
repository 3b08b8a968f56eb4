//! Session credentials and the client-side session context.
//!
//! The context is created once by the application root and handed to every
//! gate and logout action that needs it. Access is single-threaded, so the
//! shared store is an `Rc<RefCell<..>>` rather than a lock.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("credential must not be blank")]
    Blank,
}

/// Opaque per-role session token. `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Result<Self, CredentialError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CredentialError::Blank);
        }
        Ok(Self(token))
    }

    /// Raw token, for building the authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Client-wide credential storage keyed by role token key.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    credentials: Rc<RefCell<HashMap<String, Credential>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a credential after login or signup, replacing any previous one.
    pub fn store(&self, token_key: &str, credential: Credential) {
        self.credentials
            .borrow_mut()
            .insert(token_key.to_string(), credential);
    }

    /// Current credential for `token_key`. Always reads the live store.
    pub fn credential(&self, token_key: &str) -> Option<Credential> {
        self.credentials.borrow().get(token_key).cloned()
    }

    /// Remove the credential; returns whether one was present.
    pub fn clear(&self, token_key: &str) -> bool {
        self.credentials.borrow_mut().remove(token_key).is_some()
    }

    pub fn contains(&self, token_key: &str) -> bool {
        self.credentials.borrow().contains_key(token_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credentials_are_rejected() {
        assert_eq!(Credential::new("   "), Err(CredentialError::Blank));
        assert!(Credential::new("abc").is_ok());
    }

    #[test]
    fn debug_output_redacts_token() {
        let credential = Credential::new("secret-token").expect("credential");
        assert!(!format!("{credential:?}").contains("secret-token"));
    }

    #[test]
    fn clones_share_the_same_store() {
        let session = SessionContext::new();
        let handle = session.clone();
        session.store("token", Credential::new("abc").expect("credential"));

        assert!(handle.contains("token"));
        assert!(handle.clear("token"));
        assert!(session.credential("token").is_none());
        assert!(!session.clear("token"));
    }
}
