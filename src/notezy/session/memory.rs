use super::{validate_sign_up, SessionProvider};
use crate::error::AuthError;
use crate::model::{Credential, Identity};
use crate::store::lock;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Accounts {
    by_email: HashMap<String, (Identity, String)>,
    current: Option<Identity>,
}

/// In-memory session provider for testing and embedding.
/// Passwords are compared as plain text; never feed it real credentials.
#[derive(Default)]
pub struct InMemorySessionProvider {
    accounts: Mutex<Accounts>,
}

impl InMemorySessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider already signed in as `identity`, with no accounts.
    pub fn signed_in(identity: Identity) -> Self {
        let provider = Self::default();
        lock(&provider.accounts).current = Some(identity);
        provider
    }
}

impl SessionProvider for InMemorySessionProvider {
    fn current_identity(&self) -> Option<Identity> {
        lock(&self.accounts).current.clone()
    }

    fn sign_in(&self, credential: &Credential) -> Result<Identity, AuthError> {
        let mut accounts = lock(&self.accounts);
        let identity = match accounts.by_email.get(&credential.normalized_email()) {
            Some((identity, password)) if *password == credential.password => identity.clone(),
            _ => return Err(AuthError::InvalidCredential),
        };
        accounts.current = Some(identity.clone());
        Ok(identity)
    }

    fn sign_up(&self, credential: &Credential) -> Result<Identity, AuthError> {
        validate_sign_up(credential)?;
        let email = credential.normalized_email();
        let mut accounts = lock(&self.accounts);
        if accounts.by_email.contains_key(&email) {
            return Err(AuthError::EmailInUse(email));
        }
        let identity = Identity::generate();
        accounts
            .by_email
            .insert(email, (identity.clone(), credential.password.clone()));
        accounts.current = Some(identity.clone());
        Ok(identity)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        match lock(&self.accounts).current.take() {
            Some(_) => Ok(()),
            None => Err(AuthError::NotSignedIn),
        }
    }
}
