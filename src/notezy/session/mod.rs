//! # Session Layer
//!
//! The [`SessionProvider`] owns the authenticated identity. The rest of the
//! crate only ever *reads* the current identity from it; signing in, signing
//! up and signing out are the provider's business.
//!
//! - [`memory::InMemorySessionProvider`]: accounts and session in memory
//! - [`fs::FileSessionProvider`]: accounts in `accounts.json` with argon2
//!   hashes, the current session in `session.json`

use crate::error::AuthError;
use crate::model::{Credential, Identity};

pub mod fs;
pub mod hasher;
pub mod memory;

pub const MIN_PASSWORD_LEN: usize = 6;

pub trait SessionProvider: Send + Sync {
    fn current_identity(&self) -> Option<Identity>;

    fn sign_in(&self, credential: &Credential) -> Result<Identity, AuthError>;

    /// Create an account; the new identity becomes the current session.
    fn sign_up(&self, credential: &Credential) -> Result<Identity, AuthError>;

    fn sign_out(&self) -> Result<(), AuthError>;
}

/// Checks shared by every provider before an account is created.
pub fn validate_sign_up(credential: &Credential) -> Result<(), AuthError> {
    let email = credential.normalized_email();
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };
    if !well_formed {
        return Err(AuthError::InvalidEmail(credential.email.trim().to_string()));
    }
    if credential.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
    }
    Ok(())
}
