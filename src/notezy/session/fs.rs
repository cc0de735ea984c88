use super::hasher::{Argon2Hasher, Hasher};
use super::{validate_sign_up, SessionProvider};
use crate::error::AuthError;
use crate::model::{Credential, Identity};
use crate::store::fs::write_atomic;
use crate::store::lock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const ACCOUNTS_FILENAME: &str = "accounts.json";
const SESSION_FILENAME: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    id: Identity,
    password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    id: Identity,
}

/// Session provider persisted under a data directory, so a session
/// survives between process invocations.
pub struct FileSessionProvider {
    root: PathBuf,
    hasher: Box<dyn Hasher>,
    writes: Mutex<()>,
}

impl FileSessionProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_hasher(root, Argon2Hasher::default())
    }

    pub fn with_hasher(root: impl Into<PathBuf>, hasher: impl Hasher + 'static) -> Self {
        Self {
            root: root.into(),
            hasher: Box::new(hasher),
            writes: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn io_error(error: impl std::fmt::Display) -> AuthError {
        AuthError::Backend(error.to_string())
    }

    fn load_accounts(&self) -> Result<HashMap<String, Account>, AuthError> {
        let path = self.root.join(ACCOUNTS_FILENAME);
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path).map_err(Self::io_error)?;
        serde_json::from_str(&content).map_err(Self::io_error)
    }

    fn save_accounts(&self, accounts: &HashMap<String, Account>) -> Result<(), AuthError> {
        fs::create_dir_all(&self.root).map_err(Self::io_error)?;
        let content = serde_json::to_string_pretty(accounts).map_err(Self::io_error)?;
        write_atomic(&self.root, ACCOUNTS_FILENAME, &content).map_err(Self::io_error)
    }

    fn save_session(&self, id: &Identity) -> Result<(), AuthError> {
        fs::create_dir_all(&self.root).map_err(Self::io_error)?;
        let content =
            serde_json::to_string_pretty(&SessionFile { id: id.clone() }).map_err(Self::io_error)?;
        write_atomic(&self.root, SESSION_FILENAME, &content).map_err(Self::io_error)
    }
}

impl SessionProvider for FileSessionProvider {
    fn current_identity(&self) -> Option<Identity> {
        let path = self.root.join(SESSION_FILENAME);
        if !path.exists() {
            return None;
        }
        let parsed = fs::read_to_string(&path)
            .map_err(Self::io_error)
            .and_then(|content| {
                serde_json::from_str::<SessionFile>(&content).map_err(Self::io_error)
            });
        match parsed {
            Ok(session) => Some(session.id),
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "ignoring unreadable session file");
                None
            }
        }
    }

    fn sign_in(&self, credential: &Credential) -> Result<Identity, AuthError> {
        let accounts = self.load_accounts()?;
        let account = accounts
            .get(&credential.normalized_email())
            .filter(|a| self.hasher.check_hash(&a.password_hash, &credential.password))
            .ok_or(AuthError::InvalidCredential)?;
        self.save_session(&account.id)?;
        tracing::info!(user = %account.id, "signed in");
        Ok(account.id.clone())
    }

    fn sign_up(&self, credential: &Credential) -> Result<Identity, AuthError> {
        validate_sign_up(credential)?;
        let email = credential.normalized_email();

        let _guard = lock(&self.writes);
        let mut accounts = self.load_accounts()?;
        if accounts.contains_key(&email) {
            return Err(AuthError::EmailInUse(email));
        }
        let account = Account {
            id: Identity::generate(),
            password_hash: self.hasher.generate_hash(&credential.password)?,
        };
        let id = account.id.clone();
        accounts.insert(email, account);
        self.save_accounts(&accounts)?;
        self.save_session(&id)?;
        tracing::info!(user = %id, "account created");
        Ok(id)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        let path = self.root.join(SESSION_FILENAME);
        if !path.exists() {
            return Err(AuthError::NotSignedIn);
        }
        fs::remove_file(path).map_err(Self::io_error)?;
        tracing::info!("signed out");
        Ok(())
    }
}
