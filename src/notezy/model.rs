use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Store-assigned note identifier. Opaque to everything but the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user id produced by a successful sign-in or sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner_id: Identity,
    pub text: String,
    // None until the store acknowledges the write
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Note {
    pub fn new(id: NoteId, owner_id: Identity, text: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            text: text.into(),
            created_at: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Payload of a create call. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub text: String,
    pub owner_id: Identity,
}

/// Partial update; only the text is user-editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePatch {
    pub text: String,
}

/// Equality predicate for live queries: `owner_id == owner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteQuery {
    pub owner: Identity,
}

impl NoteQuery {
    pub fn owned_by(owner: Identity) -> Self {
        Self { owner }
    }

    pub fn matches(&self, note: &Note) -> bool {
        note.owner_id == self.owner
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Emails are matched case-insensitively, ignoring surrounding whitespace.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Identity,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => "User",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_matches_only_owner() {
        let query = NoteQuery::owned_by(Identity::new("u1"));
        let mine = Note::new(NoteId::new("n1"), Identity::new("u1"), "a");
        let theirs = Note::new(NoteId::new("n2"), Identity::new("u2"), "b");
        assert!(query.matches(&mine));
        assert!(!query.matches(&theirs));
    }

    #[test]
    fn display_name_falls_back_to_user() {
        let mut profile = UserProfile {
            id: Identity::new("u1"),
            email: "a@b.c".into(),
            name: None,
        };
        assert_eq!(profile.display_name(), "User");
        profile.name = Some("   ".into());
        assert_eq!(profile.display_name(), "User");
        profile.name = Some("Ada".into());
        assert_eq!(profile.display_name(), "Ada");
    }

    #[test]
    fn note_without_timestamp_deserializes() {
        let note: Note =
            serde_json::from_str(r#"{"id":"n1","owner_id":"u1","text":"hi"}"#).unwrap();
        assert_eq!(note.created_at, None);
        assert_eq!(note.id.as_str(), "n1");
    }

    #[test]
    fn normalized_email_ignores_case_and_padding() {
        let cred = Credential::new("  Ada@Example.COM ", "secret");
        assert_eq!(cred.normalized_email(), "ada@example.com");
    }
}
