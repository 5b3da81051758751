//! User data models.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Body of a create or full-replace request.
///
/// A client-supplied `id` is ignored; identifiers come from storage on create
/// and from the path on replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
}

impl UserPayload {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Attach an identifier, producing the record to store.
    pub fn with_id(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

/// Partial update. Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Merge the supplied fields into `user`.
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
    }
}

/// One page of users with navigation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPage {
    pub data: Vec<User>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub next: Option<String>,
    pub prev: Option<String>,
}

const ATEXT: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]";

/// RFC 5322 addr-spec: dot-atom or quoted-string local part, dot-atom or
/// domain-literal domain. No display name, no angle brackets, no comments.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let dot_atom = format!(r"{ATEXT}+(?:\.{ATEXT}+)*");
    let quoted = r#""(?:[^"\\\r\n]|\\.)*""#;
    let literal = r"\[[^\[\]\\\r\n]*\]";
    Regex::new(&format!(
        r"^(?:{dot_atom}|{quoted})@(?:{dot_atom}|{literal})$"
    ))
    .expect("Invalid regex pattern for email address")
});

/// Check that `email` is a bare RFC 5322 address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}
