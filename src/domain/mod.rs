//! Domain primitives shared by the repositories, services and handlers.
//!
//! Identity is always passed explicitly: every scoped query takes an
//! [`OwnerId`] resolved from the request's token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the account that owns a tag, ingredient or recipe.
///
/// Has no `Default`; an owner always comes from an authenticated account.
///
/// # Examples
///
/// ```rust
/// use recipe_api::domain::OwnerId;
///
/// let owner = OwnerId::new(7);
/// assert_eq!(owner.value(), 7);
/// assert_eq!(owner.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerId(i32);

impl OwnerId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<OwnerId> for i32 {
    fn from(id: OwnerId) -> Self {
        id.0
    }
}

impl Serialize for OwnerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for OwnerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Which of the two per-owner label collections an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Tag,
    Ingredient,
}

impl LabelKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "Tag",
            Self::Ingredient => "Ingredient",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercases the domain part of an email address, leaving the local part
/// untouched. Surrounding whitespace is dropped; input without an `@` is
/// returned trimmed.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}
