//! Person type and display helpers.
//!
//! People are owned by the external data store and are read-only here. The
//! helpers in this file derive everything a card needs to show: a display name
//! with a fallback chain, initials for the photo placeholder, and a lifespan.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable person identifier as issued by the data store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    /// Create a new PersonId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PersonId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A person as read from the data store.
///
/// Only `id` is required on the wire; every other field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Identity.
    pub id: PersonId,
    /// First name(s).
    #[serde(default)]
    pub given_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub surname: Option<String>,
    /// Free-form name used when given name and surname are both missing.
    #[serde(default)]
    pub full_name: Option<String>,
    /// ISO date string (`YYYY-MM-DD` or any string starting with the year).
    #[serde(default)]
    pub birth_date: Option<String>,
    /// Birth year, preferred over `birth_date`.
    #[serde(default)]
    pub birth_year: Option<i32>,
    /// ISO date string.
    #[serde(default)]
    pub death_date: Option<String>,
    /// Death year, preferred over `death_date`.
    #[serde(default)]
    pub death_year: Option<i32>,
    /// Avatar reference (URL or storage key).
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Person {
    /// Create a person with only an id and a full name.
    pub fn named(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: PersonId::new(id),
            full_name: Some(full_name.into()),
            ..Default::default()
        }
    }

    /// Name shown on the card.
    ///
    /// `given_name surname` when either is present, then `full_name`, then
    /// `"Unknown"`.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.given_name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if !parts.is_empty() {
            return parts.join(" ");
        }

        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => "Unknown".to_owned(),
        }
    }

    /// Up to two uppercase initials from the first two name tokens.
    pub fn initials(&self) -> String {
        let initials: String = self
            .display_name()
            .split_whitespace()
            .take(2)
            .filter_map(|token| token.chars().next())
            .flat_map(char::to_uppercase)
            .collect();

        if initials.is_empty() {
            "?".to_owned()
        } else {
            initials
        }
    }

    /// Birth year, falling back to the year prefix of `birth_date`.
    pub fn resolved_birth_year(&self) -> Option<i32> {
        self.birth_year
            .or_else(|| self.birth_date.as_deref().and_then(year_prefix))
    }

    /// Death year, falling back to the year prefix of `death_date`.
    pub fn resolved_death_year(&self) -> Option<i32> {
        self.death_year
            .or_else(|| self.death_date.as_deref().and_then(year_prefix))
    }

    /// Lifespan label.
    ///
    /// - death year known: `"1950 - 2020"` (`"? - 2020"` without a birth year)
    /// - only birth year known: `"1950 - Living"`
    /// - neither: `"Living"`
    pub fn lifespan(&self) -> String {
        match (self.resolved_birth_year(), self.resolved_death_year()) {
            (Some(birth), Some(death)) => format!("{birth} - {death}"),
            (None, Some(death)) => format!("? - {death}"),
            (Some(birth), None) => format!("{birth} - Living"),
            (None, None) => "Living".to_owned(),
        }
    }
}

/// Parse the leading four-digit year of a date string.
fn year_prefix(date: &str) -> Option<i32> {
    let date = date.trim();
    let digits = date.get(..4)?;
    if digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}
