use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Level in the strict containment hierarchy `ORG > COMPANY > ENTITY > SITE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScopeType {
    Org,
    Company,
    Entity,
    Site,
}

impl ScopeType {
    pub const ALL: [ScopeType; 4] = [Self::Org, Self::Company, Self::Entity, Self::Site];

    /// Breadth of the scope: 0 is the broadest (`ORG`), 3 the narrowest (`SITE`).
    #[must_use]
    pub fn level(self) -> u8 {
        match self {
            Self::Org => 0,
            Self::Company => 1,
            Self::Entity => 2,
            Self::Site => 3,
        }
    }

    /// Returns true if `self` is broader than or equal to `other`.
    #[must_use]
    pub fn contains(self, other: ScopeType) -> bool {
        self.level() <= other.level()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Org => "ORG",
            Self::Company => "COMPANY",
            Self::Entity => "ENTITY",
            Self::Site => "SITE",
        }
    }

    /// Parses the wire name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a scope node.
///
/// The API hands out numeric ids while durable storage holds strings, so the id
/// is normalized to its string form on construction and every comparison is a
/// string comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(String);

impl ScopeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form of the id, if it has one.
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// JSON value matching the kind the server uses: a number when the id is numeric.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        self.as_number()
            .map_or_else(|| serde_json::Value::from(self.0.clone()), serde_json::Value::from)
    }

    /// Reads an id from an arbitrary JSON value. Only strings and numbers qualify.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(Self::new(s.as_str())),
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScopeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ScopeId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&String> for ScopeId {
    fn from(value: &String) -> Self {
        Self::new(value.as_str())
    }
}

impl From<u64> for ScopeId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<u32> for ScopeId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for ScopeId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for ScopeId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<str> for ScopeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ScopeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for ScopeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ScopeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(&value).ok_or_else(|| {
            serde::de::Error::custom(format!("scope id must be a string or number, got: {value}"))
        })
    }
}

/// A scope the identity may switch into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableScope {
    pub id: ScopeId,
    pub name: String,
    pub scope_type: ScopeType,
}

impl AvailableScope {
    /// Human label used by scope pickers, e.g. `"Tower A (SITE)"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.scope_type)
    }
}
