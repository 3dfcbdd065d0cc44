//! Session user types.

use serde::{Deserialize, Deserializer, Serialize};

/// User role for route authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Professor,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Professor => "PROFESSOR",
            Role::Student => "STUDENT",
        }
    }

    /// Parse a role name from a token claim. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "PROFESSOR" => Some(Role::Professor),
            "STUDENT" => Some(Role::Student),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the signed-in user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Backend user id. Numeric ids are kept in their decimal form.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Integer(i64),
        Unsigned(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(id) => id,
        Id::Integer(id) => id.to_string(),
        Id::Unsigned(id) => id.to_string(),
    })
}

/// The credential and profile currently in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Raw bearer token
    pub token: String,
    pub profile: Profile,
}
