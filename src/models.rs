//! Wire types for the myFlix API.
//!
//! Field names follow the server's PascalCase JSON.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Director {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    /// Password hash as stored by the server; never sent back
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default)]
    pub favorite_movies: Vec<String>,
}

/// Login request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Editable account fields, used for registration and profile edits.
///
/// An empty password is left out of the request body so an edit that does
/// not set a new password keeps the old one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDetails {
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

impl UserDetails {
    /// Working copy of a fetched user. The password is never prefilled.
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            password: String::new(),
            email: user.email.clone(),
            birthday: user.birthday.as_deref().map(normalize_birthday),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreDetails {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorDetails {
    pub name: String,
    pub birth: Option<String>,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synopsis {
    pub name: String,
    pub description: String,
}

impl Movie {
    pub fn genre_details(&self) -> GenreDetails {
        GenreDetails {
            name: self.genre.name.clone(),
            description: self.genre.description.clone(),
        }
    }

    pub fn director_details(&self) -> DirectorDetails {
        DirectorDetails {
            name: self.director.name.clone(),
            birth: self.director.birth.clone(),
            bio: self.director.bio.clone(),
        }
    }

    pub fn synopsis(&self) -> Synopsis {
        Synopsis {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Reduce a server timestamp such as `1990-04-02T00:00:00.000Z` to a plain
/// `YYYY-MM-DD` date. Values that are already dates, or unparseable, are
/// returned unchanged.
pub fn normalize_birthday(raw: &str) -> String {
    if NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok() {
        return raw.to_string();
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.date_naive().format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}
