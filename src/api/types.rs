//! Request and response schemas for the storage API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// An account profile as returned by `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

fn content_type_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Option::<String>::deserialize(d)?;
    Ok(value
        .filter(|ct| !ct.is_empty())
        .unwrap_or_else(default_content_type))
}

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Copy with the email lowercased and trimmed, as the server expects.
    pub(crate) fn normalized(&self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
        }
    }
}

/// Registration payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl NewAccount {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
        }
    }

    pub(crate) fn normalized(&self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
            full_name: self.full_name.trim().to_string(),
        }
    }
}

/// Bearer token issued by `/api/auth/login`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Plain acknowledgement (`{"message": "..."}`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub message: String,
}

/// A stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileItem {
    pub id: String,
    pub name: String,
    pub size: u64,
    /// `application/octet-stream` when the server has none on record.
    #[serde(default = "default_content_type", deserialize_with = "content_type_or_default")]
    pub content_type: String,
    #[serde(with = "timestamp")]
    pub upload_date: DateTime<Utc>,
    pub file_id: String,
    #[serde(default)]
    pub folder_id: Option<String>,
}

/// A folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderItem {
    pub id: String,
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_date: DateTime<Utc>,
    pub folder_id: String,
    #[serde(default)]
    pub parent_folder_id: Option<String>,
}

/// One entry of a folder listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item_type", rename_all = "lowercase")]
pub enum Item {
    File(FileItem),
    Folder(FolderItem),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::File(f) => &f.name,
            Item::Folder(f) => &f.name,
        }
    }

    /// Identifier used by the item's own endpoints (`file_id` or `folder_id`).
    pub fn handle(&self) -> &str {
        match self {
            Item::File(f) => &f.file_id,
            Item::Folder(f) => &f.folder_id,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Item::Folder(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Item::File(_))
    }
}

/// Response of `GET /api/files`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemList {
    pub items: Vec<Item>,
    #[serde(default)]
    pub current_folder: Option<String>,
    #[serde(default)]
    pub search_term: Option<String>,
}

/// Response of `POST /api/files/upload`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
    pub file_id: String,
    pub filename: String,
    #[serde(default)]
    pub folder_id: Option<String>,
}

/// Body of `PUT /api/files/{id}`; unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

impl FileUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into().trim().to_string()),
            folder_id: None,
        }
    }

    pub fn move_to(folder_id: impl Into<String>) -> Self {
        Self {
            name: None,
            folder_id: Some(folder_id.into()),
        }
    }
}

/// Response of `POST /api/folders`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FolderCreated {
    pub message: String,
    pub folder_id: String,
    pub name: String,
}

/// One step of the path from the root to a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
    pub folder_id: Option<String>,
    pub name: String,
}

impl BreadcrumbEntry {
    /// The root entry every trail starts with.
    pub fn home() -> Self {
        Self {
            folder_id: None,
            name: "Home".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BreadcrumbResponse {
    pub breadcrumb: Vec<BreadcrumbEntry>,
}

/// Server timestamps are naive UTC (`2024-05-01T12:00:00.123456`); accept
/// RFC 3339 as well.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(D::Error::custom)
    }
}
