//! Storage API client with request/response handling.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use url::Url;

use super::types::{
    BreadcrumbEntry, BreadcrumbResponse, Credentials, FileUpdate, FolderCreated, ItemList,
    Message, NewAccount, TokenResponse, UploadReceipt, User,
};
use crate::config::ClientConfig;
use crate::error::{DriveError, Result};
use crate::http::HttpClient;

/// A file ready to be sent to `/api/files/upload`.
#[derive(Debug, Clone)]
pub struct UploadSource {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadSource {
    pub fn from_bytes(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Read a local file, guessing its content type from the extension.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DriveError::Custom(format!("Invalid file name: {}", path.display())))?
            .to_string();
        let content_type = Self::guess_content_type(path);
        let data = tokio::fs::read(path).await?;
        Ok(Self {
            file_name,
            content_type,
            data,
        })
    }

    /// Content type for a path, from its extension.
    pub fn guess_content_type<P: AsRef<Path>>(path: P) -> String {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Storage API client.
///
/// The client holds no session: authenticated calls take the bearer token
/// as an argument, and authorization failures come back as
/// [`DriveError::Unauthorized`] for the caller to act on.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = match config.proxy.as_deref() {
            Some(proxy) => HttpClient::with_proxy(proxy)?,
            None => HttpClient::new(),
        };
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.config.endpoint(path)
    }

    /// Create an account. No token is sent.
    pub async fn register(&self, account: &NewAccount) -> Result<Message> {
        let request = self
            .http
            .inner()
            .post(self.url("/api/auth/register")?)
            .json(&account.normalized());
        self.http.send_json(request, None).await
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        let request = self
            .http
            .inner()
            .post(self.url("/api/auth/login")?)
            .json(&credentials.normalized());
        self.http.send_json(request, None).await
    }

    /// Fetch the profile belonging to `token`.
    pub async fn current_user(&self, token: Option<&str>) -> Result<User> {
        let token = token.ok_or(DriveError::NotAuthenticated("No authentication token found"))?;
        let request = self.http.inner().get(self.url("/api/auth/me")?);
        self.http.send_json(request, Some(token)).await
    }

    /// Upload a file into `folder_id` (the root when `None`).
    pub async fn upload_file(
        &self,
        token: Option<&str>,
        source: UploadSource,
        folder_id: Option<&str>,
    ) -> Result<UploadReceipt> {
        let token = token.ok_or(DriveError::NotAuthenticated("Authentication required"))?;
        debug!(file = %source.file_name, folder_id = ?folder_id, "uploading file");

        let part = Part::bytes(source.data)
            .file_name(source.file_name)
            .mime_str(&source.content_type)?;
        let mut form = Form::new().part("file", part);
        if let Some(folder_id) = folder_id.filter(|id| !id.is_empty()) {
            form = form.text("folder_id", folder_id.to_string());
        }

        let request = self
            .http
            .inner()
            .post(self.url("/api/files/upload")?)
            .multipart(form);
        self.http.send_json(request, Some(token)).await
    }

    /// List a folder, or search across all folders when `search` is non-blank.
    pub async fn list_items(
        &self,
        token: Option<&str>,
        folder_id: Option<&str>,
        search: Option<&str>,
    ) -> Result<ItemList> {
        let mut url = self.url("/api/files")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(folder_id) = folder_id.filter(|id| !id.is_empty()) {
                query.append_pair("folder_id", folder_id);
            }
            if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
                query.append_pair("search", search);
            }
        }
        // An empty query_pairs_mut() still leaves a dangling '?'.
        if url.query() == Some("") {
            url.set_query(None);
        }

        let request = self.http.inner().get(url);
        self.http.send_json(request, token).await
    }

    /// Stream a file's content into `dest`, returning the number of bytes written.
    pub async fn download_file(
        &self,
        token: Option<&str>,
        file_id: &str,
        dest: impl Into<PathBuf>,
    ) -> Result<u64> {
        let token = token.ok_or(DriveError::NotAuthenticated("Authentication required"))?;
        let dest = dest.into();

        let request = self
            .http
            .inner()
            .get(self.url(&format!("/api/files/{}/download", file_id))?);
        let response = self.http.send(request, Some(token)).await?;

        let mut file = tokio::fs::File::create(&dest).await?;
        let result = async {
            let mut stream = response.bytes_stream();
            let mut written = 0u64;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            file.flush().await?;
            Ok::<u64, DriveError>(written)
        }
        .await;
        drop(file);

        match result {
            Ok(written) => {
                debug!(file_id, bytes = written, dest = %dest.display(), "download complete");
                Ok(written)
            }
            Err(e) => {
                // Don't leave a truncated file behind.
                if let Err(rm) = tokio::fs::remove_file(&dest).await {
                    warn!(dest = %dest.display(), "Failed to remove partial download: {}", rm);
                }
                Err(e)
            }
        }
    }

    /// Rename and/or move a file.
    pub async fn update_file(
        &self,
        token: Option<&str>,
        file_id: &str,
        update: &FileUpdate,
    ) -> Result<Message> {
        let request = self
            .http
            .inner()
            .put(self.url(&format!("/api/files/{}", file_id))?)
            .json(update);
        self.http.send_json(request, token).await
    }

    pub async fn delete_file(&self, token: Option<&str>, file_id: &str) -> Result<Message> {
        let request = self
            .http
            .inner()
            .delete(self.url(&format!("/api/files/{}", file_id))?);
        self.http.send_json(request, token).await
    }

    /// Create a folder under `parent_folder_id` (the root when `None`).
    pub async fn create_folder(
        &self,
        token: Option<&str>,
        name: &str,
        parent_folder_id: Option<&str>,
    ) -> Result<FolderCreated> {
        let parent = parent_folder_id.filter(|id| !id.is_empty());
        let request = self
            .http
            .inner()
            .post(self.url("/api/folders")?)
            .json(&json!({
                "name": name.trim(),
                "parent_folder_id": parent,
            }));
        self.http.send_json(request, token).await
    }

    pub async fn rename_folder(
        &self,
        token: Option<&str>,
        folder_id: &str,
        name: &str,
    ) -> Result<Message> {
        let request = self
            .http
            .inner()
            .put(self.url(&format!("/api/folders/{}", folder_id))?)
            .json(&json!({ "name": name.trim() }));
        self.http.send_json(request, token).await
    }

    /// Delete an empty folder. The server answers 400 for non-empty ones.
    pub async fn delete_folder(&self, token: Option<&str>, folder_id: &str) -> Result<Message> {
        let request = self
            .http
            .inner()
            .delete(self.url(&format!("/api/folders/{}", folder_id))?);
        self.http.send_json(request, token).await
    }

    /// Path from the root to `folder_id`, starting with the Home entry.
    pub async fn breadcrumb(
        &self,
        token: Option<&str>,
        folder_id: &str,
    ) -> Result<Vec<BreadcrumbEntry>> {
        let request = self
            .http
            .inner()
            .get(self.url(&format!("/api/folders/{}/breadcrumb", folder_id))?);
        let response: BreadcrumbResponse = self.http.send_json(request, token).await?;
        Ok(response.breadcrumb)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self {
            http: HttpClient::new(),
            config: ClientConfig::default(),
        }
    }
}
