//! High-level entry point tying the API client to session and navigation state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::{
    ApiClient, BreadcrumbEntry, Credentials, FileUpdate, FolderCreated, ItemList, Message,
    NewAccount, UploadReceipt, UploadSource, User,
};
use crate::config::ClientConfig;
use crate::error::{DriveError, Result};
use crate::folders::FolderNavigator;
use crate::session::expiry::end_session;
use crate::session::{
    AuthRedirect, DEFAULT_EXPIRY_CHECK_INTERVAL, ExpiryMonitor, LogoutReason, NoRedirect,
    SessionStorage, SessionStore,
};
use crate::util::validate_file;

/// A signed-in (or signing-in) client of the storage service.
///
/// The API client only reports authorization failures; `Drive` reacts to
/// them by ending the session and redirecting. Sign-in calls are exempt, so
/// a rejected password never tears down an existing session.
pub struct Drive {
    api: ApiClient,
    session: SessionStore,
    folders: FolderNavigator,
    redirect: Arc<dyn AuthRedirect>,
}

impl Drive {
    /// Build a client, restoring any session saved in `storage`.
    pub fn new(config: ClientConfig, storage: Arc<dyn SessionStorage>) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(config)?,
            session: SessionStore::hydrate(storage),
            folders: FolderNavigator::new(),
            redirect: Arc::new(NoRedirect),
        })
    }

    /// Configuration from `DRIVE_API_URL`.
    pub fn from_env(storage: Arc<dyn SessionStorage>) -> Result<Self> {
        Self::new(ClientConfig::from_env()?, storage)
    }

    /// Install the hook used to send the user to the sign-in screen.
    pub fn with_redirect(mut self, redirect: Arc<dyn AuthRedirect>) -> Self {
        self.redirect = redirect;
        self
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn folders(&self) -> &FolderNavigator {
        &self.folders
    }

    /// Check the token's expiry every minute in the background.
    pub fn start_expiry_monitor(&self) -> ExpiryMonitor {
        ExpiryMonitor::spawn(
            self.session.clone(),
            self.redirect.clone(),
            DEFAULT_EXPIRY_CHECK_INTERVAL,
        )
    }

    /// End the session on 401/403, then hand the error back.
    fn guard<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_auth_failure() {
                warn!("Server rejected the session: {}", e);
                end_session(&self.session, self.redirect.as_ref(), LogoutReason::Unauthorized);
            }
        }
        result
    }

    fn token(&self) -> Option<String> {
        self.session.token()
    }

    pub async fn register(&self, account: &NewAccount) -> Result<Message> {
        self.api.register(account).await
    }

    /// Sign in, fetch the profile and start the session.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let token = self.api.login(credentials).await?;
        if token.access_token.is_empty() {
            return Err(DriveError::InvalidToken(
                "server returned an empty access token".to_string(),
            ));
        }
        let user = self.api.current_user(Some(&token.access_token)).await?;
        self.session.login(token.access_token, user.clone())?;
        Ok(user)
    }

    pub fn logout(&self) {
        self.session.logout();
        self.folders.navigate_to_root();
        self.folders.set_items(Vec::new());
    }

    /// Re-fetch the profile for the stored token.
    ///
    /// Returns `None` without a token. Any failure ends the session and
    /// also yields `None`.
    pub async fn refresh_user(&self) -> Result<Option<User>> {
        let Some(token) = self.token() else {
            return Ok(None);
        };
        match self.api.current_user(Some(&token)).await {
            Ok(user) => {
                self.session.update_user(user.clone())?;
                Ok(Some(user))
            }
            Err(e) => {
                debug!("Stored token rejected: {}", e);
                let reason = if e.is_auth_failure() {
                    LogoutReason::Unauthorized
                } else {
                    LogoutReason::User
                };
                self.session.logout_with_reason(reason);
                Ok(None)
            }
        }
    }

    pub async fn list_items(&self, folder_id: Option<&str>) -> Result<ItemList> {
        let token = self.token();
        let result = self
            .api
            .list_items(token.as_deref(), folder_id, None)
            .await;
        self.guard(result)
    }

    /// Search all folders by name.
    pub async fn search(&self, query: &str) -> Result<ItemList> {
        let token = self.token();
        let folder = self.folders.current_folder_id();
        let result = self
            .api
            .list_items(token.as_deref(), folder.as_deref(), Some(query))
            .await;
        self.guard(result)
    }

    /// Show a folder (`None` for the root): fetch its breadcrumb and items,
    /// then update navigation in one step. On error navigation is unchanged.
    pub async fn open_folder(&self, folder_id: Option<&str>) -> Result<ItemList> {
        let trail = match folder_id {
            Some(id) => self.breadcrumb(id).await?,
            None => vec![BreadcrumbEntry::home()],
        };
        let list = self.list_items(folder_id).await?;
        self.folders
            .show_folder(folder_id.map(str::to_string), trail, list.items.clone());
        Ok(list)
    }

    pub async fn breadcrumb(&self, folder_id: &str) -> Result<Vec<BreadcrumbEntry>> {
        let token = self.token();
        let result = self.api.breadcrumb(token.as_deref(), folder_id).await;
        self.guard(result)
    }

    /// Validate and upload an in-memory file.
    pub async fn upload(
        &self,
        source: UploadSource,
        folder_id: Option<&str>,
    ) -> Result<UploadReceipt> {
        validate_file(source.size(), &source.content_type)?;
        let token = self.token();
        let result = self
            .api
            .upload_file(token.as_deref(), source, folder_id)
            .await;
        self.guard(result)
    }

    pub async fn upload_bytes(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
        folder_id: Option<&str>,
    ) -> Result<UploadReceipt> {
        self.upload(UploadSource::from_bytes(file_name, content_type, data), folder_id)
            .await
    }

    /// Validate and upload a local file.
    ///
    /// Size and type are checked from metadata before the file is read.
    pub async fn upload_path<P: AsRef<Path>>(
        &self,
        path: P,
        folder_id: Option<&str>,
    ) -> Result<UploadReceipt> {
        let path = path.as_ref();
        let size = tokio::fs::metadata(path).await?.len();
        validate_file(size, &UploadSource::guess_content_type(path))?;

        let source = UploadSource::from_path(path).await?;
        self.upload(source, folder_id).await
    }

    /// Save a file's content to `dest`.
    pub async fn download_file(&self, file_id: &str, dest: impl Into<PathBuf>) -> Result<u64> {
        let token = self.token();
        let result = self
            .api
            .download_file(token.as_deref(), file_id, dest)
            .await;
        self.guard(result)
    }

    pub async fn rename_file(&self, file_id: &str, name: &str) -> Result<Message> {
        self.update_file(file_id, &FileUpdate::rename(name)).await
    }

    pub async fn move_file(&self, file_id: &str, folder_id: &str) -> Result<Message> {
        self.update_file(file_id, &FileUpdate::move_to(folder_id))
            .await
    }

    pub async fn update_file(&self, file_id: &str, update: &FileUpdate) -> Result<Message> {
        let token = self.token();
        let result = self
            .api
            .update_file(token.as_deref(), file_id, update)
            .await;
        self.guard(result)
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<Message> {
        let token = self.token();
        let result = self.api.delete_file(token.as_deref(), file_id).await;
        self.guard(result)
    }

    pub async fn create_folder(
        &self,
        name: &str,
        parent_folder_id: Option<&str>,
    ) -> Result<FolderCreated> {
        let token = self.token();
        let result = self
            .api
            .create_folder(token.as_deref(), name, parent_folder_id)
            .await;
        self.guard(result)
    }

    pub async fn rename_folder(&self, folder_id: &str, name: &str) -> Result<Message> {
        let token = self.token();
        let result = self
            .api
            .rename_folder(token.as_deref(), folder_id, name)
            .await;
        self.guard(result)
    }

    pub async fn delete_folder(&self, folder_id: &str) -> Result<Message> {
        let token = self.token();
        let result = self.api.delete_folder(token.as_deref(), folder_id).await;
        self.guard(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;
    use crate::session::expiry::tests::RecordingRedirect;
    use crate::session::sample_user;
    use crate::util::FileRejection;
    use std::sync::atomic::Ordering;

    fn drive() -> (Drive, Arc<RecordingRedirect>) {
        let redirect = Arc::new(RecordingRedirect::default());
        let drive = Drive::new(ClientConfig::default(), Arc::new(MemoryStorage::new()))
            .unwrap()
            .with_redirect(redirect.clone());
        (drive, redirect)
    }

    #[test]
    fn test_guard_tears_down_on_auth_failure() {
        let (drive, redirect) = drive();
        drive.session().login("t", sample_user("a@x.io")).unwrap();

        let result: Result<()> = drive.guard(Err(DriveError::Unauthorized {
            status: 401,
            message: "Could not validate credentials".to_string(),
        }));
        assert!(result.unwrap_err().is_auth_failure());
        assert!(!drive.session().is_authenticated());
        assert_eq!(redirect.redirects.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_ignores_other_errors() {
        let (drive, redirect) = drive();
        drive.session().login("t", sample_user("a@x.io")).unwrap();

        let result: Result<()> = drive.guard(Err(DriveError::Api {
            status: 404,
            message: "File not found".to_string(),
        }));
        assert!(result.is_err());
        assert!(drive.session().is_authenticated());
        assert_eq!(redirect.redirects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upload_validated_before_request() {
        let (drive, _) = drive();
        let source = UploadSource::from_bytes("setup.exe", "application/x-msdownload", vec![0; 4]);
        let err = drive.upload(source, None).await.unwrap_err();
        assert!(matches!(
            err,
            DriveError::InvalidFile(FileRejection::UnsupportedType)
        ));
    }

    fn unreachable_drive() -> Drive {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = ClientConfig::new(&format!("http://{addr}")).unwrap();
        Drive::new(config, Arc::new(MemoryStorage::new())).unwrap()
    }

    #[tokio::test]
    async fn test_failed_open_folder_keeps_navigation() {
        let drive = unreachable_drive();
        drive.session().login("t", sample_user("a@x.io")).unwrap();
        let trail = vec![
            BreadcrumbEntry::home(),
            BreadcrumbEntry {
                folder_id: Some("A".to_string()),
                name: "Photos".to_string(),
            },
        ];
        drive
            .folders()
            .show_folder(Some("A".to_string()), trail.clone(), Vec::new());
        let before = drive.folders().snapshot();

        assert!(drive.open_folder(Some("f1")).await.is_err());
        assert_eq!(drive.folders().snapshot(), before);

        assert!(drive.open_folder(None).await.is_err());
        assert_eq!(drive.folders().current_folder_id().as_deref(), Some("A"));
        assert_eq!(drive.folders().breadcrumb(), trail);
    }

    #[tokio::test]
    async fn test_upload_path_checks_size_before_reading() {
        let drive = unreachable_drive();
        let dir = tempfile::tempdir().unwrap();

        // Sparse, so nothing close to this size is ever allocated.
        let big = dir.path().join("huge.txt");
        std::fs::File::create(&big)
            .unwrap()
            .set_len(crate::util::MAX_FILE_SIZE + 1)
            .unwrap();
        let err = drive.upload_path(&big, None).await.unwrap_err();
        assert!(matches!(err, DriveError::InvalidFile(FileRejection::TooLarge)));

        let unknown = dir.path().join("blob.bin");
        std::fs::write(&unknown, b"\x00\x01").unwrap();
        let err = drive.upload_path(&unknown, None).await.unwrap_err();
        assert!(matches!(
            err,
            DriveError::InvalidFile(FileRejection::UnsupportedType)
        ));
    }

    #[tokio::test]
    async fn test_refresh_user_without_token() {
        let (drive, _) = drive();
        assert_eq!(drive.refresh_user().await.unwrap(), None);
    }

    #[test]
    fn test_logout_resets_navigation() {
        let (drive, _) = drive();
        drive.session().login("t", sample_user("a@x.io")).unwrap();
        drive.folders().navigate_to_folder("A");

        drive.logout();
        assert!(!drive.session().is_authenticated());
        assert_eq!(drive.folders().current_folder_id(), None);
    }
}
