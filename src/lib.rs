//! # drivelib
//!
//! Rust client library for the file-manager storage service.
//!
//! ## Features
//!
//! - **Authentication**: register, log in with email/password, fetch the current profile.
//!   - Sessions persist across restarts (token + profile) through a pluggable storage backend.
//!   - A background monitor ends the session once the token's expiry claim passes.
//!   - Any 401/403 from the server ends the session and triggers a redirect hook.
//! - **Files**: list and search, upload (multipart) with size/type checks, streaming download,
//!   rename, move, delete.
//! - **Folders**: create, rename, delete, breadcrumb trail from the root.
//! - **Navigation state**: current folder, breadcrumb and items, observable through
//!   `tokio::sync::watch` receivers.
//! - **Helpers**: human-readable sizes and dates, icon categories, a debouncer.
//!
//! The server base URL is read from `DRIVE_API_URL` (default `http://localhost:8000`).
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use drivelib::{Credentials, Drive, FileStorage};
//!
//! # async fn example() -> drivelib::Result<()> {
//! let storage = Arc::new(FileStorage::default_location()?);
//! let drive = Drive::from_env(storage)?;
//!
//! if !drive.session().is_authenticated() {
//!     drive.login(&Credentials::new("user@example.com", "password")).await?;
//! }
//! let _monitor = drive.start_expiry_monitor();
//!
//! // List the root folder
//! let listing = drive.open_folder(None).await?;
//! for item in &listing.items {
//!     println!("{}", item.name());
//! }
//!
//! // Upload into the root, then download it again
//! let receipt = drive.upload_path("report.pdf", None).await?;
//! drive.download_file(&receipt.file_id, "report-copy.pdf").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod drive;
pub mod error;
pub mod folders;
pub mod http;
pub mod session;
pub mod token;
pub mod util;

// Re-export commonly used types
pub use api::{
    ApiClient, BreadcrumbEntry, Credentials, FileItem, FileUpdate, FolderItem, Item, ItemList,
    NewAccount, UploadSource, User,
};
pub use config::ClientConfig;
pub use drive::Drive;
pub use error::{DriveError, Result};
pub use folders::{FolderNavigator, FolderState};
pub use session::{
    AuthRedirect, ExpiryMonitor, FileStorage, MemoryStorage, SessionState, SessionStorage,
    SessionStore,
};
pub use util::{
    Debouncer, FileIcon, FileRejection, format_date, format_file_size, validate_file,
};
