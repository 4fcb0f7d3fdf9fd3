//! Storage API client and types.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, UploadSource};
pub use types::{
    BreadcrumbEntry, Credentials, FileItem, FileUpdate, FolderCreated, FolderItem, Item,
    ItemList, Message, NewAccount, TokenResponse, UploadReceipt, User,
};
