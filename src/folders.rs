//! Folder navigation state: the folder being shown and the trail to it.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::{BreadcrumbEntry, Item};

/// Snapshot of the navigation state.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderState {
    /// `None` is the root folder.
    pub current_folder_id: Option<String>,
    pub breadcrumb: Vec<BreadcrumbEntry>,
    pub items: Vec<Item>,
}

impl Default for FolderState {
    fn default() -> Self {
        Self {
            current_folder_id: None,
            breadcrumb: vec![BreadcrumbEntry::home()],
            items: Vec::new(),
        }
    }
}

/// Shared, observable folder navigation state.
///
/// Navigation only moves the current folder; filling in the breadcrumb and
/// the item list from the server is up to the caller (see
/// [`Drive::open_folder`](crate::Drive::open_folder)).
#[derive(Debug, Clone)]
pub struct FolderNavigator {
    state: Arc<watch::Sender<FolderState>>,
}

impl FolderNavigator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(FolderState::default());
        Self {
            state: Arc::new(tx),
        }
    }

    /// Make `folder_id` current. The breadcrumb is left untouched.
    pub fn navigate_to_folder(&self, folder_id: impl Into<String>) {
        let folder_id = folder_id.into();
        self.state
            .send_modify(|state| state.current_folder_id = Some(folder_id));
    }

    /// Go back to the root and reset the breadcrumb to `[Home]`.
    pub fn navigate_to_root(&self) {
        self.state.send_modify(|state| {
            state.current_folder_id = None;
            state.breadcrumb = vec![BreadcrumbEntry::home()];
        });
    }

    pub fn set_breadcrumb(&self, breadcrumb: Vec<BreadcrumbEntry>) {
        self.state.send_modify(|state| state.breadcrumb = breadcrumb);
    }

    pub fn set_items(&self, items: Vec<Item>) {
        self.state.send_modify(|state| state.items = items);
    }

    /// Replace folder, breadcrumb and items in one update.
    ///
    /// `None` is the root, whose breadcrumb is always `[Home]`.
    pub fn show_folder(
        &self,
        folder_id: Option<String>,
        breadcrumb: Vec<BreadcrumbEntry>,
        items: Vec<Item>,
    ) {
        let breadcrumb = if folder_id.is_some() {
            breadcrumb
        } else {
            vec![BreadcrumbEntry::home()]
        };
        self.state.send_replace(FolderState {
            current_folder_id: folder_id,
            breadcrumb,
            items,
        });
    }

    pub fn current_folder_id(&self) -> Option<String> {
        self.state.borrow().current_folder_id.clone()
    }

    pub fn breadcrumb(&self) -> Vec<BreadcrumbEntry> {
        self.state.borrow().breadcrumb.clone()
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.borrow().items.clone()
    }

    pub fn snapshot(&self) -> FolderState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FolderState> {
        self.state.subscribe()
    }
}

impl Default for FolderNavigator {
    fn default() -> Self {
        Self::new()
    }
}
