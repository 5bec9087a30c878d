use gloo_storage::{LocalStorage, Storage};
use gloo_timers::future::TimeoutFuture;
use leptos::*;

use crate::error::StorageError;
use crate::session::{Role, SessionStore};
use crate::upload::UploadView;
use crate::view::{Page, Toast, View};
use crate::FileRecord;

const TOAST_MILLIS: u32 = 5000;

/// `localStorage`-backed session store.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl SessionStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::get::<String>(key).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::set(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShownToast {
    pub id: u64,
    pub toast: Toast,
}

/// Signals the components render from. Writing happens only through [`View`].
#[derive(Clone, Copy)]
pub struct SignalView {
    pub page: RwSignal<Page>,
    pub logged_in: RwSignal<bool>,
    pub toast: RwSignal<Option<ShownToast>>,
    pub loading: RwSignal<bool>,
    pub upload: RwSignal<UploadView>,
    pub ops_files: RwSignal<Vec<FileRecord>>,
    pub client_files: RwSignal<Vec<FileRecord>>,
    pub role: RwSignal<Role>,
    pub verification_token: RwSignal<String>,
    toast_seq: StoredValue<u64>,
}

impl SignalView {
    pub fn new() -> Self {
        Self {
            page: create_rw_signal(Page::Landing),
            logged_in: create_rw_signal(false),
            toast: create_rw_signal(None),
            loading: create_rw_signal(false),
            upload: create_rw_signal(UploadView::Idle),
            ops_files: create_rw_signal(Vec::new()),
            client_files: create_rw_signal(Vec::new()),
            role: create_rw_signal(Role::Client),
            verification_token: create_rw_signal(String::new()),
            toast_seq: store_value(0),
        }
    }
}

impl View for SignalView {
    fn show_page(&self, page: Page) {
        self.page.set(page);
    }

    fn set_logged_in(&self, logged_in: bool) {
        self.logged_in.set(logged_in);
    }

    fn toast(&self, toast: Toast) {
        let id = self.toast_seq.get_value() + 1;
        self.toast_seq.set_value(id);
        self.toast.set(Some(ShownToast { id, toast }));

        // Only clear the toast this call put up; a newer one keeps its full time.
        let slot = self.toast;
        spawn_local(async move {
            TimeoutFuture::new(TOAST_MILLIS).await;
            slot.update(|current| {
                if current.as_ref().map(|shown| shown.id) == Some(id) {
                    *current = None;
                }
            });
        });
    }

    fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    fn render_upload(&self, upload: &UploadView) {
        self.upload.set(upload.clone());
    }

    fn render_ops_files(&self, files: &[FileRecord]) {
        self.ops_files.set(files.to_vec());
    }

    fn render_client_files(&self, files: &[FileRecord]) {
        self.client_files.set(files.to_vec());
    }

    fn open_in_new_context(&self, url: &str) {
        if let Err(e) = window().open_with_url_and_target(url, "_blank") {
            log::error!("failed to open download window: {:?}", e);
        }
    }

    fn highlight_role(&self, role: Role) {
        self.role.set(role);
    }

    fn prefill_verification_token(&self, token: &str) {
        self.verification_token.set(token.to_string());
    }
}
