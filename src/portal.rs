//! Page controller: turns user actions into gateway calls, session changes
//! and view updates.

use std::cell::{Cell, RefCell};

use crate::error::ValidationError;
use crate::gateway::Gateway;
use crate::session::{Role, Session, SessionHolder, SessionStore};
use crate::upload::{Selection, UploadState, UploadView};
use crate::view::{Page, Toast, View};
use crate::{Credentials, FileRecord};

/// How many files the ops dashboard lists.
pub const OPS_RECENT_LIMIT: usize = 5;

pub struct Portal<G: Gateway, S, V> {
    gateway: G,
    session: SessionHolder<S>,
    view: V,
    role: Cell<Role>,
    upload: RefCell<UploadState<G::File>>,
    // Bumped on every page change. Listing responses carry the value they
    // were requested under and are dropped once it moves on.
    epoch: Cell<u64>,
}

impl<G, S, V> Portal<G, S, V>
where
    G: Gateway,
    S: SessionStore,
    V: View,
{
    pub fn new(gateway: G, store: S, view: V) -> Self {
        Self {
            gateway,
            session: SessionHolder::new(store),
            view,
            role: Cell::new(Role::default()),
            upload: RefCell::new(UploadState::default()),
            epoch: Cell::new(0),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn session(&self) -> Option<Session> {
        self.session.current()
    }

    pub fn store(&self) -> &S {
        self.session.store()
    }

    pub fn selected_role(&self) -> Role {
        self.role.get()
    }

    pub fn upload_view(&self) -> UploadView {
        self.upload.borrow().view()
    }

    /// Page-load entry point. A verification token from the email link wins
    /// over a stored session.
    pub async fn start(&self, verification_token: Option<String>) {
        self.show_landing();

        if let Some(token) = verification_token.filter(|t| !t.trim().is_empty()) {
            log::info!("opening verification page from email link");
            self.show_verification();
            self.view.prefill_verification_token(&token);
            return;
        }

        if let Some(session) = self.session.restore() {
            log::info!("restored {} session", session.role);
            self.role.set(session.role);
            self.enter_dashboard(session.role).await;
        }
    }

    fn navigate(&self, page: Page) -> u64 {
        let epoch = self.epoch.get() + 1;
        self.epoch.set(epoch);
        log::debug!("showing {}", page.id());
        self.view.show_page(page);
        epoch
    }

    fn is_stale(&self, epoch: u64) -> bool {
        self.epoch.get() != epoch
    }

    pub fn show_landing(&self) {
        self.navigate(Page::Landing);
        self.view.set_logged_in(false);
    }

    pub fn show_login(&self) {
        self.navigate(Page::Login);
        self.view.set_logged_in(false);
    }

    pub fn show_signup(&self) {
        self.navigate(Page::Signup);
        self.view.set_logged_in(false);
    }

    pub fn show_verification(&self) {
        self.navigate(Page::Verification);
    }

    pub fn select_role(&self, role: Role) {
        self.role.set(role);
        self.view.highlight_role(role);
    }

    pub async fn login(&self, email: &str, password: &str) {
        if email.trim().is_empty() || password.is_empty() {
            self.view.toast(Toast::error(ValidationError::MissingCredentials.to_string()));
            return;
        }

        let role = self.role.get();
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        log::info!("logging in as {}", role);

        self.view.set_loading(true);
        let result = self.gateway.login(role, &credentials).await;
        self.view.set_loading(false);

        match result {
            Ok(reply) => {
                if reply.user_type != role {
                    log::warn!("login reply reports role {}, expected {}", reply.user_type, role);
                }
                self.view.toast(Toast::success(reply.message));
                if let Err(err) = self.session.login(role, &reply.access_token) {
                    log::error!("failed to persist session: {}", err);
                    self.view
                        .toast(Toast::error("Your session will not survive a page reload"));
                }
                self.enter_dashboard(role).await;
            }
            Err(err) => {
                log::warn!("login failed: {}", err);
                self.view
                    .toast(Toast::error(err.user_message("Login failed. Please try again.")));
            }
        }
    }

    pub async fn signup(&self, email: &str, password: &str, confirm_password: &str) {
        if password != confirm_password {
            self.view.toast(Toast::error(ValidationError::PasswordMismatch.to_string()));
            return;
        }
        if email.trim().is_empty() || password.is_empty() {
            self.view.toast(Toast::error(ValidationError::MissingCredentials.to_string()));
            return;
        }

        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        self.view.set_loading(true);
        let result = self.gateway.signup(&credentials).await;
        self.view.set_loading(false);

        match result {
            Ok(reply) => {
                log::info!("signup accepted: {}", reply.message);
                if reply.encrypted_verification_url.is_some() {
                    log::debug!("signup reply carried an encrypted verification url");
                }
                self.view.toast(Toast::success(
                    "Account created! Please check your email for verification.",
                ));
                self.show_verification();
            }
            Err(err) => {
                log::warn!("signup failed: {}", err);
                self.view
                    .toast(Toast::error(err.user_message("Signup failed. Please try again.")));
            }
        }
    }

    pub async fn verify_email(&self, token: &str) {
        let token = token.trim();
        if token.is_empty() {
            self.view.toast(Toast::error(ValidationError::MissingToken.to_string()));
            return;
        }

        self.view.set_loading(true);
        let result = self.gateway.verify_email(token).await;
        self.view.set_loading(false);

        match result {
            Ok(_) => {
                self.view
                    .toast(Toast::success("Email verified successfully! You can now login."));
                self.show_login();
            }
            Err(err) => {
                log::warn!("verification failed: {}", err);
                self.view.toast(Toast::error(
                    err.user_message("Verification failed. Please try again."),
                ));
            }
        }
    }

    /// Handles both the file picker and a drop on the upload area.
    pub fn pick_file(&self, file: G::File) {
        let selection = self.upload.borrow_mut().select(file);
        match selection {
            Selection::Accepted(file_type) => log::debug!("selected {:?} file", file_type),
            Selection::Rejected(err) => {
                log::debug!("rejected picked file: {}", err);
                self.view.toast(Toast::error(err.to_string()));
            }
            Selection::Busy => log::debug!("ignoring file pick while an upload is in flight"),
        }
        self.render_upload();
    }

    pub fn reset_upload(&self) {
        self.upload.borrow_mut().reset();
        self.render_upload();
    }

    fn render_upload(&self) {
        let upload = self.upload.borrow().view();
        self.view.render_upload(&upload);
    }

    pub async fn submit_upload(&self) {
        if self.upload.borrow().is_submitting() {
            log::debug!("upload already in flight");
            return;
        }
        let Some(token) = self.require_token() else {
            return;
        };

        let begun = self.upload.borrow_mut().begin_submit();
        let file = match begun {
            Ok(file) => file,
            Err(err) => {
                self.view.toast(Toast::error(err.to_string()));
                return;
            }
        };
        let epoch = self.epoch.get();
        self.render_upload();

        self.view.set_loading(true);
        let result = self.gateway.upload(&token, &file).await;
        self.view.set_loading(false);

        match result {
            Ok(reply) => {
                log::info!("uploaded {} as file {}", reply.original_filename, reply.file_id);
                self.upload.borrow_mut().finish_submit(true);
                self.render_upload();
                self.view.toast(Toast::success("File uploaded successfully!"));
                if self.is_stale(epoch) {
                    log::debug!("skipping ops file refresh, dashboard was left during upload");
                    return;
                }
                self.load_ops_files(epoch).await;
            }
            Err(err) => {
                log::warn!("upload failed: {}", err);
                self.upload.borrow_mut().finish_submit(false);
                self.render_upload();
                self.view
                    .toast(Toast::error(err.user_message("Upload failed. Please try again.")));
            }
        }
    }

    async fn enter_dashboard(&self, role: Role) {
        match role {
            Role::Ops => self.show_ops_dashboard().await,
            Role::Client => self.show_client_dashboard().await,
        }
    }

    pub async fn show_ops_dashboard(&self) {
        let epoch = self.navigate(Page::OpsDashboard);
        self.view.set_logged_in(true);
        self.render_upload();
        self.load_ops_files(epoch).await;
    }

    pub async fn show_client_dashboard(&self) {
        let epoch = self.navigate(Page::ClientDashboard);
        self.view.set_logged_in(true);
        self.load_client_files(epoch).await;
    }

    // Failures here are only logged; the ops view has no error slot.
    async fn load_ops_files(&self, epoch: u64) {
        if self.is_stale(epoch) {
            return;
        }
        let Some(token) = self.require_token() else {
            return;
        };

        match self.gateway.list_files(&token).await {
            Ok(_) if self.is_stale(epoch) => {
                log::warn!("dropping ops file list that arrived after navigation");
            }
            Ok(files) => {
                self.view
                    .render_ops_files(&most_recent(files, OPS_RECENT_LIMIT));
            }
            Err(err) => log::warn!("failed to load ops files: {}", err),
        }
    }

    async fn load_client_files(&self, epoch: u64) {
        if self.is_stale(epoch) {
            return;
        }
        let Some(token) = self.require_token() else {
            return;
        };

        self.view.set_loading(true);
        let result = self.gateway.list_files(&token).await;
        self.view.set_loading(false);

        if self.is_stale(epoch) {
            log::warn!("dropping client file list that arrived after navigation");
            return;
        }
        match result {
            Ok(files) => self.view.render_client_files(&files),
            Err(err) => {
                log::warn!("failed to load client files: {}", err);
                self.view
                    .toast(Toast::error(err.user_message("Failed to load files")));
            }
        }
    }

    pub async fn download(&self, file_id: u64) {
        let Some(token) = self.require_token() else {
            return;
        };

        self.view.set_loading(true);
        let result = self.gateway.download_link(&token, file_id).await;
        self.view.set_loading(false);

        match result {
            Ok(url) => {
                self.view.open_in_new_context(&url);
                self.view.toast(Toast::success("Download started!"));
            }
            Err(err) => {
                log::warn!("download link for file {} failed: {}", file_id, err);
                self.view.toast(Toast::error(
                    err.user_message("Failed to generate download link"),
                ));
            }
        }
    }

    pub fn logout(&self) {
        self.session.logout();
        self.upload.borrow_mut().reset();
        self.render_upload();
        self.show_landing();
        self.view.toast(Toast::success("Logged out successfully"));
    }

    /// Top-level handler for errors nothing else caught.
    pub fn report_unexpected(&self, detail: &str) {
        log::error!("application error: {}", detail);
        self.view.toast(Toast::error("An unexpected error occurred"));
    }

    fn require_token(&self) -> Option<String> {
        let token = self.session.token();
        if token.is_none() {
            log::warn!("authenticated action attempted without a session");
            self.view.toast(Toast::error("Please log in again"));
            self.show_login();
        }
        token
    }
}

/// Newest first, at most `limit` entries. Ties keep the API's order.
pub fn most_recent(mut files: Vec<FileRecord>, limit: usize) -> Vec<FileRecord> {
    files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    files.truncate(limit);
    files
}
