use crate::session::Role;
use crate::upload::UploadView;
use crate::FileRecord;

/// Logical pages. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Landing,
    Login,
    Signup,
    Verification,
    OpsDashboard,
    ClientDashboard,
}

impl Page {
    pub fn id(&self) -> &'static str {
        match self {
            Page::Landing => "landingPage",
            Page::Login => "loginPage",
            Page::Signup => "signupPage",
            Page::Verification => "verificationPage",
            Page::OpsDashboard => "opsDashboard",
            Page::ClientDashboard => "clientDashboard",
        }
    }

    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Ops => Page::OpsDashboard,
            Role::Client => Page::ClientDashboard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Info => "fas fa-info-circle",
            ToastKind::Success => "fas fa-check-circle",
            ToastKind::Error => "fas fa-exclamation-circle",
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }
}

/// Transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Everything the controller is allowed to touch on screen.
pub trait View {
    /// Deactivates every page and activates `page`.
    fn show_page(&self, page: Page);
    /// Login/signup controls when false, logout control when true.
    fn set_logged_in(&self, logged_in: bool);
    fn toast(&self, toast: Toast);
    fn set_loading(&self, loading: bool);
    fn render_upload(&self, upload: &UploadView);
    fn render_ops_files(&self, files: &[FileRecord]);
    fn render_client_files(&self, files: &[FileRecord]);
    /// Opens `url` in a new browsing context.
    fn open_in_new_context(&self, url: &str);
    fn highlight_role(&self, role: Role);
    fn prefill_verification_token(&self, token: &str);
}
