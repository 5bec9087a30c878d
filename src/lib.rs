use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod gateway;
pub mod portal;
pub mod session;
pub mod upload;
pub mod validation;
pub mod view;

pub use config::ClientConfig;
pub use error::{ApiError, StorageError, ValidationError};
pub use gateway::{Endpoint, Gateway};
pub use portal::Portal;
pub use session::{MemoryStore, Role, Session, SessionHolder, SessionStore};
pub use upload::{MemoryFile, PickedFile, Selection, UploadState, UploadView};
pub use validation::FileType;
pub use view::{Page, Toast, ToastKind, View};

/// A document the portal already holds, as listed by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    pub id: u64,
    pub original_filename: String,
    pub file_type: FileType,
    pub file_size: u64,
    pub uploaded_at: NaiveDateTime,
    pub uploaded_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user_type: Role,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    #[serde(default)]
    pub encrypted_verification_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_id: u64,
    pub original_filename: String,
    pub file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesResponse {
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadLinkResponse {
    #[serde(rename = "download-link")]
    pub download_link: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(feature = "frontend")]
pub mod frontend;

#[cfg(feature = "frontend")]
pub use frontend::*;
