use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;
use crate::session::Role;
use crate::upload::PickedFile;
use crate::{Credentials, FileRecord, LoginResponse, MessageResponse, SignupResponse, UploadResponse};

/// Multipart field the upload endpoint reads.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login(Role),
    Signup,
    VerifyEmail,
    Upload,
    Files,
    DownloadLink(u64),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Login(role) => format!("/auth/{}/login", role.as_str()),
            Endpoint::Signup => "/auth/client/signup".to_string(),
            Endpoint::VerifyEmail => "/auth/client/verify-email".to_string(),
            Endpoint::Upload => "/ops/upload".to_string(),
            Endpoint::Files => "/client/files".to_string(),
            Endpoint::DownloadLink(id) => format!("/client/download-file/{}", id),
        }
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// The remote portal API. One attempt per call; no retries or timeouts.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    type File: PickedFile + Clone;

    async fn login(&self, role: Role, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
    async fn signup(&self, credentials: &Credentials) -> Result<SignupResponse, ApiError>;
    async fn verify_email(&self, token: &str) -> Result<MessageResponse, ApiError>;
    async fn upload(&self, auth_token: &str, file: &Self::File) -> Result<UploadResponse, ApiError>;
    async fn list_files(&self, auth_token: &str) -> Result<Vec<FileRecord>, ApiError>;
    /// Returns a short-lived URL for `file_id`.
    async fn download_link(&self, auth_token: &str, file_id: u64) -> Result<String, ApiError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Applies the API's reply contract: a 2xx body is the payload, anything
/// else carries a user-facing `message`.
pub fn decode_reply<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()));
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("Request failed with status {}", status));
    Err(ApiError::Rejected { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(Endpoint::Login(Role::Ops).path(), "/auth/ops/login");
        assert_eq!(Endpoint::Login(Role::Client).path(), "/auth/client/login");
        assert_eq!(Endpoint::Signup.path(), "/auth/client/signup");
        assert_eq!(Endpoint::VerifyEmail.path(), "/auth/client/verify-email");
        assert_eq!(Endpoint::Upload.path(), "/ops/upload");
        assert_eq!(Endpoint::Files.path(), "/client/files");
        assert_eq!(Endpoint::DownloadLink(9).path(), "/client/download-file/9");
    }

    #[test]
    fn success_body_is_payload() {
        let reply: LoginResponse = decode_reply(
            200,
            r#"{"access_token":"abc","user_type":"ops","message":"Login successful"}"#,
        )
        .unwrap();
        assert_eq!(reply.access_token, "abc");
        assert_eq!(reply.user_type, Role::Ops);
    }

    #[test]
    fn created_counts_as_success() {
        let reply: SignupResponse =
            decode_reply(201, r#"{"message":"User created successfully."}"#).unwrap();
        assert!(reply.encrypted_verification_url.is_none());
    }

    #[test]
    fn error_status_surfaces_message() {
        let err = decode_reply::<LoginResponse>(401, r#"{"message":"Invalid credentials"}"#).unwrap_err();
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 401,
                message: "Invalid credentials".into()
            }
        );
    }

    #[test]
    fn error_status_without_message() {
        let err = decode_reply::<MessageResponse>(502, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.user_message("x"), "Request failed with status 502");
    }

    #[test]
    fn malformed_success_is_decode_error() {
        let err = decode_reply::<LoginResponse>(200, r#"{"message":"ok"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
