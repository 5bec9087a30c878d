use gloo_file::{Blob, File};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use web_sys::FormData;

use crate::gateway::{bearer, decode_reply, Endpoint, Gateway, UPLOAD_FIELD};
use crate::upload::PickedFile;
use crate::{
    ApiError, ClientConfig, Credentials, DownloadLinkResponse, FileRecord, FilesResponse,
    LoginResponse, MessageResponse, Role, SignupResponse, UploadResponse, VerifyRequest,
};

impl PickedFile for File {
    fn name(&self) -> String {
        File::name(self)
    }

    fn size(&self) -> u64 {
        Blob::size(self)
    }

    fn mime_type(&self) -> String {
        Blob::raw_mime_type(self)
    }
}

/// [`Gateway`] over `fetch`.
pub struct HttpGateway {
    config: ClientConfig,
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    fn url(&self, endpoint: Endpoint) -> String {
        self.config.url(&endpoint)
    }
}

fn encode_error(e: gloo_net::Error) -> ApiError {
    ApiError::Encode(e.to_string())
}

async fn read_reply<T: DeserializeOwned>(
    sent: Result<Response, gloo_net::Error>,
) -> Result<T, ApiError> {
    let response = sent.map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    decode_reply(status, &body)
}

impl Gateway for HttpGateway {
    type File = File;

    async fn login(&self, role: Role, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let request = Request::post(&self.url(Endpoint::Login(role)))
            .json(credentials)
            .map_err(encode_error)?;
        read_reply(request.send().await).await
    }

    async fn signup(&self, credentials: &Credentials) -> Result<SignupResponse, ApiError> {
        let request = Request::post(&self.url(Endpoint::Signup))
            .json(credentials)
            .map_err(encode_error)?;
        read_reply(request.send().await).await
    }

    async fn verify_email(&self, token: &str) -> Result<MessageResponse, ApiError> {
        let body = VerifyRequest {
            token: token.to_string(),
        };
        let request = Request::post(&self.url(Endpoint::VerifyEmail))
            .json(&body)
            .map_err(encode_error)?;
        read_reply(request.send().await).await
    }

    async fn upload(&self, auth_token: &str, file: &File) -> Result<UploadResponse, ApiError> {
        let form_data =
            FormData::new().map_err(|_| ApiError::Encode("failed to create FormData".into()))?;
        let raw: &web_sys::File = file.as_ref();
        form_data
            .append_with_blob_and_filename(UPLOAD_FIELD, raw, &File::name(file))
            .map_err(|_| ApiError::Encode("failed to append file to FormData".into()))?;

        // No explicit content type: the browser adds the multipart boundary.
        let request = Request::post(&self.url(Endpoint::Upload))
            .header("Authorization", &bearer(auth_token))
            .body(form_data)
            .map_err(encode_error)?;
        read_reply(request.send().await).await
    }

    async fn list_files(&self, auth_token: &str) -> Result<Vec<FileRecord>, ApiError> {
        let sent = Request::get(&self.url(Endpoint::Files))
            .header("Authorization", &bearer(auth_token))
            .send()
            .await;
        let reply: FilesResponse = read_reply(sent).await?;
        Ok(reply.files)
    }

    async fn download_link(&self, auth_token: &str, file_id: u64) -> Result<String, ApiError> {
        let sent = Request::get(&self.url(Endpoint::DownloadLink(file_id)))
            .header("Authorization", &bearer(auth_token))
            .send()
            .await;
        let reply: DownloadLinkResponse = read_reply(sent).await?;
        Ok(reply.download_link)
    }
}

/// Fetches `/config` from the host, falling back to defaults.
pub async fn load_config() -> ClientConfig {
    match Request::get("/config").send().await {
        Ok(response) if response.ok() => match response.json::<ClientConfig>().await {
            Ok(config) => config,
            Err(e) => {
                log::warn!("unreadable /config, using defaults: {}", e);
                ClientConfig::default()
            }
        },
        Ok(response) => {
            log::warn!("/config returned status {}, using defaults", response.status());
            ClientConfig::default()
        }
        Err(e) => {
            log::warn!("/config unavailable, using defaults: {}", e);
            ClientConfig::default()
        }
    }
}
