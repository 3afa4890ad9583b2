//! Blocking Gemini REST client.

use crate::chat::GeminiChat;
use crate::wire::{
    api_error_message, Content, GenerateContentRequest, GenerateContentResponse,
    UploadMetadata, UploadResponse, UploadStartRequest, WireFile,
};
use aitools_core::{ChatHandle, Error, ModelService, RemoteFile, Result, SeedPart};
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_VERSION: &str = "v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for one model on the Gemini API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: HttpClient,
}

impl GeminiClient {
    /// Create a client for `model` authenticated with `api_key`.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
            http,
        })
    }

    /// Point the client at another host, e.g. a local proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_VERSION, path)
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/{}/files", self.base_url, API_VERSION)
    }

    /// Run `contents` through `generateContent` and return the reply text.
    pub(crate) fn generate_content(&self, contents: &[Content]) -> Result<String> {
        let url = self.api_url(&format!("models/{}:generateContent", self.model));
        log::debug!("generateContent with {} turns on {}", contents.len(), self.model);

        let response = self
            .authorized(self.http.post(&url))
            .json(&GenerateContentRequest { contents })
            .send()
            .map_err(|e| Error::Network(e.to_string()))?;

        let body: GenerateContentResponse = parse_json(check_status(response)?)?;
        body.into_text()
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.query(&[("key", self.api_key.as_str())])
    }
}

impl ModelService for GeminiClient {
    fn upload_file(&self, path: &Path, mime_type: &str) -> Result<RemoteFile> {
        let bytes = std::fs::read(path)?;
        let display_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");

        // Resumable protocol: open a session, then send the bytes and finalize.
        let start = self
            .authorized(self.http.post(self.upload_url()))
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&UploadStartRequest {
                file: UploadMetadata { display_name },
            })
            .send()
            .map_err(|e| Error::Network(e.to_string()))?;
        let start = check_status(start)?;

        let session_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::ResponseParsing("upload session URL missing".to_string()))?
            .to_string();

        log::debug!("Sending {} bytes for {}", bytes.len(), display_name);
        let response = self
            .http
            .post(session_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .map_err(|e| Error::Network(e.to_string()))?;

        let uploaded: UploadResponse = parse_json(check_status(response)?)?;
        Ok(uploaded.file.into())
    }

    fn get_file(&self, name: &str) -> Result<RemoteFile> {
        let response = self
            .authorized(self.http.get(self.api_url(name)))
            .send()
            .map_err(|e| Error::Network(e.to_string()))?;

        let file: WireFile = parse_json(check_status(response)?)?;
        Ok(file.into())
    }

    fn start_chat(&self, seed: Vec<SeedPart>) -> Result<Box<dyn ChatHandle>> {
        Ok(Box::new(GeminiChat::new(self.clone(), vec![Content::from_seed(seed)])))
    }

    fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(&[Content::user_text(prompt)])
    }
}

/// Turn a non-success response into the matching error.
fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    log::error!("Gemini API error - Status: {}, Body: {}", status, body);
    Err(error_for_status(status.as_u16(), &body))
}

fn error_for_status(status: u16, body: &str) -> Error {
    let message = api_error_message(body);
    match status {
        401 | 403 => Error::AuthenticationFailed(message),
        429 => Error::RateLimited(message),
        400 | 404 => Error::InvalidRequest(message),
        500..=599 => Error::ServerError { status, message },
        _ => Error::UnexpectedStatus { status, message },
    }
}

fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().map_err(|e| Error::Network(e.to_string()))?;
    serde_json::from_str(&text)
        .map_err(|e| Error::ResponseParsing(format!("{}; body: {}", e, text)))
}
