//! Gemini REST request and response bodies.

use aitools_core::{Error, FileState, RemoteFile, Result, SeedPart};
use serde::{Deserialize, Serialize};

pub(crate) const ROLE_USER: &str = "user";
pub(crate) const ROLE_MODEL: &str = "model";

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest<'a> {
    pub contents: &'a [Content],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: ROLE_USER.to_string(),
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: ROLE_MODEL.to_string(),
            parts: vec![Part::Text { text: text.into() }],
        }
    }

    /// Build the opening user turn of a chat from its seed parts.
    pub fn from_seed(seed: Vec<SeedPart>) -> Self {
        let parts = seed
            .into_iter()
            .map(|part| match part {
                SeedPart::File(file) => Part::FileData {
                    file_data: FileData {
                        mime_type: file.mime_type,
                        file_uri: file.uri,
                    },
                },
                SeedPart::Text(text) => Part::Text { text },
            })
            .collect();

        Self {
            role: ROLE_USER.to_string(),
            parts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text {
        text: String,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct FileData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "fileUri")]
    pub file_uri: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub fn into_text(self) -> Result<String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(Error::Blocked(reason));
        }

        let candidate = self.candidates.into_iter().next().ok_or(Error::EmptyResponse)?;
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_default();
            return match reason.as_str() {
                "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
                    Err(Error::Blocked(reason))
                }
                _ => Err(Error::EmptyResponse),
            };
        }

        Ok(text)
    }
}

/// File resource as returned by the Files API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireFile {
    name: String,
    display_name: Option<String>,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    state: FileState,
}

impl From<WireFile> for RemoteFile {
    fn from(file: WireFile) -> Self {
        RemoteFile {
            name: file.name,
            display_name: file.display_name,
            mime_type: file.mime_type,
            uri: file.uri,
            state: file.state,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub file: WireFile,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadStartRequest<'a> {
    pub file: UploadMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadMetadata<'a> {
    pub display_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull the human-readable message out of an error body, falling back to the raw text.
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
