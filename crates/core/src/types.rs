//! Domain types shared by the tool handlers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// A single role-tagged conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user-authored message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant-authored message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One slide's title and bullet list, parsed from model output before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlideRecord {
    pub title: String,
    pub bullets: Vec<String>,
}

impl SlideRecord {
    /// Append a bullet line.
    pub fn add_bullet(&mut self, text: impl Into<String>) {
        self.bullets.push(text.into());
    }
}

/// Processing state of a file held by the model service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    #[default]
    StateUnspecified,
    Processing,
    Active,
    Failed,
}

/// Handle to a file uploaded to the model service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// Resource name, e.g. `files/abc123`.
    pub name: String,
    pub display_name: Option<String>,
    pub mime_type: String,
    /// URI used to reference the file from a conversation.
    pub uri: String,
    pub state: FileState,
}

impl RemoteFile {
    pub fn is_processing(&self) -> bool {
        self.state == FileState::Processing
    }
}

/// The tool views offered to the user. Each owns one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolTab {
    PdfChat,
    CsvChat,
    PptFromPdf,
}

impl ToolTab {
    /// All tools, in navigation order.
    pub const ALL: [ToolTab; 3] = [ToolTab::PdfChat, ToolTab::CsvChat, ToolTab::PptFromPdf];

    /// Human-readable label shown in navigation.
    pub fn label(&self) -> &'static str {
        match self {
            ToolTab::PdfChat => "PDF Chat",
            ToolTab::CsvChat => "CSV Chat",
            ToolTab::PptFromPdf => "PPT From PDF",
        }
    }

    /// MIME type of the document this tool accepts.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ToolTab::PdfChat | ToolTab::PptFromPdf => "application/pdf",
            ToolTab::CsvChat => "text/csv",
        }
    }
}

impl fmt::Display for ToolTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_state_wire_names() {
        let state: FileState = serde_json::from_str("\"PROCESSING\"").unwrap();
        assert_eq!(state, FileState::Processing);
        let state: FileState = serde_json::from_str("\"STATE_UNSPECIFIED\"").unwrap();
        assert_eq!(state, FileState::StateUnspecified);
    }

    #[test]
    fn test_tool_labels() {
        let labels: Vec<_> = ToolTab::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(labels, vec!["PDF Chat", "CSV Chat", "PPT From PDF"]);
        assert_eq!(ToolTab::CsvChat.mime_type(), "text/csv");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
