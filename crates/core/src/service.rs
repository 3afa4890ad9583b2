//! Seams to the remote language-model service.

use crate::types::RemoteFile;
use crate::Result;
use std::path::Path;

/// One part of the seed turn that opens a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedPart {
    /// Reference to an uploaded file.
    File(RemoteFile),
    /// Plain text, such as a system instruction.
    Text(String),
}

/// A persistent multi-turn conversation held by the model service.
pub trait ChatHandle {
    /// Send one user prompt and return the model's reply text.
    ///
    /// A failed turn must leave the conversation history unchanged.
    fn send_message(&mut self, prompt: &str) -> Result<String>;
}

/// Request/response operations offered by the model service.
pub trait ModelService {
    /// Upload a local file with a declared MIME type.
    fn upload_file(&self, path: &Path, mime_type: &str) -> Result<RemoteFile>;

    /// Fetch the current state of an uploaded file by resource name.
    fn get_file(&self, name: &str) -> Result<RemoteFile>;

    /// Open a chat whose history starts with one user turn made of `seed`.
    fn start_chat(&self, seed: Vec<SeedPart>) -> Result<Box<dyn ChatHandle>>;

    /// One-shot text generation.
    fn generate(&self, prompt: &str) -> Result<String>;
}
