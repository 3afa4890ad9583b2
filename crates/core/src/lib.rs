//! Core domain types, session state, slide-structure parsing and upload
//! polling for the AI data tools.

pub mod config;
pub mod error;
pub mod prompts;
pub mod service;
pub mod session;
pub mod slides;
pub mod table;
pub mod types;
pub mod upload;

pub use config::Settings;
pub use error::{Error, Result};
pub use service::{ChatHandle, ModelService, SeedPart};
pub use session::{SessionState, SessionStore};
pub use slides::SlideParser;
pub use table::DataTable;
pub use types::{FileState, Message, RemoteFile, Role, SlideRecord, ToolTab};
pub use upload::{PollPolicy, UploadAdapter};
