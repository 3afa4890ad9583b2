//! Per-tool session state and the conversation manager.
//!
//! Each tool tab owns one [`SessionState`]. A session is initialized once,
//! when its first document arrives, and after that relays every prompt to
//! the same remote chat. Messages are append-only.

use crate::prompts::ToolPrompt;
use crate::service::{ChatHandle, ModelService, SeedPart};
use crate::table::DataTable;
use crate::types::{Message, RemoteFile, ToolTab};
use crate::upload::UploadAdapter;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Conversation state for one tool tab.
#[derive(Default)]
pub struct SessionState {
    messages: Vec<Message>,
    file_processed: bool,
    remote_file: Option<RemoteFile>,
    chat: Option<Box<dyn ChatHandle>>,
    table: Option<DataTable>,
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("messages", &self.messages.len())
            .field("file_processed", &self.file_processed)
            .field("remote_file", &self.remote_file)
            .field("has_chat", &self.chat.is_some())
            .field("table", &self.table.as_ref().map(|t| t.row_count()))
            .finish()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in the order they were appended.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_processed(&self) -> bool {
        self.file_processed
    }

    pub fn remote_file(&self) -> Option<&RemoteFile> {
        self.remote_file.as_ref()
    }

    /// Tabular snapshot attached by the CSV tool, if any.
    pub fn table(&self) -> Option<&DataTable> {
        self.table.as_ref()
    }

    pub fn set_table(&mut self, table: DataTable) {
        self.table = Some(table);
    }

    /// Upload `path`, open the chat and greet the user.
    ///
    /// Does nothing and returns `Ok(false)` if the session was already
    /// initialized. On error the session is left untouched so the caller can
    /// retry with the same or another file.
    pub fn initialize(
        &mut self,
        service: &dyn ModelService,
        uploader: &UploadAdapter,
        path: &Path,
        mime_type: &str,
        prompt: &ToolPrompt,
    ) -> Result<bool> {
        if self.file_processed {
            log::debug!("Session already initialized; ignoring {}", path.display());
            return Ok(false);
        }

        let file = uploader.upload(service, path, mime_type)?;
        let chat = service.start_chat(vec![
            SeedPart::File(file.clone()),
            SeedPart::Text(prompt.instruction.to_string()),
        ])?;

        self.remote_file = Some(file);
        self.chat = Some(chat);
        self.file_processed = true;
        self.messages.push(Message::assistant(prompt.greeting));

        Ok(true)
    }

    /// Relay one user prompt and record the reply.
    ///
    /// Always appends exactly two messages: the prompt and then either the
    /// reply or an `Error: ...` message describing why the turn failed.
    pub fn ask(&mut self, prompt: &str) -> &Message {
        self.messages.push(Message::user(prompt));

        let reply = match self.chat.as_mut() {
            Some(chat) => chat.send_message(prompt),
            None => Err(Error::NotInitialized),
        };

        let content = match reply {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Chat turn failed: {}", e);
                format!("Error: {}", e)
            }
        };

        self.messages.push(Message::assistant(content));
        &self.messages[self.messages.len() - 1]
    }
}

/// Process-wide map of tool tab to session state.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<ToolTab, SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tab's session, created empty on first use.
    pub fn session_mut(&mut self, tab: ToolTab) -> &mut SessionState {
        self.sessions.entry(tab).or_insert_with(|| {
            log::debug!("Creating session for {}", tab);
            SessionState::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::PDF_CHAT;
    use crate::types::{FileState, Role};
    use crate::upload::tests::remote_file;
    use crate::upload::PollPolicy;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    /// Chat that echoes prompts, or fails on prompts containing "fail".
    struct EchoChat {
        sent: Rc<RefCell<Vec<String>>>,
    }

    impl ChatHandle for EchoChat {
        fn send_message(&mut self, prompt: &str) -> Result<String> {
            if prompt.contains("fail") {
                return Err(Error::RateLimited("quota exceeded".to_string()));
            }
            self.sent.borrow_mut().push(prompt.to_string());
            Ok(format!("echo: {}", prompt))
        }
    }

    struct FakeService {
        upload_fails: bool,
        seeds: RefCell<Vec<Vec<SeedPart>>>,
        sent: Rc<RefCell<Vec<String>>>,
    }

    impl FakeService {
        fn new() -> Self {
            Self {
                upload_fails: false,
                seeds: RefCell::new(Vec::new()),
                sent: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    impl ModelService for FakeService {
        fn upload_file(&self, _path: &Path, _mime_type: &str) -> Result<RemoteFile> {
            if self.upload_fails {
                return Err(Error::ServerError {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(remote_file(FileState::Active))
        }

        fn get_file(&self, _name: &str) -> Result<RemoteFile> {
            Ok(remote_file(FileState::Active))
        }

        fn start_chat(&self, seed: Vec<SeedPart>) -> Result<Box<dyn ChatHandle>> {
            self.seeds.borrow_mut().push(seed);
            Ok(Box::new(EchoChat {
                sent: Rc::clone(&self.sent),
            }))
        }

        fn generate(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }
    }

    fn uploader() -> UploadAdapter {
        UploadAdapter::new(PollPolicy {
            interval: Duration::from_millis(1),
            timeout: Duration::from_secs(1),
        })
    }

    fn temp_pdf() -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut tmp, b"%PDF-1.4").unwrap();
        tmp
    }

    #[test]
    fn test_initialize_seeds_chat_and_greets() {
        let service = FakeService::new();
        let tmp = temp_pdf();
        let mut session = SessionState::new();

        let created = session
            .initialize(&service, &uploader(), tmp.path(), "application/pdf", &PDF_CHAT)
            .unwrap();

        assert!(created);
        assert!(session.is_processed());
        assert_eq!(session.messages(), &[Message::assistant(PDF_CHAT.greeting)]);

        let seeds = service.seeds.borrow();
        assert_eq!(seeds.len(), 1);
        assert!(matches!(seeds[0][0], SeedPart::File(ref f) if f.name == "files/test123"));
        assert_eq!(seeds[0][1], SeedPart::Text(PDF_CHAT.instruction.to_string()));
    }

    #[test]
    fn test_initialize_only_once() {
        let service = FakeService::new();
        let tmp = temp_pdf();
        let mut session = SessionState::new();

        session
            .initialize(&service, &uploader(), tmp.path(), "application/pdf", &PDF_CHAT)
            .unwrap();
        session.ask("hello");
        let again = session
            .initialize(&service, &uploader(), tmp.path(), "application/pdf", &PDF_CHAT)
            .unwrap();

        assert!(!again);
        assert_eq!(service.seeds.borrow().len(), 1);
        assert_eq!(session.messages().len(), 3);
    }

    #[test]
    fn test_failed_upload_leaves_session_uninitialized() {
        let mut service = FakeService::new();
        service.upload_fails = true;
        let tmp = temp_pdf();
        let mut session = SessionState::new();

        let result =
            session.initialize(&service, &uploader(), tmp.path(), "application/pdf", &PDF_CHAT);

        assert!(result.is_err());
        assert!(!session.is_processed());
        assert!(session.messages().is_empty());
        assert!(session.remote_file().is_none());
    }

    #[test]
    fn test_successful_turn_appends_two_messages() {
        let service = FakeService::new();
        let tmp = temp_pdf();
        let mut session = SessionState::new();
        session
            .initialize(&service, &uploader(), tmp.path(), "application/pdf", &PDF_CHAT)
            .unwrap();
        let before = session.messages().len();

        let reply = session.ask("What is on page 2?").clone();

        assert_eq!(reply, Message::assistant("echo: What is on page 2?"));
        let messages = session.messages();
        assert_eq!(messages.len(), before + 2);
        assert_eq!(messages[before], Message::user("What is on page 2?"));
        assert_eq!(messages[before + 1].role, Role::Assistant);
        assert_eq!(*service.sent.borrow(), vec!["What is on page 2?"]);
    }

    #[test]
    fn test_failed_turn_becomes_error_message() {
        let service = FakeService::new();
        let tmp = temp_pdf();
        let mut session = SessionState::new();
        session
            .initialize(&service, &uploader(), tmp.path(), "application/pdf", &PDF_CHAT)
            .unwrap();

        session.ask("please fail");
        session.ask("second try");

        let messages = session.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[2].role, Role::Assistant);
        assert!(messages[2].content.starts_with("Error: "));
        assert!(messages[2].content.contains("quota exceeded"));
        assert_eq!(messages[4].content, "echo: second try");
    }

    #[test]
    fn test_ask_before_initialize() {
        let mut session = SessionState::new();

        let reply = session.ask("anyone there?").clone();

        assert_eq!(session.messages().len(), 2);
        assert!(reply.content.starts_with("Error: "));
    }

    #[test]
    fn test_initialize_keeps_earlier_messages() {
        let service = FakeService::new();
        let tmp = temp_pdf();
        let mut session = SessionState::new();

        session.ask("early question");
        let before = session.messages().to_vec();
        session
            .initialize(&service, &uploader(), tmp.path(), "application/pdf", &PDF_CHAT)
            .unwrap();

        let messages = session.messages();
        assert_eq!(messages.len(), before.len() + 1);
        assert!(messages.starts_with(&before));
        assert_eq!(messages[2], Message::assistant(PDF_CHAT.greeting));
    }

    #[test]
    fn test_store_isolates_tabs() {
        let mut store = SessionStore::new();

        store.session_mut(ToolTab::PdfChat).ask("pdf question");

        assert_eq!(store.session_mut(ToolTab::PdfChat).messages().len(), 2);
        assert!(store.session_mut(ToolTab::CsvChat).messages().is_empty());
        assert_eq!(store.session_mut(ToolTab::PdfChat).messages().len(), 2);
    }
}
