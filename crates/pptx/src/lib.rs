//! PPTX (Office Open XML) deck generation.
//!
//! Writes 16:9 decks with a title slide and "Title and Content" slides,
//! and reads their text back for inspection.

pub mod reader;
mod template;
pub mod writer;

pub use reader::{DeckReader, DeckSlide};
pub use writer::{download_file_name, generated_on_subtitle, DeckBuilder, PPTX_MIME_TYPE};
