//! Handlers for the three tool views and deck inspection.

use aitools_core::prompts::{slide_structure_prompt, ToolPrompt, CSV_CHAT, PDF_CHAT};
use aitools_core::{
    DataTable, ModelService, PollPolicy, Role, SessionState, SessionStore, Settings, SlideParser,
    ToolTab, UploadAdapter,
};
use aitools_gemini::GeminiClient;
use aitools_pdf::PdfTextExtractor;
use aitools_pptx::{download_file_name, DeckBuilder, DeckReader, PPTX_MIME_TYPE};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Chat about a PDF until the user leaves.
pub fn pdf_chat(settings: &Settings, file: &Path) -> Result<()> {
    let client = client(settings)?;
    let mut store = SessionStore::new();
    let session = store.session_mut(ToolTab::PdfChat);

    eprintln!("Processing PDF...");
    start_session(settings, &client, session, file, ToolTab::PdfChat, &PDF_CHAT)?;

    run_chat(session, io::stdin().lock(), io::stdout().lock())
}

/// Load a CSV, optionally preview it, then chat about it.
pub fn csv_chat(settings: &Settings, file: &Path, preview_rows: Option<usize>) -> Result<()> {
    let reader = File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let table = DataTable::from_reader(BufReader::new(reader))
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    log::info!(
        "Loaded {} rows and {} columns",
        table.row_count(),
        table.headers().len()
    );

    let client = client(settings)?;
    let mut store = SessionStore::new();
    let session = store.session_mut(ToolTab::CsvChat);
    session.set_table(table);

    let upload = stage_table(session, preview_rows, &mut io::stdout().lock())?;

    eprintln!("Processing CSV...");
    start_session(settings, &client, session, upload.path(), ToolTab::CsvChat, &CSV_CHAT)?;

    run_chat(session, io::stdin().lock(), io::stdout().lock())
}

/// Preview the session's table and write it to a temporary CSV for upload.
///
/// The upload goes through a re-serialized copy of the parsed table.
fn stage_table<W: Write>(
    session: &SessionState,
    preview_rows: Option<usize>,
    out: &mut W,
) -> Result<NamedTempFile> {
    let table = session.table().context("No table loaded")?;

    if let Some(rows) = preview_rows {
        writeln!(out, "{}", table.render_preview(rows))?;
    }

    let upload = tempfile::Builder::new()
        .prefix("aitools-")
        .suffix(".csv")
        .tempfile()
        .context("Failed to create temporary file")?;
    table
        .write_csv(upload.as_file())
        .context("Failed to write temporary CSV")?;
    Ok(upload)
}

/// Summarize a PDF into a slide outline and render it as a deck.
pub fn ppt_from_pdf(
    settings: &Settings,
    file: &Path,
    title: &str,
    output: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    let extractor = PdfTextExtractor::new()
        .with_char_budget(settings.processing_chunk_size)
        .with_min_content_length(settings.min_content_length);
    let extracted = extractor
        .extract_file(file)
        .with_context(|| format!("Error reading PDF {}", file.display()))?;

    eprintln!("Generating PPT structure...");
    let client = client(settings)?;
    let prompt = slide_structure_prompt(title, &extracted.text, settings.processing_chunk_size);
    let structure = client
        .generate(&prompt)
        .context("Error generating presentation structure")?;

    println!("Generated Structure:\n{}", structure.trim());

    let records = SlideParser::new().parse(&structure);
    if records.is_empty() {
        log::warn!("No slides recognized in the generated structure");
    }

    if !yes && !confirm("Create Presentation?", io::stdin().lock(), io::stderr())? {
        eprintln!("Presentation not created.");
        return Ok(());
    }

    let mut deck = DeckBuilder::new(title)
        .with_font(settings.font.clone())
        .with_max_slides(settings.max_slides);
    deck.add_slides(records);
    let bytes = deck.to_bytes().context("Error creating presentation")?;

    let path = output.unwrap_or_else(|| PathBuf::from(download_file_name(title)));
    std::fs::write(&path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;

    println!(
        "Saved {} ({} slides, {})",
        path.display(),
        deck.slide_count(),
        PPTX_MIME_TYPE
    );
    Ok(())
}

/// Print the text of every slide in a deck.
pub fn inspect(file: &Path) -> Result<()> {
    let reader = File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let slides = DeckReader::new()
        .read(BufReader::new(reader))
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut out = io::stdout().lock();
    for slide in &slides {
        writeln!(out, "Slide {}: {}", slide.number, slide.title)?;
        for line in &slide.body {
            writeln!(out, "  - {}", line)?;
        }
    }
    Ok(())
}

fn client(settings: &Settings) -> Result<GeminiClient> {
    let api_key = settings
        .api_key
        .clone()
        .context("GEMINI_API_KEY is not set (export it or add it to .env)")?;
    Ok(GeminiClient::new(api_key, settings.model.clone())?)
}

fn uploader(settings: &Settings) -> UploadAdapter {
    UploadAdapter::new(PollPolicy {
        interval: settings.poll_interval,
        timeout: settings.poll_timeout,
    })
    .with_max_bytes(settings.max_upload_bytes())
}

/// Initialize `session` with `file`; an error leaves it un-initialized.
fn start_session(
    settings: &Settings,
    service: &dyn ModelService,
    session: &mut SessionState,
    file: &Path,
    tab: ToolTab,
    prompt: &ToolPrompt,
) -> Result<()> {
    session
        .initialize(service, &uploader(settings), file, tab.mime_type(), prompt)
        .with_context(|| format!("Error processing {}", tab.label()))?;
    Ok(())
}

/// Read prompts from `input` until EOF, `exit` or `quit`.
///
/// Messages already in the session are printed first.
fn run_chat<R: BufRead, W: Write>(session: &mut SessionState, input: R, mut out: W) -> Result<()> {
    for message in session.messages() {
        print_message(&mut out, message.role, &message.content)?;
    }

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt.eq_ignore_ascii_case("exit") || prompt.eq_ignore_ascii_case("quit") {
            break;
        }

        let reply = session.ask(prompt);
        print_message(&mut out, reply.role, &reply.content)?;
    }

    writeln!(out)?;
    Ok(())
}

fn print_message<W: Write>(out: &mut W, role: Role, content: &str) -> io::Result<()> {
    writeln!(out, "[{}] {}", role, content)
}

/// Ask a yes/no question; anything but "y" or "yes" is a no.
fn confirm<R: BufRead, W: Write>(question: &str, mut input: R, mut out: W) -> Result<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
