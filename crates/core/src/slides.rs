//! Slide-structure parsing for model-generated outlines.
//!
//! The model is asked to answer in a fixed markdown shape:
//!
//! ```text
//! **Slide 2: [Introduction]**
//! * **Title:** "Intro title"
//! * **Bullet Points:**
//!     * Bullet 1
//!     * Bullet 2
//! ```
//!
//! Slide markers are found with a regex; each slide body is then classified
//! line by line. Parsing never fails: output the model garbled simply yields
//! fewer (or fallback-titled) records.

use crate::types::SlideRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Regex matching one slide marker such as `**Slide 3: Key Findings**`.
static SLIDE_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Slide\s+\d+:[^\n]*?\*\*").unwrap());

/// Regex matching a bold-labelled field line: `* **Label:** value` or `**Label**: value`.
static FIELD_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[*-]\s+)?\*\*\s*([^*:]+?)\s*(?::\s*\*\*|\*\*\s*:)\s*(.*)$").unwrap()
});

/// Regex matching an unformatted title line: `Title: value`.
static PLAIN_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[*-]\s+)?Title:\s*(.*)$").unwrap());

/// Regex matching an asterisk bullet line.
static BULLET_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\*\s+(.*)$").unwrap());

/// Opening and closing quote pairs stripped from field values.
const QUOTE_PAIRS: &[(char, char)] = &[('"', '"'), ('\u{201C}', '\u{201D}')];

/// Labels the prompt template itself uses. Their values become bullets
/// without the label; any other bold label is kept as `Label: value`.
const TEMPLATE_LABELS: &[&str] = &["subtitle", "bullet points", "bullets", "key points", "content"];

/// What a single body line contributes to its slide.
#[derive(Debug, PartialEq, Eq)]
enum BodyLine<'a> {
    Title(&'a str),
    Field { label: &'a str, value: &'a str },
    Bullet(&'a str),
    Other,
}

fn classify_line(line: &str) -> BodyLine<'_> {
    let trimmed = line.trim();

    if let Some(caps) = FIELD_LINE_REGEX.captures(trimmed) {
        let label = caps.get(1).map_or("", |m| m.as_str());
        let value = caps.get(2).map_or("", |m| m.as_str()).trim();
        if label.eq_ignore_ascii_case("title") {
            return BodyLine::Title(value);
        }
        return BodyLine::Field { label, value };
    }

    if let Some(caps) = PLAIN_TITLE_REGEX.captures(trimmed) {
        return BodyLine::Title(caps.get(1).map_or("", |m| m.as_str()).trim());
    }

    if let Some(caps) = BULLET_LINE_REGEX.captures(trimmed) {
        return BodyLine::Bullet(caps.get(1).map_or("", |m| m.as_str()).trim());
    }

    BodyLine::Other
}

/// Strip whitespace and one surrounding pair of quotes from a field value.
fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    QUOTE_PAIRS
        .iter()
        .find_map(|&(open, close)| trimmed.strip_prefix(open)?.strip_suffix(close))
        .map_or(trimmed, str::trim)
}

fn is_template_label(label: &str) -> bool {
    TEMPLATE_LABELS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(label))
}

/// Parser turning model output into ordered [`SlideRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct SlideParser;

impl SlideParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse every slide marker in `text` into a record, in marker order.
    ///
    /// The body of marker `i` is the text between it and the next marker. A
    /// body without a title line gets the title `Slide {i + 2}`, matching the
    /// numbering of the rendered deck where slide 1 is the title slide.
    pub fn parse(&self, text: &str) -> Vec<SlideRecord> {
        let fragments: Vec<&str> = SLIDE_MARKER_REGEX.split(text).collect();
        let marker_count = SLIDE_MARKER_REGEX.find_iter(text).count();

        let records: Vec<SlideRecord> = (0..marker_count)
            .map(|i| {
                let body = fragments.get(i + 1).copied().unwrap_or("");
                self.parse_body(body, i)
            })
            .collect();

        log::debug!("Parsed {} slide records", records.len());
        records
    }

    /// Parse one slide body.
    fn parse_body(&self, body: &str, index: usize) -> SlideRecord {
        let mut title: Option<String> = None;
        let mut record = SlideRecord::default();

        for line in body.lines() {
            match classify_line(line) {
                BodyLine::Title(value) => {
                    let value = unquote(value);
                    if title.is_none() && !value.is_empty() {
                        title = Some(value.to_string());
                    }
                }
                // Labels without a value ("Bullet Points:") are section headers.
                BodyLine::Field { label, value } => {
                    let value = unquote(value);
                    if value.is_empty() {
                        log::trace!("Skipping section header {:?}", label);
                    } else if is_template_label(label) {
                        record.add_bullet(value);
                    } else {
                        record.add_bullet(format!("{}: {}", label, value));
                    }
                }
                BodyLine::Bullet(text) if !text.is_empty() => record.add_bullet(text),
                BodyLine::Bullet(_) | BodyLine::Other => {}
            }
        }

        record.title = title.unwrap_or_else(|| format!("Slide {}", index + 2));
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_SLIDES: &str = r#"Here is your structure:

**Slide 1: [Title Slide]**
* **Title:** "Business Report"
* **Subtitle:** "Quarterly results at a glance"

**Slide 2: [Introduction]**
* **Title:** "Why this report"
* **Bullet Points:**
    * Revenue grew 12%
    * Costs held flat

**Slide 3: [Details]**
* **Title:** "Regional breakdown"
* **Bullet Points:**
    * North: strong
    * South: recovering

**Slide 4: [Risks]**
* **Bullet Points:**
    * Supply chain

**Slide 5: [Conclusion]**
* **Title:** "Next steps"
"#;

    fn record(title: &str, bullets: &[&str]) -> SlideRecord {
        SlideRecord {
            title: title.to_string(),
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
        }
    }

    #[test]
    fn test_reference_example() {
        let parser = SlideParser::new();
        let text = "**Slide 1: X**\n* **Title:** \"A\"\n* B1\n* B2\n**Slide 2: Y**\n* **Title:** \"C\"";

        assert_eq!(
            parser.parse(text),
            vec![record("A", &["B1", "B2"]), record("C", &[])]
        );
    }

    #[test]
    fn test_one_record_per_marker_in_order() {
        let parser = SlideParser::new();
        let records = parser.parse(FIVE_SLIDES);

        assert_eq!(records.len(), 5);
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Business Report",
                "Why this report",
                "Regional breakdown",
                "Slide 5",
                "Next steps"
            ]
        );
    }

    #[test]
    fn test_nested_bullets_and_section_headers() {
        let parser = SlideParser::new();
        let records = parser.parse(FIVE_SLIDES);

        assert_eq!(records[1].bullets, vec!["Revenue grew 12%", "Costs held flat"]);
        assert_eq!(records[2].bullets, vec!["North: strong", "South: recovering"]);
    }

    #[test]
    fn test_subtitle_becomes_bullet() {
        let parser = SlideParser::new();
        let records = parser.parse(FIVE_SLIDES);

        assert_eq!(records[0].bullets, vec!["Quarterly results at a glance"]);
    }

    #[test]
    fn test_other_bold_labels_keep_label() {
        let parser = SlideParser::new();
        let records = parser.parse("**Slide 1: A**\n* **Title:** T\n* **Revenue:** up 4%");

        assert_eq!(records[0].bullets, vec!["Revenue: up 4%"]);
    }

    #[test]
    fn test_missing_title_uses_fallback() {
        let parser = SlideParser::new();
        let text = "**Slide 1: A**\n* only a bullet\n**Slide 2: B**\nnothing here";
        let records = parser.parse(text);

        assert_eq!(records[0].title, "Slide 2");
        assert_eq!(records[1].title, "Slide 3");
    }

    #[test]
    fn test_no_bullets_is_empty_vec() {
        let parser = SlideParser::new();
        let records = parser.parse("**Slide 1: A**\n* **Title:** \"Only title\"\n");

        assert_eq!(records.len(), 1);
        assert!(records[0].bullets.is_empty());
    }

    #[test]
    fn test_unparseable_text_yields_nothing() {
        let parser = SlideParser::new();

        assert!(parser.parse("").is_empty());
        assert!(parser.parse("I'm sorry, I can't help with that.").is_empty());
        assert!(parser.parse("Slide 1: not bold\nTitle: x").is_empty());
    }

    #[test]
    fn test_marker_at_end_has_empty_body() {
        let parser = SlideParser::new();
        let records = parser.parse("**Slide 1: A**\n* **Title:** T\n**Slide 2: B**");

        assert_eq!(records.len(), 2);
        assert_eq!(records[1], record("Slide 3", &[]));
    }

    #[test]
    fn test_plain_title_line() {
        let parser = SlideParser::new();
        let records = parser.parse("**Slide 1: A**\nTitle: Plain heading\n* point");

        assert_eq!(records[0], record("Plain heading", &["point"]));
    }

    #[test]
    fn test_first_title_wins() {
        let parser = SlideParser::new();
        let records =
            parser.parse("**Slide 1: A**\n* **Title:** First\n* **Title:** Second\n* b");

        assert_eq!(records[0], record("First", &["b"]));
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let parser = SlideParser::new();
        assert_eq!(parser.parse(FIVE_SLIDES), parser.parse(FIVE_SLIDES));
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line("* **Title:** \"X\""), BodyLine::Title("\"X\""));
        assert_eq!(classify_line("**Title**: X"), BodyLine::Title("X"));
        assert_eq!(
            classify_line("* **Bullet Points:**"),
            BodyLine::Field {
                label: "Bullet Points",
                value: ""
            }
        );
        assert_eq!(classify_line("    * Bullet 1"), BodyLine::Bullet("Bullet 1"));
        assert_eq!(classify_line("Some prose"), BodyLine::Other);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(" \"Quoted\" "), "Quoted");
        assert_eq!(unquote("\u{201C}Curly\u{201D}"), "Curly");
        assert_eq!(unquote("Bare"), "Bare");
    }

    #[test]
    fn test_unquote_strips_one_pair_only() {
        assert_eq!(unquote("\"He said \"hi\"\""), "He said \"hi\"");
        assert_eq!(unquote("\"\"Doubled\"\""), "\"Doubled\"");
        assert_eq!(unquote("\"Unbalanced"), "\"Unbalanced");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn test_title_ending_in_quoted_word() {
        let parser = SlideParser::new();
        let records = parser.parse("**Slide 1: A**\n* **Title:** \"Why we say \"yes\"\"\n");

        assert_eq!(records[0].title, "Why we say \"yes\"");
    }
}
