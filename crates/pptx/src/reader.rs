//! Reads the text of a `.pptx` deck back out, slide by slide.

use aitools_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Text found on one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSlide {
    pub number: usize,
    /// Text of the title or centered-title placeholder.
    pub title: String,
    /// Non-empty paragraphs from every other shape, in document order.
    pub body: Vec<String>,
}

/// Reader for decks written by [`crate::DeckBuilder`] or PowerPoint.
#[derive(Debug, Default)]
pub struct DeckReader;

impl DeckReader {
    pub fn new() -> Self {
        Self
    }

    /// Read every slide in presentation order.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<DeckSlide>> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.slide_order(&mut archive)?;
        log::debug!("Deck lists {} slides", slide_order.len());

        slide_order
            .iter()
            .enumerate()
            .map(|(idx, path)| {
                let xml = read_part(&mut archive, path)?;
                let mut slide = parse_slide_xml(&xml)?;
                slide.number = idx + 1;
                Ok(slide)
            })
            .collect()
    }

    /// Slide part paths from the presentation relationships, sorted by slide number.
    fn slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels = read_part(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"Relationship" =>
                {
                    let rel_type = attribute(e, b"Type").unwrap_or_default();
                    let target = attribute(e, b"Target").unwrap_or_default();

                    if rel_type.ends_with("/slide") {
                        let order = extract_slide_number(&target)
                            .or_else(|| attribute(e, b"Id").and_then(|id| extract_slide_number(&id)));
                        let path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((path, order));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!("Error parsing relationships: {}", e)));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }
}

/// Collect title and body paragraphs from one slide part.
fn parse_slide_xml(xml: &str) -> Result<DeckSlide> {
    let mut slide = DeckSlide::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut in_shape = false;
    let mut is_title = false;
    let mut in_paragraph = false;
    let mut paragraph = String::new();
    let mut paragraphs: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    in_shape = true;
                    is_title = false;
                    paragraphs.clear();
                }
                b"ph" if in_shape => is_title = is_title_placeholder(e),
                b"p" if in_shape => {
                    in_paragraph = true;
                    paragraph.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if in_shape && local_name(e.name().as_ref()) == b"ph" {
                    is_title = is_title_placeholder(e);
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_paragraph {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::XmlError(format!("Bad slide text: {}", e)))?;
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"p" if in_paragraph => {
                    in_paragraph = false;
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        paragraphs.push(text.to_string());
                    }
                }
                b"sp" => {
                    in_shape = false;
                    if is_title && slide.title.is_empty() {
                        slide.title = paragraphs.join(" ");
                    } else {
                        slide.body.append(&mut paragraphs);
                    }
                    paragraphs.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing slide: {}", e))),
            _ => {}
        }
    }

    Ok(slide)
}

fn is_title_placeholder(e: &BytesStart<'_>) -> bool {
    matches!(attribute(e, b"type").as_deref(), Some("title") | Some("ctrTitle"))
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Trailing number of "rId2" or "slides/slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml");
    let start = s.len() - s.chars().rev().take_while(|c| c.is_ascii_digit()).count();
    s[start..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeckBuilder;
    use aitools_core::SlideRecord;
    use std::io::Cursor;

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slides/slide3.xml"), Some(3));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_parse_slide_xml_splits_title_and_body() {
        let xml = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>Heading</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:nvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>
              <p:txBody><a:p><a:r><a:t>First &amp; best</a:t></a:r></a:p>
              <a:p><a:endParaRPr/></a:p>
              <a:p><a:r><a:t>Second</a:t></a:r></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#;

        let slide = parse_slide_xml(xml).unwrap();
        assert_eq!(slide.title, "Heading");
        assert_eq!(slide.body, vec!["First & best", "Second"]);
    }

    #[test]
    fn test_written_deck_reads_back() {
        let mut deck = DeckBuilder::new("Annual Review").with_subtitle("Generated on 01 June 2025");
        deck.add_slides(vec![
            SlideRecord {
                title: "Executive Summary".to_string(),
                bullets: vec!["Revenue grew 20%".to_string(), "Costs fell".to_string()],
            },
            SlideRecord {
                title: "Next Steps".to_string(),
                bullets: Vec::new(),
            },
        ]);
        let bytes = deck.to_bytes().unwrap();

        let slides = DeckReader::new().read(Cursor::new(bytes)).unwrap();
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].title, "Annual Review");
        assert_eq!(slides[0].body, vec!["Generated on 01 June 2025"]);
        assert_eq!(slides[1].number, 2);
        assert_eq!(slides[1].title, "Executive Summary");
        assert_eq!(slides[1].body, vec!["Revenue grew 20%", "Costs fell"]);
        assert_eq!(slides[2].title, "Next Steps");
        assert!(slides[2].body.is_empty());
    }

    #[test]
    fn test_capped_deck_reads_back() {
        let mut deck = DeckBuilder::new("Long").with_max_slides(10);
        deck.add_slides((1..=12).map(|i| SlideRecord {
            title: format!("Slide {}", i),
            bullets: vec![format!("point {}", i)],
        }));
        let bytes = deck.to_bytes().unwrap();

        let slides = DeckReader::new().read(Cursor::new(bytes)).unwrap();
        assert_eq!(slides.len(), 11);
        assert_eq!(slides[10].title, "Slide 10");
    }

    #[test]
    fn test_not_a_zip() {
        let result = DeckReader::new().read(Cursor::new(b"plain text".to_vec()));
        assert!(matches!(result, Err(Error::ZipError(_))));
    }
}
