//! Builds `.pptx` decks from slide records.

use crate::template::{
    content_types_xml, presentation_rels_xml, presentation_xml, slide_rels_xml,
    CONTENT_LAYOUT_XML, LAYOUT_RELS_XML, MASTER_RELS_XML, ROOT_RELS_XML, SLIDE_MASTER_XML,
    THEME_XML, TITLE_LAYOUT_XML, XML_HEADER,
};
use aitools_core::config::{MAX_SLIDES, PPT_FONT};
use aitools_core::{Error, Result, SlideRecord};
use chrono::{NaiveDate, SecondsFormat, Utc};
use quick_xml::escape::escape;
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// MIME type of a generated deck.
pub const PPTX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// 13.333" x 7.5" widescreen, in EMU.
const SLIDE_WIDTH: i64 = 12_192_000;
const SLIDE_HEIGHT: i64 = 6_858_000;

/// Bullet font size in hundredths of a point (18 pt).
const BULLET_FONT_SIZE: u32 = 1800;

/// Bullet text color (black).
const BULLET_COLOR: &str = "000000";

const TITLE_LAYOUT: usize = 1;
const CONTENT_LAYOUT: usize = 2;

/// Subtitle placed on the title slide: "Generated on 05 March 2025".
pub fn generated_on_subtitle(date: NaiveDate) -> String {
    format!("Generated on {}", date.format("%d %B %Y"))
}

/// File name offered for download: spaces become underscores.
pub fn download_file_name(title: &str) -> String {
    format!("{}.pptx", title.replace(' ', "_"))
}

/// Assembles a title slide followed by one content slide per record.
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    title: String,
    subtitle: String,
    slides: Vec<SlideRecord>,
    font: String,
    max_slides: usize,
}

impl DeckBuilder {
    /// Start a deck whose title slide shows `title` and today's date.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: generated_on_subtitle(chrono::Local::now().date_naive()),
            slides: Vec::new(),
            font: PPT_FONT.to_string(),
            max_slides: MAX_SLIDES,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Cap on content slides; extra records are dropped with a warning.
    pub fn with_max_slides(mut self, max: usize) -> Self {
        self.max_slides = max;
        self
    }

    pub fn add_slide(&mut self, record: SlideRecord) {
        self.slides.push(record);
    }

    pub fn add_slides(&mut self, records: impl IntoIterator<Item = SlideRecord>) {
        self.slides.extend(records);
    }

    /// Records that will be rendered, after the slide cap.
    pub fn content_slides(&self) -> &[SlideRecord] {
        &self.slides[..self.slides.len().min(self.max_slides)]
    }

    /// Total slides in the output, including the title slide.
    pub fn slide_count(&self) -> usize {
        1 + self.content_slides().len()
    }

    /// Render the deck into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Render the deck as a ZIP package into `writer`.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        if self.slides.len() > self.max_slides {
            log::warn!(
                "Dropping {} slides beyond the limit of {}",
                self.slides.len() - self.max_slides,
                self.max_slides
            );
        }

        let slide_count = self.slide_count();
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut put = |name: &str, content: &str| -> Result<()> {
            zip.start_file(name, options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
            zip.write_all(content.as_bytes())?;
            Ok(())
        };

        put("[Content_Types].xml", &content_types_xml(slide_count))?;
        put("_rels/.rels", ROOT_RELS_XML)?;
        put("docProps/core.xml", &self.core_properties_xml())?;
        put("ppt/presentation.xml", &presentation_xml(slide_count, SLIDE_WIDTH, SLIDE_HEIGHT))?;
        put("ppt/_rels/presentation.xml.rels", &presentation_rels_xml(slide_count))?;
        put("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML)?;
        put("ppt/slideMasters/_rels/slideMaster1.xml.rels", MASTER_RELS_XML)?;
        put("ppt/slideLayouts/slideLayout1.xml", TITLE_LAYOUT_XML)?;
        put("ppt/slideLayouts/_rels/slideLayout1.xml.rels", LAYOUT_RELS_XML)?;
        put("ppt/slideLayouts/slideLayout2.xml", CONTENT_LAYOUT_XML)?;
        put("ppt/slideLayouts/_rels/slideLayout2.xml.rels", LAYOUT_RELS_XML)?;
        put("ppt/theme/theme1.xml", THEME_XML)?;

        put("ppt/slides/slide1.xml", &self.title_slide_xml())?;
        put("ppt/slides/_rels/slide1.xml.rels", &slide_rels_xml(TITLE_LAYOUT))?;

        for (i, record) in self.content_slides().iter().enumerate() {
            let number = i + 2;
            put(&format!("ppt/slides/slide{}.xml", number), &self.content_slide_xml(record))?;
            put(
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &slide_rels_xml(CONTENT_LAYOUT),
            )?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;

        log::info!("Rendered deck '{}' with {} slides", self.title, slide_count);
        Ok(())
    }

    fn core_properties_xml(&self) -> String {
        let created = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        format!(
            concat!(
                "{}",
                r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
                r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                "<dc:title>{}</dc:title>",
                r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
                "</cp:coreProperties>"
            ),
            XML_HEADER,
            escape(self.title.as_str()),
            created
        )
    }

    fn title_slide_xml(&self) -> String {
        let mut shapes = String::new();
        push_placeholder(&mut shapes, 2, "Title 1", r#"<p:ph type="ctrTitle"/>"#, &plain_paragraph(&self.title));
        push_placeholder(
            &mut shapes,
            3,
            "Subtitle 2",
            r#"<p:ph type="subTitle" idx="1"/>"#,
            &plain_paragraph(&self.subtitle),
        );
        slide_xml(&shapes)
    }

    fn content_slide_xml(&self, record: &SlideRecord) -> String {
        let body = if record.bullets.is_empty() {
            r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#.to_string()
        } else {
            record
                .bullets
                .iter()
                .map(|bullet| self.bullet_paragraph(bullet))
                .collect()
        };

        let mut shapes = String::new();
        push_placeholder(&mut shapes, 2, "Title 1", r#"<p:ph type="title"/>"#, &plain_paragraph(&record.title));
        push_placeholder(&mut shapes, 3, "Content Placeholder 2", r#"<p:ph idx="1"/>"#, &body);
        slide_xml(&shapes)
    }

    /// Left-aligned 18 pt black paragraph in the deck font.
    fn bullet_paragraph(&self, text: &str) -> String {
        format!(
            r#"<a:p><a:pPr algn="l"/><a:r><a:rPr lang="en-US" sz="{}" dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{}"/></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
            BULLET_FONT_SIZE,
            BULLET_COLOR,
            escape(self.font.as_str()),
            escape(text)
        )
    }
}

fn plain_paragraph(text: &str) -> String {
    format!(
        r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
        escape(text)
    )
}

/// Append a placeholder shape; position and size come from the layout.
fn push_placeholder(xml: &mut String, id: u32, name: &str, ph: &str, paragraphs: &str) {
    xml.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>"#,
        id, name, ph, paragraphs
    ));
}

fn slide_xml(shapes: &str) -> String {
    format!(
        concat!(
            "{}",
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
            r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
            "<p:cSld><p:spTree>",
            r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
            r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
            "{}",
            "</p:spTree></p:cSld>",
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>",
            "</p:sld>"
        ),
        XML_HEADER, shapes
    )
}
