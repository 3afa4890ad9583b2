//! Fixed parts of a new presentation package.
//!
//! The master, the two layouts and the theme are static resources; the
//! remaining package parts depend on the slide count and are generated.

use std::fmt::Write as FmtWrite;

pub(crate) const SLIDE_MASTER_XML: &str = include_str!("../resources/slideMasters/slideMaster1.xml");

/// Layout 1: "Title Slide" (centered title and subtitle).
pub(crate) const TITLE_LAYOUT_XML: &str = include_str!("../resources/slideLayouts/slideLayout1.xml");

/// Layout 2: "Title and Content" (title and bulleted body).
pub(crate) const CONTENT_LAYOUT_XML: &str =
    include_str!("../resources/slideLayouts/slideLayout2.xml");

pub(crate) const THEME_XML: &str = include_str!("../resources/theme/theme1.xml");

pub(crate) const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(crate) const MASTER_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout2.xml"/>"#,
    r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>"#,
    r#"</Relationships>"#
);

pub(crate) const LAYOUT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>"#,
    r#"</Relationships>"#
);

pub(crate) const ROOT_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"</Relationships>"#
);

/// Relationship ids 1 and 2 of presentation.xml belong to the master and theme.
pub(crate) const FIRST_SLIDE_REL_ID: usize = 3;

/// Slide ids start at 256 as PowerPoint expects.
pub(crate) const FIRST_SLIDE_ID: usize = 256;

/// `[Content_Types].xml` for a deck with `slide_count` slides.
pub(crate) fn content_types_xml(slide_count: usize) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_HEADER);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    for layout in 1..=2 {
        let _ = write!(
            xml,
            r#"<Override PartName="/ppt/slideLayouts/slideLayout{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#,
            layout
        );
    }
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            n
        );
    }
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str("</Types>");
    xml
}

/// `ppt/_rels/presentation.xml.rels` for `slide_count` slides.
pub(crate) fn presentation_rels_xml(slide_count: usize) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_HEADER);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, REL_NS);
    let _ = write!(
        xml,
        r#"<Relationship Id="rId1" Type="{}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
        REL_TYPE_BASE
    );
    let _ = write!(
        xml,
        r#"<Relationship Id="rId2" Type="{}/theme" Target="theme/theme1.xml"/>"#,
        REL_TYPE_BASE
    );
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{}/slide" Target="slides/slide{}.xml"/>"#,
            n + FIRST_SLIDE_REL_ID - 1,
            REL_TYPE_BASE,
            n
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// `ppt/presentation.xml` with the given slide size in EMUs.
pub(crate) fn presentation_xml(slide_count: usize, width: i64, height: i64) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_HEADER);
    xml.push_str(r#"<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1">"#);
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for i in 0..slide_count {
            let _ = write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                FIRST_SLIDE_ID + i,
                FIRST_SLIDE_REL_ID + i
            );
        }
        xml.push_str("</p:sldIdLst>");
    }
    let _ = write!(xml, r#"<p:sldSz cx="{}" cy="{}"/>"#, width, height);
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

/// Relationship part of a slide using layout `layout` (1 or 2).
pub(crate) fn slide_rels_xml(layout: usize) -> String {
    format!(
        r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/slideLayout" Target="../slideLayouts/slideLayout{}.xml"/></Relationships>"#,
        XML_HEADER, REL_NS, REL_TYPE_BASE, layout
    )
}
