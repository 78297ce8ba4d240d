//! Minimal DOCX codec: reads the body paragraph/run structure the pipeline
//! consumes, and rewrites run text in place (see `rewrite`).
//!
//! DOCX parsing is done directly on the ZIP container and
//! `word/document.xml`. The available docx crates are writer-oriented, and
//! the formatter must leave every byte it does not touch exactly as the
//! template author saved it.

mod rewrite;

#[cfg(test)]
pub(crate) mod fixtures;

use std::io::{Cursor, Read};
use std::ops::Range;
use std::path::Path;

use thiserror::Error;
use zip::ZipArchive;

pub use rewrite::RunEdit;

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a valid docx container: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("missing part: {0}")]
    MissingPart(&'static str),

    #[error("malformed word/document.xml: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("edit addresses paragraph {paragraph} run {run}, which has no replaceable text")]
    InvalidEdit { paragraph: usize, run: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single text run. `text` is the concatenated visible content; the byte
/// spans locate each `w:t` character-data region inside the document XML so
/// replacements can be spliced without touching anything else.
#[derive(Debug, Clone)]
pub struct Run {
    pub text: String,
    text_spans: Vec<Range<usize>>,
}

#[derive(Debug, Clone)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Full visible text of the paragraph, runs concatenated in order.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A parsed DOCX file. Holds the original container bytes alongside the
/// parsed body so edits can be re-serialized with full fidelity.
#[derive(Debug)]
pub struct DocxFile {
    archive: Vec<u8>,
    document_xml: String,
    paragraphs: Vec<Paragraph>,
}

impl DocxFile {
    pub fn open(path: &Path) -> Result<Self, DocxError> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DocxError> {
        let mut zip = ZipArchive::new(Cursor::new(bytes.as_slice()))?;
        let document_xml = read_zip_text(&mut zip, DOCUMENT_PART)?
            .ok_or(DocxError::MissingPart(DOCUMENT_PART))?;
        drop(zip);

        let xml = roxmltree::Document::parse(&document_xml)?;
        let paragraphs = parse_body(&xml);

        Ok(Self {
            archive: bytes,
            document_xml,
            paragraphs,
        })
    }

    /// Body paragraphs in document order. Tables, headers, and footers are
    /// not included; the formatter operates on body paragraphs only.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Plain text of the document: one line per body paragraph, joined by
    /// `\n`. A paragraph with no text contributes an empty line.
    pub fn body_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn archive_bytes(&self) -> &[u8] {
        &self.archive
    }

    pub(crate) fn document_xml(&self) -> &str {
        &self.document_xml
    }
}

fn read_zip_text(
    zip: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<String>, DocxError> {
    let mut entry = match zip.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut text = String::new();
    entry.read_to_string(&mut text)?;
    Ok(Some(text))
}

/// True if `node` is a WordprocessingML element with the given local name.
fn wml(node: roxmltree::Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}

fn parse_body(xml: &roxmltree::Document) -> Vec<Paragraph> {
    let Some(body) = xml.root_element().children().find(|n| wml(*n, "body")) else {
        return Vec::new();
    };
    body.children()
        .filter(|n| wml(*n, "p"))
        .map(parse_paragraph)
        .collect()
}

fn parse_paragraph(node: roxmltree::Node) -> Paragraph {
    let mut runs = Vec::new();
    collect_runs(node, &mut runs);
    Paragraph { runs }
}

/// Collects `w:r` elements in document order, descending into wrappers such
/// as `w:hyperlink` but not into paragraph properties.
fn collect_runs(parent: roxmltree::Node, runs: &mut Vec<Run>) {
    for child in parent.children() {
        if wml(child, "r") {
            runs.push(parse_run(child));
        } else if child.is_element() && !wml(child, "pPr") {
            collect_runs(child, runs);
        }
    }
}

fn parse_run(node: roxmltree::Node) -> Run {
    let mut text = String::new();
    let mut text_spans = Vec::new();
    for child in node.children() {
        if wml(child, "t") {
            for data in child.children().filter(|n| n.is_text()) {
                text.push_str(data.text().unwrap_or_default());
                text_spans.push(data.range());
            }
        } else if wml(child, "tab") {
            text.push('\t');
        } else if wml(child, "br") || wml(child, "cr") {
            text.push('\n');
        }
    }
    Run { text, text_spans }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{docx_bytes, plain_paragraph};
    use super::*;

    #[test]
    fn test_parses_body_paragraphs_in_order() {
        let body = format!(
            "{}{}{}",
            plain_paragraph("EDUCATION"),
            plain_paragraph("State University"),
            plain_paragraph("Acme Corp")
        );
        let doc = DocxFile::from_bytes(docx_bytes(&body)).unwrap();
        assert_eq!(doc.paragraphs().len(), 3);
        assert_eq!(doc.paragraphs()[0].text(), "EDUCATION");
        assert_eq!(doc.paragraphs()[2].text(), "Acme Corp");
    }

    #[test]
    fn test_empty_paragraph_yields_empty_line() {
        let body = format!("{}<w:p/>{}", plain_paragraph("a"), plain_paragraph("b"));
        let doc = DocxFile::from_bytes(docx_bytes(&body)).unwrap();
        assert_eq!(doc.body_text(), "a\n\nb");
    }

    #[test]
    fn test_run_text_concatenates_split_runs() {
        let body = "<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>World</w:t></w:r></w:p>";
        let doc = DocxFile::from_bytes(docx_bytes(body)).unwrap();
        let para = &doc.paragraphs()[0];
        assert_eq!(para.runs.len(), 2);
        assert_eq!(para.text(), "Hello World");
    }

    #[test]
    fn test_tabs_and_breaks_become_whitespace() {
        let body = "<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>";
        let doc = DocxFile::from_bytes(docx_bytes(body)).unwrap();
        assert_eq!(doc.paragraphs()[0].text(), "a\tb\nc");
    }

    #[test]
    fn test_runs_inside_hyperlink_are_collected() {
        let body = "<w:p><w:hyperlink><w:r><w:t>linked</w:t></w:r></w:hyperlink></w:p>";
        let doc = DocxFile::from_bytes(docx_bytes(body)).unwrap();
        assert_eq!(doc.paragraphs()[0].text(), "linked");
    }

    #[test]
    fn test_entities_are_resolved_in_text() {
        let body = "<w:p><w:r><w:t>SKILLS, ACTIVITIES &amp; INTERESTS</w:t></w:r></w:p>";
        let doc = DocxFile::from_bytes(docx_bytes(body)).unwrap();
        assert_eq!(doc.paragraphs()[0].text(), "SKILLS, ACTIVITIES & INTERESTS");
    }

    #[test]
    fn test_missing_document_part_is_an_error() {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("word/other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut writer, b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert!(matches!(
            DocxFile::from_bytes(bytes),
            Err(DocxError::MissingPart(_))
        ));
    }

    #[test]
    fn test_garbage_bytes_are_an_archive_error() {
        assert!(matches!(
            DocxFile::from_bytes(b"not a zip".to_vec()),
            Err(DocxError::Archive(_))
        ));
    }
}
