//! Run-text rewriting. Replacement text is spliced into the recorded `w:t`
//! character-data spans of `word/document.xml`, then the container is
//! repacked with every other entry copied byte-for-byte.

use std::io::{Cursor, Read, Write};
use std::ops::Range;

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use super::{DocxError, DocxFile, DOCUMENT_PART};

/// One text substitution: replace the text of run `run` in body paragraph
/// `paragraph` with `text`, leaving the run's formatting untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunEdit {
    pub paragraph: usize,
    pub run: usize,
    pub text: String,
}

impl DocxFile {
    /// Applies the edits and serializes the resulting document. The input
    /// file is not modified; all structure, styling, and untouched parts
    /// survive byte-for-byte.
    pub fn render(&self, edits: &[RunEdit]) -> Result<Vec<u8>, DocxError> {
        let mut splices: Vec<(Range<usize>, String)> = Vec::new();
        for edit in edits {
            let run = self
                .paragraphs()
                .get(edit.paragraph)
                .and_then(|p| p.runs.get(edit.run))
                .ok_or(DocxError::InvalidEdit {
                    paragraph: edit.paragraph,
                    run: edit.run,
                })?;
            let Some((first, rest)) = run.text_spans.split_first() else {
                return Err(DocxError::InvalidEdit {
                    paragraph: edit.paragraph,
                    run: edit.run,
                });
            };
            // The new text lands in the run's first w:t; any further w:t
            // regions in the same run are emptied.
            splices.push((first.clone(), xml_escape_text(&edit.text)));
            for span in rest {
                splices.push((span.clone(), String::new()));
            }
        }

        // Apply back-to-front so earlier spans stay valid.
        splices.sort_by(|a, b| b.0.start.cmp(&a.0.start));
        let mut xml = self.document_xml().to_string();
        for (span, replacement) in splices {
            xml.replace_range(span, &replacement);
        }

        repack(self.archive_bytes(), &xml)
    }
}

/// Copies every entry of the original container into a new one, substituting
/// the rewritten `word/document.xml` and keeping each entry's compression
/// method.
fn repack(original: &[u8], document_xml: &str) -> Result<Vec<u8>, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(original))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let options = SimpleFileOptions::default().compression_method(entry.compression());
        writer.start_file(name.as_str(), options)?;
        if name == DOCUMENT_PART {
            writer.write_all(document_xml.as_bytes())?;
        } else {
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents)?;
            writer.write_all(&contents)?;
        }
    }

    Ok(writer.finish()?.into_inner())
}

fn xml_escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
