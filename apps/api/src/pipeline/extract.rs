//! Text extraction from uploaded source documents.

use std::path::Path;

use crate::docx::DocxFile;
use crate::errors::AppError;

/// Source formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Docx,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<SourceFormat> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("pdf") {
            Some(SourceFormat::Pdf)
        } else if ext.eq_ignore_ascii_case("docx") {
            Some(SourceFormat::Docx)
        } else {
            None
        }
    }
}

/// Extracts the plain text of the document at `path`, with source line and
/// paragraph boundaries preserved as `\n`.
///
/// PDFs are flattened page-by-page into one stream with whatever line
/// structure the extraction codec produces; DOCX yields exactly one line per
/// body paragraph. An unrecognized extension fails with
/// [`AppError::UnsupportedFormat`] before anything is read.
pub fn extract_text(path: &Path) -> Result<String, AppError> {
    let format = SourceFormat::from_path(path).ok_or(AppError::UnsupportedFormat)?;
    match format {
        SourceFormat::Pdf => pdf_extract::extract_text(path)
            .map_err(|e| AppError::Extraction(format!("PDF text extraction failed: {e}"))),
        SourceFormat::Docx => Ok(DocxFile::open(path)?.body_text()),
    }
}
