use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{debug, info};
use uuid::Uuid;

use crate::docx::DocxFile;
use crate::errors::AppError;
use crate::pipeline::{extract, populate, sections};
use crate::state::AppState;
use crate::storage::{RequestWorkspace, OUTPUT_FILENAME};

const UPLOAD_FIELD: &str = "resume";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// POST /api/v1/resumes/format
///
/// Accepts a multipart upload with a single `resume` file field and responds
/// with the populated template as a downloadable attachment. Each request
/// works in its own scratch directory, removed when the handler returns.
pub async fn handle_format(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let request_id = Uuid::new_v4();

    let Some((filename, data)) = read_upload(&mut multipart).await? else {
        return Err(AppError::Validation(
            "No file uploaded or invalid file".to_string(),
        ));
    };
    info!(%request_id, %filename, size = data.len(), "processing resume upload");

    let workspace = RequestWorkspace::create(&state.config.upload_dir)?;
    let source_path = workspace.store_upload(&filename, &data)?;

    let text = extract::extract_text(&source_path)?;
    let section_map = sections::segment(&text);
    let counts: Vec<(&str, usize)> = section_map
        .iter()
        .map(|(section, lines)| (section.title(), lines.len()))
        .collect();
    debug!(%request_id, ?counts, "segmented upload");
    if section_map.is_empty() {
        debug!(%request_id, "no section headers recognized; template text will be returned unchanged");
    }

    let template = DocxFile::open(&state.config.template_path)
        .map_err(|e| AppError::Template(e.to_string()))?;
    let edits = populate::populate(&template, &section_map);
    debug!(%request_id, substitutions = edits.len(), "populated template");
    let output = template
        .render(&edits)
        .map_err(|e| AppError::Template(e.to_string()))?;

    std::fs::write(workspace.output_path(), &output)?;
    info!(%request_id, size = output.len(), "delivering formatted resume");

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{OUTPUT_FILENAME}\""),
            ),
        ],
        output,
    )
        .into_response())
}

/// Pulls the upload out of the multipart stream. Returns `None` when the
/// field is absent, has no filename, or carries no bytes; the caller turns
/// all of those into one validation error.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<(String, Bytes)>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            return Ok(None);
        };
        if filename.is_empty() {
            return Ok(None);
        }
        let data = field.bytes().await?;
        if data.is_empty() {
            return Ok(None);
        }
        return Ok(Some((filename, data)));
    }
    Ok(None)
}
