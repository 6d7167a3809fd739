// POST /compare: evaluate a generated README against an uploaded one.
//
// Multipart fields:
//   generated_readme : text field
//   user_readme_file : file upload, must be UTF-8
//
// Returns 200 with the five-section report. Degraded analyzers are part of a
// 200 response; only a bad upload (400) or a fatal pipeline error (500) fails
// the request.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::pipeline::DocumentPair;
use crate::web::{api_error, AppState};

const GENERATED_FIELD: &str = "generated_readme";
const USER_FILE_FIELD: &str = "user_readme_file";
const INVALID_UPLOAD: &str = "Invalid file upload.";

/// POST /compare: run the evaluation pipeline.
pub async fn compare_readmes(State(state): State<AppState>, multipart: Multipart) -> Response {
    let pair = match read_pair(multipart).await {
        Ok(pair) => pair,
        Err(message) => {
            warn!(reason = %message, "Rejected compare request");
            return api_error(StatusCode::BAD_REQUEST, &message);
        }
    };

    match state.pipeline.evaluate(pair).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Evaluation failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Evaluation failed: {e}"),
            )
        }
    }
}

/// Pull both documents out of the form. The error is the 400 message.
async fn read_pair(mut multipart: Multipart) -> Result<DocumentPair, String> {
    let mut generated: Option<String> = None;
    let mut reference: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Malformed form data: {e}"))?
    {
        match field.name() {
            Some(GENERATED_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| format!("Unreadable {GENERATED_FIELD} field: {e}"))?;
                generated = Some(text);
            }
            Some(USER_FILE_FIELD) => {
                let bytes = field.bytes().await.map_err(|_| INVALID_UPLOAD.to_string())?;
                let text = String::from_utf8(bytes.to_vec()).map_err(|_| INVALID_UPLOAD.to_string())?;
                reference = Some(text);
            }
            // Unknown fields are ignored
            _ => {}
        }
    }

    let generated = generated.ok_or_else(|| format!("Missing form field: {GENERATED_FIELD}"))?;
    let reference = reference.ok_or_else(|| format!("Missing form field: {USER_FILE_FIELD}"))?;
    Ok(DocumentPair::new(generated, reference))
}
