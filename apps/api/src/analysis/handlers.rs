//! Axum route handlers for the Analysis API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Local;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::extract::looks_like_pdf;
use crate::analysis::models::Analysis;
use crate::analysis::pipeline::analyze_document;
use crate::analysis::AnalysisError;
use crate::config::Config;
use crate::errors::AppError;
use crate::report::view::{build_view, AnalysisView};
use crate::report::{export_report, json_export, ReportFile};
use crate::state::AppState;

const MISSING_JD: &str = "Please provide a job description.";
const MISSING_PDF: &str = "Please upload your resume in PDF format.";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub detailed: bool,
}

/// Fields of the multipart analysis request.
#[derive(Debug, Default)]
struct AnalysisForm {
    job_description: String,
    resume: Option<Bytes>,
    resume_name: Option<String>,
    session_id: Option<Uuid>,
    detailed: bool,
}

impl AnalysisForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = AnalysisForm::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            match field.name() {
                Some("job_description") => {
                    form.job_description = field.text().await.map_err(bad_multipart)?;
                }
                Some("resume") => {
                    form.resume_name = field.file_name().map(str::to_string);
                    form.resume = Some(field.bytes().await.map_err(bad_multipart)?);
                }
                Some("session_id") => {
                    let raw = field.text().await.map_err(bad_multipart)?;
                    let id = raw.trim().parse().map_err(|_| {
                        AppError::invalid_input(format!("session_id is not a valid UUID: '{raw}'"))
                    })?;
                    form.session_id = Some(id);
                }
                Some("detailed") => {
                    let raw = field.text().await.map_err(bad_multipart)?;
                    form.detailed = matches!(raw.trim(), "true" | "1" | "on" | "yes");
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Checks the inputs in the order a user would fix them: JD, then resume.
    fn validated(&mut self) -> Result<Bytes, AppError> {
        if self.job_description.trim().is_empty() {
            return Err(AppError::invalid_input(MISSING_JD));
        }
        match self.resume.take() {
            Some(bytes) if !bytes.is_empty() && looks_like_pdf(&bytes) => Ok(bytes),
            _ => Err(AppError::invalid_input(MISSING_PDF)),
        }
    }
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::invalid_input(format!("Invalid multipart request: {}", e.body_text()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyses
///
/// Runs the full analysis over an uploaded resume PDF and a job description,
/// stores the result as the session's current analysis and returns its view.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisView>, AppError> {
    let model = state
        .model
        .clone()
        .ok_or_else(|| AnalysisError::Configuration(Config::missing_key_message()))?;

    let mut form = AnalysisForm::read(multipart).await?;
    let document = form.validated()?;
    let session_id = form.session_id.unwrap_or_else(Uuid::new_v4);

    info!(
        "Analyzing resume {:?} ({} bytes) for session {session_id}",
        form.resume_name.as_deref().unwrap_or("<unnamed>"),
        document.len()
    );

    let guard = state.sessions.begin(session_id)?;
    let analysis = analyze_document(model.as_ref(), document, &form.job_description).await?;
    let analysis = guard.complete(analysis);

    Ok(Json(build_view(session_id, &analysis, form.detailed)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<AnalysisView>, AppError> {
    let analysis = current_analysis(&state, session_id)?;
    Ok(Json(build_view(session_id, &analysis, query.detailed)))
}

/// DELETE /api/v1/sessions/:id
///
/// Starts over: the session's current result is discarded.
pub async fn handle_clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> StatusCode {
    if state.sessions.clear(session_id) {
        info!("Cleared session {session_id}");
    }
    StatusCode::NO_CONTENT
}

/// GET /api/v1/sessions/:id/report
///
/// PDF download of the current analysis. If rendering fails the validated
/// result is served as a JSON file instead.
pub async fn handle_report(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let analysis = current_analysis(&state, session_id)?;
    let generated_at = Local::now().naive_local();

    let rendering = Arc::clone(&analysis);
    let file = match tokio::task::spawn_blocking(move || export_report(&rendering, generated_at))
        .await
    {
        Ok(result) => result.map_err(anyhow::Error::from)?,
        Err(e) => {
            warn!("Report rendering task failed for session {session_id}: {e}");
            json_export(&analysis.raw).map_err(anyhow::Error::from)?
        }
    };

    Ok(attachment(file))
}

/// GET /api/v1/sessions/:id/report.json
pub async fn handle_report_json(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let analysis = current_analysis(&state, session_id)?;
    let file = json_export(&analysis.raw).map_err(anyhow::Error::from)?;
    Ok(attachment(file))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// The session's current analysis. A session still processing its first
/// analysis reports `Busy` rather than `NotFound`.
fn current_analysis(state: &AppState, session_id: Uuid) -> Result<Arc<Analysis>, AppError> {
    match state.sessions.current(session_id) {
        Some(analysis) => Ok(analysis),
        None if state.sessions.is_processing(session_id) => Err(AppError::Busy),
        None => Err(AppError::NotFound(format!(
            "No analysis for session {session_id}"
        ))),
    }
}

fn attachment(file: ReportFile) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file.filename);
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::action_plan::derive_action_plan;
    use crate::analysis::models::fixtures::sample_result;
    use crate::analysis::models::AnalysisResult;
    use crate::llm_client::mock::MockModelClient;
    use crate::llm_client::ModelClient;
    use crate::report::document::Block;
    use crate::report::pdf::render_pdf;
    use crate::routes::build_router;
    use crate::session::SessionStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::Router;
    use chrono::Utc;
    use serde_json::Value;
    use tower::ServiceExt;

    const BOUNDARY: &str = "ats-test-boundary";

    fn test_config() -> Config {
        Config {
            google_api_key: Some("test-key".to_string()),
            gemini_model: "test-model".to_string(),
            llm_max_attempts: 1,
            llm_timeout_secs: 5,
            max_upload_bytes: 1024 * 1024,
            max_sessions: 100,
            session_ttl_secs: 3600,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    fn test_state(model: Option<Arc<dyn ModelClient>>) -> AppState {
        AppState {
            config: test_config(),
            model,
            sessions: SessionStore::default(),
        }
    }

    fn mock_state() -> (AppState, Arc<MockModelClient>) {
        let mock = Arc::new(MockModelClient::replying(sample_result().to_string()));
        let model: Arc<dyn ModelClient> = mock.clone();
        (test_state(Some(model)), mock)
    }

    fn seed(state: &AppState, session_id: Uuid) {
        let raw = sample_result();
        let guard = state.sessions.begin(session_id).unwrap();
        guard.complete(Analysis {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            result: AnalysisResult::from_value(&raw),
            action_plan: derive_action_plan(raw.clone()).unwrap(),
            raw,
        });
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_request(parts: &[Part]) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, filename, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/pdf\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/analyses")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>, Response<()>) {
        let response = app.oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = to_bytes(body, usize::MAX).await.unwrap().to_vec();
        (parts.status, bytes, Response::from_parts(parts, ()))
    }

    fn error_code(body: &[u8]) -> String {
        let json: Value = serde_json::from_slice(body).unwrap();
        json["error"]["code"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_analysis_blocked_without_api_key() {
        let app = build_router(test_state(None));
        let request = multipart_request(&[
            Part::Text("job_description", "Rust engineer"),
            Part::File("resume", "cv.pdf", b"%PDF-1.4"),
        ]);
        let (status, body, _) = send(app, request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error_code(&body), "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_empty_job_description_is_rejected_before_model() {
        let (state, mock) = mock_state();
        let request = multipart_request(&[
            Part::Text("job_description", "   "),
            Part::File("resume", "cv.pdf", b"%PDF-1.4"),
        ]);
        let (status, body, _) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["message"], MISSING_JD);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_resume_is_rejected() {
        let (state, _) = mock_state();
        let request = multipart_request(&[Part::Text("job_description", "Rust engineer")]);
        let (status, body, _) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["message"], MISSING_PDF);
    }

    #[tokio::test]
    async fn test_non_pdf_upload_is_rejected() {
        let (state, mock) = mock_state();
        let request = multipart_request(&[
            Part::Text("job_description", "Rust engineer"),
            Part::File("resume", "cv.docx", b"PK\x03\x04 not a pdf"),
        ]);
        let (status, body, _) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "INVALID_INPUT");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_session_id_is_rejected() {
        let (state, _) = mock_state();
        let request = multipart_request(&[
            Part::Text("job_description", "Rust engineer"),
            Part::Text("session_id", "not-a-uuid"),
            Part::File("resume", "cv.pdf", b"%PDF-1.4"),
        ]);
        let (status, _, _) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreadable_pdf_fails_and_releases_session() {
        let (state, mock) = mock_state();
        let session_id = Uuid::new_v4();
        let session = session_id.to_string();
        let request = multipart_request(&[
            Part::Text("job_description", "Rust engineer"),
            Part::Text("session_id", &session),
            Part::File("resume", "cv.pdf", b"%PDF-1.7\nthis is not really a pdf"),
        ]);
        let (status, body, _) = send(build_router(state.clone()), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&body), "EXTRACTION_ERROR");
        assert_eq!(mock.call_count(), 0);
        assert!(!state.sessions.is_processing(session_id));
        assert!(state.sessions.current(session_id).is_none());
    }

    #[tokio::test]
    async fn test_successful_analysis_is_stored_and_downloadable() {
        let (state, mock) = mock_state();
        let app = build_router(state.clone());
        let resume = render_pdf(&[Block::Paragraph(
            "Jane Doe. Senior Rust engineer with five years of backend experience.".into(),
        )])
        .unwrap();

        let session_id = Uuid::new_v4();
        let session = session_id.to_string();
        let request = multipart_request(&[
            Part::Text("job_description", "Backend engineer: Rust, Kubernetes, Kafka"),
            Part::Text("session_id", &session),
            Part::File("resume", "cv.pdf", &resume),
        ]);
        let (status, body, _) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        let view: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(view["session_id"], session);
        assert_eq!(view["scores"][0]["display"], "72%");
        assert_eq!(view["scores"][1]["display"], "82%");
        assert_eq!(mock.call_count(), 1);

        assert!(!state.sessions.is_processing(session_id));
        assert!(state.sessions.current(session_id).is_some());

        let uri = format!("/api/v1/sessions/{session_id}");
        let (status, body, _) = send(app.clone(), get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        let stored: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(stored["analysis_id"], view["analysis_id"]);

        let (status, body, _) = send(app, get(&format!("{uri}/report"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_busy_session_rejects_second_analysis() {
        let (state, mock) = mock_state();
        let session_id = Uuid::new_v4();
        let _guard = state.sessions.begin(session_id).unwrap();

        let session = session_id.to_string();
        let request = multipart_request(&[
            Part::Text("job_description", "Rust engineer"),
            Part::Text("session_id", &session),
            Part::File("resume", "cv.pdf", b"%PDF-1.4"),
        ]);
        let (status, body, _) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_code(&body), "ANALYSIS_IN_PROGRESS");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_session_is_not_found() {
        let (state, _) = mock_state();
        let uri = format!("/api/v1/sessions/{}", Uuid::new_v4());
        let (status, body, _) = send(build_router(state), get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_session_while_processing_is_busy() {
        let (state, _) = mock_state();
        let session_id = Uuid::new_v4();
        let _guard = state.sessions.begin(session_id).unwrap();

        let uri = format!("/api/v1/sessions/{session_id}");
        let (status, _, _) = send(build_router(state), get(&uri)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_get_session_toggles_details() {
        let (state, _) = mock_state();
        let session_id = Uuid::new_v4();
        seed(&state, session_id);
        let app = build_router(state);

        let uri = format!("/api/v1/sessions/{session_id}");
        let (status, body, _) = send(app.clone(), get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        let view: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(view["session_id"], session_id.to_string());
        assert_eq!(view["scores"][1]["display"], "82%");
        assert!(view.get("details").is_none());

        let (_, body, _) = send(app, get(&format!("{uri}?detailed=true"))).await;
        let view: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(view["details"]["missing_keywords"][0], "Kubernetes");
    }

    #[tokio::test]
    async fn test_delete_session_starts_over() {
        let (state, _) = mock_state();
        let session_id = Uuid::new_v4();
        seed(&state, session_id);
        let app = build_router(state.clone());

        let uri = format!("/api/v1/sessions/{session_id}");
        let delete = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(app.clone(), delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.sessions.current(session_id).is_none());

        let (status, _, _) = send(app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_report_downloads_as_pdf() {
        let (state, _) = mock_state();
        let session_id = Uuid::new_v4();
        seed(&state, session_id);

        let uri = format!("/api/v1/sessions/{session_id}/report");
        let (status, body, response) = send(build_router(state), get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment; filename=\"ATS_Analysis_Report_"));
        assert!(disposition.ends_with(".pdf\""));
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_report_json_export() {
        let (state, _) = mock_state();
        let session_id = Uuid::new_v4();
        seed(&state, session_id);

        let uri = format!("/api/v1/sessions/{session_id}/report.json");
        let (status, body, response) = send(build_router(state), get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"ats_analysis.json\""
        );
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, sample_result());
    }

    #[tokio::test]
    async fn test_report_for_unknown_session_is_not_found() {
        let (state, _) = mock_state();
        let uri = format!("/api/v1/sessions/{}/report", Uuid::new_v4());
        let (status, _, _) = send(build_router(state), get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
