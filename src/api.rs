// Appeals Desk - HTTP API
// JSON view of the same `Dashboard` the terminal UI drives

use crate::claims::{AgeBand, Claim, StatusBadge};
use crate::dashboard::{Dashboard, Notification};
use crate::documents::{DocumentCategory, DocumentLibrary, FileDescriptor};
use crate::error::AppealsError;
use crate::verification::ChecklistOutcome;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard>>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
        }
    }

    /// Lock the dashboard and bring its timers up to date
    fn dashboard(&self) -> MutexGuard<'_, Dashboard> {
        let mut guard = self.dashboard.lock().unwrap_or_else(|e| e.into_inner());
        guard.tick();
        guard
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: String) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message),
        }
    }
}

fn error_response(err: AppealsError) -> Response {
    let status = match &err {
        AppealsError::ClaimNotFound(_) => StatusCode::NOT_FOUND,
        AppealsError::NoActiveVerification | AppealsError::NoAppealDraft(_) => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!(%err, status = status.as_u16(), "Request failed");
    (status, Json(ApiResponse::err(err.to_string()))).into_response()
}

/// Malformed or mistyped request bodies
fn bad_request(rejection: JsonRejection) -> Response {
    let message = rejection.body_text();
    tracing::warn!(%message, "Rejected request body");
    (StatusCode::BAD_REQUEST, Json(ApiResponse::err(message))).into_response()
}

// ============================================================================
// Response shapes
// ============================================================================

#[derive(Serialize)]
struct ClaimResponse {
    #[serde(flatten)]
    claim: Claim,
    badge: StatusBadge,
    age_band: AgeBand,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        Self {
            badge: claim.badge(),
            age_band: claim.age_band(),
            claim,
        }
    }
}

#[derive(Serialize)]
struct VerificationResponse {
    open: bool,
    claim: Option<Claim>,
    progress: u8,
    outcome: Option<ChecklistOutcome>,
    /// Current appeal text, present once an invalid rejection is shown
    draft: Option<String>,
    sending: bool,
}

impl VerificationResponse {
    fn from_dashboard(dashboard: &Dashboard) -> Self {
        let verification = dashboard.verification();
        Self {
            open: dashboard.is_modal_open(),
            claim: verification.claim().cloned(),
            progress: verification.progress(),
            outcome: verification.outcome().cloned(),
            draft: verification
                .appeal_visible()
                .then(|| verification.draft().to_string()),
            sending: verification.is_sending(),
        }
    }
}

#[derive(Serialize)]
struct CsvUploadResponse {
    accepted: Option<String>,
}

#[derive(Serialize)]
struct DocumentUploadResponse {
    accepted: Vec<DocumentCategory>,
    dropped: usize,
}

#[derive(Serialize)]
struct SendResponse {
    queued: bool,
}

#[derive(Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/claims - Claims table with badge and age colours
async fn get_claims(State(state): State<AppState>) -> impl IntoResponse {
    let dashboard = state.dashboard();
    let claims: Vec<ClaimResponse> = dashboard
        .claims()
        .iter()
        .cloned()
        .map(ClaimResponse::from)
        .collect();
    Json(ApiResponse::ok(claims))
}

/// POST /api/claims/sample - Load the sample denials
async fn generate_samples(State(state): State<AppState>) -> impl IntoResponse {
    let mut dashboard = state.dashboard();
    dashboard.generate_sample_denials();
    Json(ApiResponse::ok(dashboard.claims().len()))
}

/// POST /api/claims/:id/verify - Open the modal and start verification
async fn verify_claim(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut dashboard = state.dashboard();
    match dashboard.claim_clicked(&id) {
        Ok(()) => Json(ApiResponse::ok(VerificationResponse::from_dashboard(&dashboard)))
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/uploads/csv - Offer a batch to the CSV zone
async fn upload_csv(
    State(state): State<AppState>,
    body: Result<Json<Vec<FileDescriptor>>, JsonRejection>,
) -> Response {
    let Json(files) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection),
    };
    let accepted = state.dashboard().upload_csv(&files);
    Json(ApiResponse::ok(CsvUploadResponse { accepted })).into_response()
}

/// POST /api/uploads/documents - Offer a batch to the document zone
async fn upload_documents(
    State(state): State<AppState>,
    body: Result<Json<Vec<FileDescriptor>>, JsonRejection>,
) -> Response {
    let Json(files) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection),
    };
    let accepted = state.dashboard().upload_documents(&files);
    let dropped = files.len() - accepted.len();
    Json(ApiResponse::ok(DocumentUploadResponse { accepted, dropped })).into_response()
}

/// GET /api/documents - Uploaded files by category
async fn get_documents(State(state): State<AppState>) -> impl IntoResponse {
    let documents: DocumentLibrary = state.dashboard().documents().clone();
    Json(ApiResponse::ok(documents))
}

/// GET /api/verification - Modal state
async fn get_verification(State(state): State<AppState>) -> impl IntoResponse {
    let dashboard = state.dashboard();
    Json(ApiResponse::ok(VerificationResponse::from_dashboard(&dashboard)))
}

/// PUT /api/verification/draft - Replace the appeal text
async fn put_draft(
    State(state): State<AppState>,
    body: Result<Json<DraftRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection),
    };
    let mut dashboard = state.dashboard();
    match dashboard.edit_draft(req.text) {
        Ok(()) => Json(ApiResponse::ok(VerificationResponse::from_dashboard(&dashboard)))
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/verification/send - Send the appeal after the simulated delay
async fn send_appeal(State(state): State<AppState>) -> Response {
    match state.dashboard().send_appeal() {
        Ok(queued) => Json(ApiResponse::ok(SendResponse { queued })).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/verification/close - Close the modal
async fn close_verification(State(state): State<AppState>) -> impl IntoResponse {
    let mut dashboard = state.dashboard();
    dashboard.close_modal();
    Json(ApiResponse::ok(VerificationResponse::from_dashboard(&dashboard)))
}

/// GET /api/notifications - Notifications, oldest first
async fn get_notifications(State(state): State<AppState>) -> impl IntoResponse {
    let notifications: Vec<Notification> = state.dashboard().notifications().cloned().collect();
    Json(ApiResponse::ok(notifications))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/claims", get(get_claims))
        .route("/claims/sample", post(generate_samples))
        .route("/claims/:id/verify", post(verify_claim))
        .route("/uploads/csv", post(upload_csv))
        .route("/uploads/documents", post(upload_documents))
        .route("/documents", get(get_documents))
        .route("/verification", get(get_verification))
        .route("/verification/draft", put(put_draft))
        .route("/verification/send", post(send_appeal))
        .route("/verification/close", post(close_verification))
        .route("/notifications", get(get_notifications))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Drive verification timers even when no request arrives
pub fn spawn_ticker(state: AppState, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            state.dashboard();
        }
    })
}
