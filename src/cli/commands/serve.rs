//! HTTP API server for web clients.
//!
//! Provides REST endpoints for ingestion, document listing and chat.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::RegscoutError;
use crate::orchestrator::Orchestrator;
use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
///
/// `host` and `port` override the `server` settings.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Orchestrator::new(settings)?;
    let client_url = orchestrator.settings().server.client_url.clone();
    let app = router(orchestrator)?;

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Regscout API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    if let Some(origin) = &client_url {
        Output::kv("Allowed origin", origin);
    }
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Ingest", "POST /api/ingest");
    Output::kv("Documents", "GET  /api/documents");
    Output::kv("Chat (grounded)", "POST /api/chat");
    Output::kv("Chat (general)", "POST /api/general-chat");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router around `orchestrator`.
pub fn router(orchestrator: Orchestrator) -> crate::error::Result<Router> {
    let cors = cors_layer(orchestrator.settings().server.client_url.as_deref())?;
    let state = Arc::new(AppState { orchestrator });

    Ok(Router::new()
        .route("/health", get(health))
        .route("/api/ingest", post(ingest))
        .route("/api/documents", get(list_documents))
        .route("/api/chat", post(chat))
        .route("/api/general-chat", post(general_chat))
        .layer(cors)
        .with_state(state))
}

/// Allow the configured client origin with credentials, or any origin.
fn cors_layer(client_url: Option<&str>) -> crate::error::Result<CorsLayer> {
    match client_url {
        Some(url) => {
            let origin = HeaderValue::from_str(url.trim_end_matches('/')).map_err(|e| {
                RegscoutError::Config(format!("Invalid server.client_url '{}': {}", url, e))
            })?;
            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
        }
        None => Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)),
    }
}

// === Request/Response Types ===

#[derive(Debug, Deserialize)]
struct ChatRequest {
    question: String,
    /// Documents to restrict retrieval to. Absent means all documents.
    #[serde(default, rename = "selectedDocs")]
    selected_docs: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GeneralChatRequest {
    question: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: String,
    sources: Vec<String>,
}

#[derive(Debug, Serialize)]
struct IngestResponse {
    success: bool,
    documents: usize,
    chunks: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error returned by handlers, rendered as `{ "error": message }`.
struct ApiError(RegscoutError);

impl From<RegscoutError> for ApiError {
    fn from(e: RegscoutError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = error_status(&self.0);
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// HTTP status for a library error.
fn error_status(error: &RegscoutError) -> StatusCode {
    match error {
        RegscoutError::InvalidArgument(_) | RegscoutError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        RegscoutError::IndexNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn require_question(question: &str) -> Result<(), ApiError> {
    if question.trim().is_empty() {
        return Err(RegscoutError::InvalidArgument("question must not be empty".to_string()).into());
    }
    Ok(())
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ingest(State(state): State<Arc<AppState>>) -> Result<Json<IngestResponse>, ApiError> {
    let report = state.orchestrator.ingest(None).await?;
    info!("Ingested {} documents via API", report.documents);

    Ok(Json(IngestResponse {
        success: true,
        documents: report.documents,
        chunks: report.chunks,
    }))
}

async fn list_documents(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.orchestrator.list_documents()?))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    require_question(&req.question)?;

    let allowed: Option<HashSet<String>> = req.selected_docs.map(|docs| docs.into_iter().collect());
    let answer = state
        .orchestrator
        .rag_engine(None)
        .ask(&req.question, allowed.as_ref())
        .await?;

    Ok(Json(ChatResponse {
        response: answer.answer,
        sources: answer.sources.into_iter().collect(),
    }))
}

async fn general_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GeneralChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    require_question(&req.question)?;

    let answer = state.orchestrator.composer().answer_general(&req.question).await?;

    Ok(Json(ChatResponse {
        response: answer.answer,
        sources: Vec::new(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_scenario_docs, KeywordEmbedder, RecordingGenerator};
    use std::path::Path;

    fn test_state(root: &Path) -> Arc<AppState> {
        let docs = write_scenario_docs(root);
        let mut settings = Settings::default();
        settings.general.documents_dir = docs.to_string_lossy().to_string();
        settings.general.index_path = root.join("index.db").to_string_lossy().to_string();
        settings.retrieval.k = 1;

        let orchestrator = Orchestrator::with_components(
            settings,
            Arc::new(KeywordEmbedder::new()),
            Arc::new(RecordingGenerator::new("Grass is green.")),
        )
        .unwrap();

        Arc::new(AppState { orchestrator })
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&RegscoutError::InvalidArgument("k".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&RegscoutError::InvalidConfig("overlap".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&RegscoutError::IndexNotFound("x.db".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&RegscoutError::EmbeddingService("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_chat_request_selected_docs() {
        let absent: ChatRequest = serde_json::from_str(r#"{"question":"q"}"#).unwrap();
        assert!(absent.selected_docs.is_none());

        let given: ChatRequest =
            serde_json::from_str(r#"{"question":"q","selectedDocs":["A.txt"]}"#).unwrap();
        assert_eq!(given.selected_docs, Some(vec!["A.txt".to_string()]));
    }

    #[test]
    fn test_cors_layer_rejects_bad_origin() {
        assert!(cors_layer(None).is_ok());
        assert!(cors_layer(Some("http://localhost:5173")).is_ok());
        assert!(matches!(
            cors_layer(Some("http://bad\norigin")),
            Err(RegscoutError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_chat_before_ingest_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let response = chat(
            State(state),
            Json(ChatRequest {
                question: "What color is grass?".to_string(),
                selected_docs: None,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ingest_then_chat() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let Json(report) = ingest(State(state.clone())).await.unwrap_or_else(|e| panic!("{}", e.0));
        assert!(report.success);
        assert_eq!(report.documents, 2);

        let Json(documents) = list_documents(State(state.clone())).await.unwrap_or_else(|e| panic!("{}", e.0));
        assert_eq!(documents, vec!["A.txt", "B.txt"]);

        let Json(reply) = chat(
            State(state.clone()),
            Json(ChatRequest {
                question: "What color is grass?".to_string(),
                selected_docs: Some(vec!["A.txt".to_string()]),
            }),
        )
        .await
        .unwrap_or_else(|e| panic!("{}", e.0));

        assert_eq!(reply.response, "Grass is green.");
        assert_eq!(reply.sources, vec!["A.txt"]);
    }

    #[tokio::test]
    async fn test_empty_selection_and_blank_question() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        ingest(State(state.clone())).await.unwrap_or_else(|e| panic!("{}", e.0));

        let Json(reply) = chat(
            State(state.clone()),
            Json(ChatRequest {
                question: "What color is grass?".to_string(),
                selected_docs: Some(Vec::new()),
            }),
        )
        .await
        .unwrap_or_else(|e| panic!("{}", e.0));
        assert!(reply.sources.is_empty());

        let response = general_chat(
            State(state),
            Json(GeneralChatRequest {
                question: "   ".to_string(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
