use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use clap::Parser;
use insightpdf_core::{
    ingest_files, search_chunks, Embedder, LopdfExtractor, MemoryIndex, SearchResult,
    TrigramEmbedder, UploadedFile, COLLECTION_NAME,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Parser)]
#[command(name = "insightpdf-server", version)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

/// Process-wide dependencies, built once before the listener binds: the
/// embedder first, then the collection sized to match it. Dropped only when
/// the process exits, taking the index contents with it.
struct AppState {
    extractor: LopdfExtractor,
    embedder: TrigramEmbedder,
    index: MemoryIndex,
}

impl AppState {
    fn new() -> Self {
        let embedder = TrigramEmbedder::default();
        let index = MemoryIndex::new(COLLECTION_NAME, embedder.dimensions());
        Self {
            extractor: LopdfExtractor,
            embedder,
            index,
        }
    }
}

/// Every internal failure maps to the same wire shape, differing only in
/// message text.
struct ApiError {
    detail: String,
}

impl ApiError {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": self.detail })),
        )
            .into_response()
    }
}

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

async fn ingest(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|upload_error| ApiError::new(upload_error.to_string()))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|upload_error| ApiError::new(upload_error.to_string()))?;
        files.push(UploadedFile::new(name, bytes.to_vec()));
    }

    let summary = ingest_files(&files, &state.extractor, &state.embedder, &state.index)
        .await
        .map_err(|ingest_error| {
            error!(%ingest_error, "ingestion failed");
            ApiError::new(ingest_error.to_string())
        })?;

    info!(files = summary.files, pages = summary.pages, "ingest complete");
    Ok(Json(serde_json::json!({ "message": summary.message() })))
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let results = search_chunks(&params.query, &state.embedder, &state.index)
        .await
        .map_err(|search_error| {
            error!(%search_error, "search failed");
            ApiError::new(format!("Search failed: {search_error}"))
        })?;

    Ok(Json(results))
}

async fn landing() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/ingest", post(ingest))
        .route("/search", get(search))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let state = Arc::new(AppState::new());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        started_at = %Utc::now().to_rfc3339(),
        "insightpdf-server boot"
    );

    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port)).await?;
    info!(host = %cli.host, port = cli.port, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{app, AppState};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> axum::Router {
        app(Arc::new(AppState::new()))
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn landing_page_is_served_verbatim() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert_eq!(body, super::INDEX_HTML);
    }

    #[tokio::test]
    async fn empty_query_returns_empty_array() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/search?query=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "[]");
    }

    #[tokio::test]
    async fn non_pdf_upload_is_counted_without_indexing() {
        let boundary = "insightpdf-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"files\"; filename=\"notes.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             just some plain text notes\r\n\
             --{boundary}--\r\n"
        );

        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ingest")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Successfully ingested 1 files (0 pages)."));
    }

    #[tokio::test]
    async fn unreadable_pdf_maps_to_500_with_detail() {
        let boundary = "insightpdf-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"files\"; filename=\"broken.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             not a real pdf\r\n\
             --{boundary}--\r\n"
        );

        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/ingest")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(response).await.contains("detail"));
    }
}
