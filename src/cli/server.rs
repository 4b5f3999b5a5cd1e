//! HTTP server mode for REST access to posts

use axum::{
    extract::{Multipart, Path, RawQuery, State},
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{Identity, IdentityProvider, JwtIdentityProvider};
use crate::config::{ConfigProvider, Settings, StoreBackend};
use crate::database::DatabaseStore;
use crate::error::{Error, Result};
use crate::pagination::{Page, QueryNormalizer};
use crate::posts::{CreatePost, Post, PostsService, UpdatePost, DEFAULT_GENERATED_POSTS};
use crate::store::{MemoryStore, RecordStore};
use crate::types::{parse_query_string, RecordId};
use crate::upload::{FileStager, ObjectStoreStager};

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Posts service
    pub posts: PostsService,
    /// Resolves callers of write endpoints
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Create state from its parts
    pub fn new(posts: PostsService, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { posts, identity }
    }

    /// Wire the store, stager and identity provider selected by `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let store: Arc<dyn RecordStore<Post>> = match settings.database.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::<Post>::new()),
            StoreBackend::Duckdb => match &settings.database.path {
                Some(path) => Arc::new(DatabaseStore::open(path)?),
                None => Arc::new(DatabaseStore::open_in_memory()?),
            },
        };
        let config: Arc<dyn ConfigProvider> = Arc::new(settings.clone());
        let stager: Arc<dyn FileStager> =
            Arc::new(ObjectStoreStager::from_settings(&settings.storage)?);

        let posts = PostsService::new(store, config, stager)
            .with_normalizer(QueryNormalizer::new(settings.pagination.default_take));
        let identity = Arc::new(JwtIdentityProvider::from_settings(&settings.auth));

        Ok(Self::new(posts, identity))
    }

    async fn caller(&self, headers: &HeaderMap) -> Result<Identity> {
        let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        self.identity.identify(authorization).await
    }
}

/// Error body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl ErrorResponse {
    fn new(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Optional body of `POST /posts/random`
#[derive(Debug, Default, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    count: Option<usize>,
}

/// Response of `POST /common/image`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_name: String,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    // Allow all origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/random", post(generate_posts))
        .route("/common/image", post(upload_image))
        .route(
            "/posts/:id",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server on all interfaces
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    serve_on(state, listener).await
}

/// Serve on an already bound listener
pub async fn serve_on(state: AppState, listener: TcpListener) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Starting HTTP server on http://{}", addr);
    }

    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// `GET /posts`
async fn list_posts(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Page<Post>>> {
    let pairs = query.as_deref().map(parse_query_string).unwrap_or_default();
    state.posts.paginate_posts(pairs).await.map(Json)
}

/// `GET /posts/:id`
async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<Post>> {
    state.posts.get_post(id).await.map(Json)
}

/// `POST /posts`
async fn create_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreatePost>,
) -> Result<Json<Post>> {
    let caller = state.caller(&headers).await?;
    state.posts.create_post(caller.user_id, body).await.map(Json)
}

/// `PATCH /posts/:id`
async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
    Json(body): Json<UpdatePost>,
) -> Result<Json<Post>> {
    state.posts.update_post(id, body).await.map(Json)
}

/// `DELETE /posts/:id`
async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<RecordId>> {
    state.posts.delete_post(id).await.map(Json)
}

/// `POST /posts/random`
async fn generate_posts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<GenerateRequest>>,
) -> Result<Json<bool>> {
    let caller = state.caller(&headers).await?;
    let count = body
        .and_then(|Json(req)| req.count)
        .unwrap_or(DEFAULT_GENERATED_POSTS);
    state.posts.generate_posts(caller.user_id, count).await?;
    Ok(Json(true))
}

/// `POST /common/image`
///
/// Stages the multipart field named `image` in the temp area.
async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    state.caller(&headers).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let original = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::bad_request(format!("Failed to read upload: {e}")))?;

        let file_name = state.posts.stage_image(&original, data).await?;
        return Ok(Json(UploadResponse { file_name }));
    }

    Err(Error::bad_request("Missing multipart field \"image\""))
}
