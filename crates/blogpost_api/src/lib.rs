//! HTTP host for the blog post controller.
//!
//! # Responsibility
//! - Bind controller operations to axum routes.
//! - Render `ActionResult` values as HTTP responses.
//!
//! # Invariants
//! - Handlers never touch storage directly; everything goes through the
//!   controller.
//! - Storage faults become 500 responses with a JSON error body. The body
//!   carries a fixed message; the underlying error only goes to the log.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use blogpost_core::{
    core_version, ActionResult, BlogPost, BlogPostController, BlogPostId, BlogPostService,
    ServiceResult, BLOG_POST_ROUTE,
};
use log::error;
use serde_json::json;
use tokio::net::TcpListener;

/// Error text sent to clients for any storage fault.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal storage error";

/// Controller shared by every request handler.
pub type SharedController = Arc<BlogPostController<dyn BlogPostService>>;

/// Builds the application router around `controller`.
pub fn router(controller: SharedController) -> Router {
    Router::new()
        .route(
            BLOG_POST_ROUTE,
            get(get_all_posts).post(insert_new_post).put(put_post),
        )
        .route(
            &format!("{BLOG_POST_ROUTE}/{{id}}"),
            get(get_by_id).delete(delete_post),
        )
        .route("/health", get(health))
        .with_state(controller)
}

/// Serves `app` on `listener` until the server stops.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// Controller outcome as returned to axum.
pub struct ApiResponse(pub ServiceResult<ActionResult>);

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match self.0 {
            Ok(result) => render(&result),
            Err(err) => {
                error!("event=request_failed module=api status=error error={err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}

fn render(result: &ActionResult) -> Response {
    let status =
        StatusCode::from_u16(result.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = match result.payload() {
        Some(payload) => (status, Json(payload)).into_response(),
        None => status.into_response(),
    };

    if let ActionResult::Created { location, .. } = result {
        if let Ok(value) = HeaderValue::from_str(location) {
            response.headers_mut().insert(header::LOCATION, value);
        }
    }

    response
}

async fn get_all_posts(State(controller): State<SharedController>) -> ApiResponse {
    ApiResponse(controller.get_all_posts())
}

async fn get_by_id(
    State(controller): State<SharedController>,
    Path(id): Path<BlogPostId>,
) -> ApiResponse {
    ApiResponse(controller.get_by_id(id))
}

async fn insert_new_post(
    State(controller): State<SharedController>,
    Json(post): Json<BlogPost>,
) -> ApiResponse {
    ApiResponse(controller.insert_new_post(post))
}

async fn put_post(
    State(controller): State<SharedController>,
    Json(post): Json<BlogPost>,
) -> ApiResponse {
    ApiResponse(controller.put(&post))
}

async fn delete_post(
    State(controller): State<SharedController>,
    Path(id): Path<BlogPostId>,
) -> ApiResponse {
    ApiResponse(controller.delete(id))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": core_version() }))
}
