use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use axum::Router;
use blogpost_api::{router, SharedController, INTERNAL_ERROR_MESSAGE};
use blogpost_core::{
    BlogPost, BlogPostController, BlogPostId, BlogPostService, ControllerOptions,
    DatabaseBlogPostService, InMemoryBlogPostService, ServiceError, ServiceResult,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn app_with(service: Arc<dyn BlogPostService>, options: ControllerOptions) -> Router {
    let controller: SharedController = Arc::new(BlogPostController::with_options(service, options));
    router(controller)
}

fn seeded_app() -> Router {
    app_with(
        Arc::new(InMemoryBlogPostService::seeded()),
        ControllerOptions::default(),
    )
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_is_empty(response: axum::response::Response) -> bool {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .is_empty()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

/// Store whose every operation fails, as a broken database would.
struct FailingService;

const STORAGE_DETAIL: &str = "disk I/O error on blog_posts";

impl BlogPostService for FailingService {
    fn get_all(&self) -> ServiceResult<Vec<BlogPost>> {
        Err(ServiceError::InvalidData(STORAGE_DETAIL.to_string()))
    }

    fn get_by_id(&self, _id: BlogPostId) -> ServiceResult<Option<BlogPost>> {
        Err(ServiceError::InvalidData(STORAGE_DETAIL.to_string()))
    }

    fn insert(&self, _post: BlogPost) -> ServiceResult<BlogPost> {
        Err(ServiceError::InvalidData(STORAGE_DETAIL.to_string()))
    }

    fn update(&self, _post: &BlogPost) -> ServiceResult<()> {
        Err(ServiceError::InvalidData(STORAGE_DETAIL.to_string()))
    }

    fn delete(&self, _id: BlogPostId) -> ServiceResult<()> {
        Err(ServiceError::InvalidData(STORAGE_DETAIL.to_string()))
    }
}

const ROBERTO_JSON: &str =
    r#"{"title":"Fourth Blog Post","author":"Roberto","content":"Fourth Blog Post by Roberto"}"#;

// --- list ---

#[tokio::test]
async fn get_all_on_empty_store_returns_empty_list() {
    let app = app_with(
        Arc::new(InMemoryBlogPostService::new()),
        ControllerOptions::default(),
    );

    let resp = app
        .oneshot(empty_request("GET", "/api/blogpost"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<BlogPost> = body_json(resp).await;
    assert!(posts.is_empty());
}

#[tokio::test]
async fn get_all_returns_seeded_posts() {
    let resp = seeded_app()
        .oneshot(empty_request("GET", "/api/blogpost"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<BlogPost> = body_json(resp).await;
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0].author, "Oscar Recio");
}

// --- get ---

#[tokio::test]
async fn get_existing_post_returns_200() {
    let resp = seeded_app()
        .oneshot(empty_request("GET", "/api/blogpost/2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let post: BlogPost = body_json(resp).await;
    assert_eq!(post.id, 2);
    assert_eq!(post.title, "Second BlogPost");
}

#[tokio::test]
async fn get_missing_post_returns_204() {
    let resp = seeded_app()
        .oneshot(empty_request("GET", "/api/blogpost/4"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_is_empty(resp).await);
}

#[tokio::test]
async fn get_with_non_numeric_id_returns_400() {
    let resp = seeded_app()
        .oneshot(empty_request("GET", "/api/blogpost/first"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_returns_201_with_location() {
    let resp = seeded_app()
        .oneshot(json_request("POST", "/api/blogpost", ROBERTO_JSON))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        resp.headers().get(http::header::LOCATION).unwrap(),
        "/api/blogpost/4"
    );
    let post: BlogPost = body_json(resp).await;
    assert_eq!(post.id, 4);
    assert_eq!(post.author, "Roberto");
}

#[tokio::test]
async fn create_with_missing_field_is_rejected_by_extractor() {
    let resp = seeded_app()
        .oneshot(json_request(
            "POST",
            "/api/blogpost",
            r#"{"title":"No author","content":"body"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_with_blank_field_returns_400_under_strict_validation() {
    let app = app_with(
        Arc::new(InMemoryBlogPostService::new()),
        ControllerOptions {
            validate_required_fields: true,
        },
    );

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/blogpost",
            r#"{"title":"Title","author":"","content":"body"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"], "blog post field `author` is required");
}

// --- update ---

#[tokio::test]
async fn put_existing_post_returns_200() {
    let resp = seeded_app()
        .oneshot(json_request(
            "PUT",
            "/api/blogpost",
            r#"{"id":1,"title":"Blog Post","author":"Roberto","content":"Fourth Blog Post by Roberto"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn put_missing_post_returns_404() {
    let resp = seeded_app()
        .oneshot(json_request(
            "PUT",
            "/api/blogpost",
            r#"{"id":40,"title":"t","author":"a","content":"c"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_existing_post_returns_410() {
    let resp = seeded_app()
        .oneshot(empty_request("DELETE", "/api/blogpost/1"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::GONE);
    assert!(body_is_empty(resp).await);
}

#[tokio::test]
async fn delete_missing_post_returns_404() {
    let resp = seeded_app()
        .oneshot(empty_request("DELETE", "/api/blogpost/4"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- storage faults ---

#[tokio::test]
async fn storage_failure_returns_500_with_generic_error() {
    let app = app_with(Arc::new(FailingService), ControllerOptions::default());

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/blogpost", ROBERTO_JSON))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = body_json(response).await;
    assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
    assert!(!body.to_string().contains(STORAGE_DETAIL));

    let response = app
        .oneshot(empty_request("GET", "/api/blogpost"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = body_json(response).await;
    assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
}

// --- health ---

#[tokio::test]
async fn health_reports_version() {
    let resp = seeded_app()
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle_against_database_store() {
    let app = app_with(
        Arc::new(DatabaseBlogPostService::open_in_memory().unwrap()),
        ControllerOptions::default(),
    );

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/blogpost", ROBERTO_JSON))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: BlogPost = body_json(resp).await;
    let id = created.id;
    let item_uri = format!("/api/blogpost/{id}");

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/blogpost",
            &format!(r#"{{"id":{id},"title":"Edited","author":"Roberto","content":"Edited body"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(empty_request("GET", &item_uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: BlogPost = body_json(resp).await;
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.title, "Edited");
    assert_eq!(fetched.content, "Edited body");

    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", &item_uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::GONE);

    let resp = app
        .clone()
        .oneshot(empty_request("GET", &item_uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .clone()
        .oneshot(empty_request("DELETE", &item_uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .oneshot(empty_request("GET", "/api/blogpost"))
        .await
        .unwrap();
    let posts: Vec<BlogPost> = body_json(resp).await;
    assert!(posts.is_empty());
}
