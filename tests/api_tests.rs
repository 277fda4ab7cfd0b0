//! Integration tests for the browser-facing book routes.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bookshelf::config::Config;
use http_body_util::BodyExt;
use sea_orm::ConnectionTrait;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "----bookshelf-test-boundary";

struct TestApp {
    state: Arc<bookshelf::api::AppState>,
    router: Router,
    root: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

async fn spawn_app() -> TestApp {
    let root = std::env::temp_dir().join(format!("bookshelf-api-test-{}", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", root.join("books.db").display());
    config.general.public_root = root.join("wwwroot").display().to_string();

    let state = bookshelf::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    let router = bookshelf::api::router(state.clone()).await;

    TestApp {
        state,
        router,
        root,
    }
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"ImageFile\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn post_form(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
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

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn valid_fields(title: &str) -> Vec<(&str, &str)> {
    vec![
        ("Title", title),
        ("Author", "Italo Calvino"),
        ("Genre", "Fiction"),
        ("PublishedYear", "1972"),
        ("Price", "18.00"),
        ("DiscountPercentage", "50"),
    ]
}

#[tokio::test]
async fn test_list_is_empty_not_an_error() {
    let app = spawn_app().await;

    let response = app.router.clone().oneshot(get("/Books")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No books found."));

    let response = app.router.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let app = spawn_app().await;

    for uri in ["/Books/Details/42", "/Books/Edit/42", "/Books/Delete/42"] {
        let response = app.router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }

    let response = app
        .router
        .clone()
        .oneshot(post_form("/Books/Edit/42", multipart_body(&valid_fields("X"), None)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/Books/Delete/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_redirects_and_lists_book() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(post_form(
            "/Books/Create",
            multipart_body(&valid_fields("Invisible Cities"), Some(("cities.png", b"png"))),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/Books");

    let response = app.router.clone().oneshot(get("/Books")).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains("Invisible Cities"));
    assert!(html.contains("9.00"));

    let books = app.state.book_service().list_books().await.unwrap();
    assert_eq!(books.len(), 1);
    let image_url = books[0].image_url.clone().unwrap();

    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/{image_url}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "png");
}

#[tokio::test]
async fn test_create_with_invalid_fields_rerenders_form() {
    let app = spawn_app().await;

    let fields = vec![
        ("Title", "Kept Title"),
        ("Author", "Someone"),
        ("Genre", "Drama"),
        ("PublishedYear", "500"),
        ("Price", "0"),
        ("DiscountPercentage", "150"),
    ];

    let response = app
        .router
        .clone()
        .oneshot(post_form("/Books/Create", multipart_body(&fields, None)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Kept Title"));
    assert!(html.contains("Please enter a valid year."));
    assert!(html.contains("Price must be greater than zero."));
    assert!(html.contains("Discount percentage must be between 0 and 100."));

    assert!(app.state.book_service().list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_txt_file_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(post_form(
            "/Books/Create",
            multipart_body(&valid_fields("Mr Palomar"), Some(("notes.txt", b"text"))),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Invalid file type."));
    assert!(html.contains("Mr Palomar"));

    assert!(app.state.book_service().list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_unparsable_id_is_rejected() {
    let app = spawn_app().await;

    let mut fields = valid_fields("Mr Palomar");
    fields.push(("Id", "abc"));

    let response = app
        .router
        .clone()
        .oneshot(post_form("/Books/Create", multipart_body(&fields, None)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("is not valid for Id."));
    assert!(app.state.book_service().list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_price_above_limit_is_rejected() {
    let app = spawn_app().await;

    let mut fields = valid_fields("The Castle of Crossed Destinies");
    fields[4] = ("Price", "70000000000000000000000000000");

    let response = app
        .router
        .clone()
        .oneshot(post_form("/Books/Create", multipart_body(&fields, None)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Price must be at most 1000000000."));
    assert!(app.state.book_service().list_books().await.unwrap().is_empty());

    let response = app.router.clone().oneshot(get("/Books")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_database_failure_renders_error_page() {
    let app = spawn_app().await;

    app.state
        .shared
        .store
        .conn
        .execute_unprepared("DROP TABLE books")
        .await
        .unwrap();

    let response = app.router.clone().oneshot(get("/Books")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(response).await;
    assert!(html.contains("500 Internal Server Error"));
    assert!(html.contains("A database error occurred"));

    let response = app.router.clone().oneshot(get("/api/books")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_edit_without_image_keeps_cover() {
    let app = spawn_app().await;

    app.router
        .clone()
        .oneshot(post_form(
            "/Books/Create",
            multipart_body(&valid_fields("The Baron in the Trees"), Some(("baron.jpg", b"jpg"))),
        ))
        .await
        .unwrap();

    let before = app.state.book_service().list_books().await.unwrap().remove(0);
    assert!(before.image_url.is_some());

    let mut fields = valid_fields("The Baron in the Trees");
    fields[2] = ("Genre", "Fable");

    let response = app
        .router
        .clone()
        .oneshot(post_form(
            &format!("/Books/Edit/{}", before.id),
            multipart_body(&fields, None),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let after = app.state.book_service().get_book(before.id).await.unwrap();
    assert_eq!(after.genre, "Fable");
    assert_eq!(after.image_url, before.image_url);

    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/Books/Edit/{}", before.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("value=\"Fable\""));
}

#[tokio::test]
async fn test_edit_with_invalid_fields_is_not_persisted() {
    let app = spawn_app().await;

    let book = app
        .state
        .book_service()
        .create_book(
            &bookshelf::models::book::BookForm {
                id: None,
                title: Some("If on a winter's night".to_string()),
                author: Some("Italo Calvino".to_string()),
                genre: Some("Fiction".to_string()),
                published_year: Some("1979".to_string()),
                price: Some("14".to_string()),
                discount_percentage: None,
            },
            None,
        )
        .await
        .unwrap();

    let mut fields = valid_fields("");
    fields[3] = ("PublishedYear", "1979");

    let response = app
        .router
        .clone()
        .oneshot(post_form(
            &format!("/Books/Edit/{}", book.id),
            multipart_body(&fields, None),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("The Title field is required."));

    let unchanged = app.state.book_service().get_book(book.id).await.unwrap();
    assert_eq!(unchanged.title, "If on a winter's night");
}

#[tokio::test]
async fn test_delete_flow_removes_row_and_file() {
    let app = spawn_app().await;

    app.router
        .clone()
        .oneshot(post_form(
            "/Books/Create",
            multipart_body(&valid_fields("Cosmicomics"), Some(("x.jpg", b"jpg"))),
        ))
        .await
        .unwrap();

    let book = app.state.book_service().list_books().await.unwrap().remove(0);
    let image = app
        .state
        .image_service()
        .resolve(book.image_url.as_deref().unwrap())
        .unwrap();
    assert!(image.exists());

    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/Books/Delete/{}", book.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Are you sure"));

    let delete = || {
        Request::builder()
            .method("POST")
            .uri(format!("/Books/Delete/{}", book.id))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.router.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(!image.exists());
    assert!(app.state.book_service().list_books().await.unwrap().is_empty());

    let response = app.router.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_json_catalog() {
    let app = spawn_app().await;

    app.router
        .clone()
        .oneshot(post_form(
            "/Books/Create",
            multipart_body(&valid_fields("Difficult Loves"), None),
        ))
        .await
        .unwrap();

    let response = app.router.clone().oneshot(get("/api/books")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body["success"].as_bool().unwrap_or(false));
    let first = &body["data"][0];
    assert_eq!(first["title"], "Difficult Loves");
    assert!(first["image_url"].is_null());

    let id = first["id"].as_i64().unwrap();
    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/api/books/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.router.clone().oneshot(get("/api/books/9999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.router.clone().oneshot(get("/api/books/0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
