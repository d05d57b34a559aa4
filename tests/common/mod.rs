#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use sea_orm::ConnectOptions;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use films::{AppState, config::Config, db, store::FilmStore, uploads::UploadStore};

const BOUNDARY: &str = "films-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub store: FilmStore,
    pub upload_dir: TempDir,
}

/// Full router over a fresh in-memory database and a temporary upload
/// directory.
pub async fn test_app() -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();

    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = db::connect_and_migrate(options).await.unwrap();

    let config = Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        upload_dir: upload_dir.path().to_path_buf(),
        max_upload_bytes: 1024 * 1024,
        default_page_size: 10,
    };
    let store = FilmStore::new(db);
    let state = Arc::new(AppState {
        config: Arc::new(config),
        store: store.clone(),
        uploads: UploadStore::new(upload_dir.path()),
    });

    TestApp { router: films::router(state), store, upload_dir }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: Value) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json(app: &TestApp, uri: &str, body: Value) -> Response<Body> {
    let request = Request::put(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart(
    app: &TestApp,
    uri: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &[u8])>,
) -> Response<Body> {
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
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"thumbnail\"; \
                 filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::post(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn create_category(app: &TestApp, name: &str) -> i64 {
    let response = post_json(app, "/categories", json!({ "name": name })).await;
    assert_eq!(response.status(), 200);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

pub async fn create_film(app: &TestApp, title: &str, category_id: i64) -> Value {
    let category_id = category_id.to_string();
    let response = post_multipart(
        app,
        "/films",
        &[
            ("title", title),
            ("year", "2001"),
            ("categoryId", &category_id),
            ("description", "A film used by the integration tests."),
        ],
        Some(("poster.png", &b"\x89PNG fake"[..])),
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await["data"].clone()
}

pub async fn create_episode(app: &TestApp, film_id: i64, title: &str) -> Value {
    let response =
        post_json(app, &format!("/films/{film_id}/episodes"), json!({ "title": title })).await;
    assert_eq!(response.status(), 200);
    body_json(response).await["data"].clone()
}
