//! End-to-end tests for the admin API
//!
//! Each test stands up the full application (tempdir data directory,
//! real SQLite file, real listener on an ephemeral port) and speaks
//! HTTP/1.1 over a raw TCP stream.

use std::net::SocketAddr;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use folio_admin::config::{Config, UploadStorage, DEFAULT_MAX_UPLOAD_BYTES};
use folio_admin::{build_router, AppState};

const BOUNDARY: &str = "----folioadmintestboundary";

fn test_config(temp: &TempDir, storage: UploadStorage) -> Config {
    Config {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        data_dir: temp.path().to_path_buf(),
        database_path: temp.path().join("folio.db"),
        uploads_dir: temp.path().join("uploads"),
        upload_storage: storage,
        static_prefix: "/static/uploads".to_string(),
        allowed_extensions: ["pdf", "png", "jpg"].iter().map(|e| e.to_string()).collect(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
}

/// Boot the app and serve it on an ephemeral port
async fn start_app(storage: UploadStorage) -> (SocketAddr, TempDir) {
    let temp = TempDir::new().expect("tempdir");
    let state = AppState::initialize(test_config(&temp, storage))
        .await
        .expect("initialize app");
    let app = build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve app");
    });

    (addr, temp)
}

/// One-shot HTTP/1.1 request; the connection closes after the response
async fn send(addr: SocketAddr, request: String) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect server");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");

    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    response
}

async fn get(addr: SocketAddr, path: &str) -> String {
    send(
        addr,
        format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"),
    )
    .await
}

async fn send_json(addr: SocketAddr, method: &str, path: &str, body: &str) -> String {
    send(
        addr,
        format!(
            "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ),
    )
    .await
}

/// Multipart form with an optional category_id field and one file part
fn multipart_body(category_id: Option<&str>, filename: &str, data: &str) -> String {
    let mut body = String::new();

    if let Some(category_id) = category_id {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"category_id\"\r\n\r\n{category_id}\r\n"
        ));
    }

    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/pdf\r\n\r\n{data}\r\n--{BOUNDARY}--\r\n"
    ));

    body
}

async fn send_multipart(addr: SocketAddr, method: &str, path: &str, body: String) -> String {
    send(
        addr,
        format!(
            "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\
             Content-Type: multipart/form-data; boundary={BOUNDARY}\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ),
    )
    .await
}

fn body_of(response: &str) -> &str {
    let idx = response.find("\r\n\r\n").expect("header/body separator");
    &response[idx + 4..]
}

fn json_body(response: &str) -> serde_json::Value {
    serde_json::from_str(body_of(response)).expect("JSON body")
}

fn field<'a>(value: &'a serde_json::Value, name: &str) -> &'a str {
    value[name].as_str().expect("string field")
}

#[tokio::test]
async fn health_endpoint() {
    let (addr, _temp) = start_app(UploadStorage::Disk).await;

    let response = get(addr, "/healthz").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(json_body(&response)["status"], "ok");
}

#[tokio::test]
async fn document_upload_flow_on_disk() {
    let (addr, _temp) = start_app(UploadStorage::Disk).await;

    // The dropdown starts empty
    let response = get(addr, "/admin/documents/form").await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(json_body(&response)["categories"], serde_json::json!([]));

    // Create a category and find it in the dropdown choices
    let response = send_json(addr, "POST", "/admin/categories", r#"{"name":"Reports"}"#).await;
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"));
    let category_id = field(&json_body(&response), "id").to_string();

    let response = get(addr, "/admin/documents/form").await;
    let options = json_body(&response);
    assert_eq!(options["categories"][0]["name"], "Reports");

    // Upload a document into the category
    let body = multipart_body(Some(&category_id), "annual.pdf", "%PDF-1.4 test content");
    let response = send_multipart(addr, "POST", "/admin/documents", body).await;
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"), "{response}");
    let document = json_body(&response);
    let document_id = field(&document, "id").to_string();
    let stored_path = field(&document, "stored_path").to_string();

    // Listing carries the category name and the public URL
    let response = get(addr, "/admin/documents").await;
    let listing = json_body(&response);
    assert_eq!(listing[0]["category"], "Reports");
    assert_eq!(
        listing[0]["public_url"],
        format!("/static/uploads/{stored_path}")
    );

    // Download through the API
    let response = get(addr, &format!("/admin/documents/{document_id}/file")).await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("content-disposition: attachment; filename=\"annual.pdf\""));
    assert_eq!(body_of(&response), "%PDF-1.4 test content");

    // And through the static mount
    let response = get(addr, &format!("/static/uploads/{stored_path}")).await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body_of(&response), "%PDF-1.4 test content");
}

#[tokio::test]
async fn document_upload_flow_in_database() {
    let (addr, _temp) = start_app(UploadStorage::Database).await;

    let response = send_json(addr, "POST", "/admin/categories", r#"{"name":"Images"}"#).await;
    let category_id = field(&json_body(&response), "id").to_string();

    let body = multipart_body(Some(&category_id), "photo.png", "PNG pixels");
    let response = send_multipart(addr, "POST", "/admin/documents", body).await;
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"), "{response}");
    let document = json_body(&response);
    assert!(document["stored_path"].is_null());
    let document_id = field(&document, "id").to_string();

    // Blob-stored rows have no public URL
    let response = get(addr, "/admin/documents").await;
    assert!(json_body(&response)[0]["public_url"].is_null());

    // Bytes still come back through the API
    let response = get(addr, &format!("/admin/documents/{document_id}/file")).await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(body_of(&response), "PNG pixels");

    // No static mount in database mode
    let response = get(addr, "/static/uploads/ab/cd/abcd").await;
    assert!(response.starts_with("HTTP/1.1 404"));
}

#[tokio::test]
async fn disallowed_extension_is_rejected() {
    let (addr, _temp) = start_app(UploadStorage::Disk).await;

    let response = send_json(addr, "POST", "/admin/categories", r#"{"name":"Reports"}"#).await;
    let category_id = field(&json_body(&response), "id").to_string();

    let body = multipart_body(Some(&category_id), "malware.exe", "MZ");
    let response = send_multipart(addr, "POST", "/admin/documents", body).await;

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(body_of(&response).contains("File type not allowed: exe"));
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let (addr, _temp) = start_app(UploadStorage::Disk).await;

    let response = send_json(addr, "POST", "/admin/categories", r#"{"name":"Reports"}"#).await;
    let category_id = field(&json_body(&response), "id").to_string();

    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"category_id\"\r\n\r\n{category_id}\r\n--{BOUNDARY}--\r\n"
    );
    let response = send_multipart(addr, "POST", "/admin/documents", body).await;

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    assert!(body_of(&response).contains("No file selected"));
}

#[tokio::test]
async fn missing_rows_are_404() {
    let (addr, _temp) = start_app(UploadStorage::Disk).await;

    for path in [
        "/admin/contacts/missing",
        "/admin/categories/missing",
        "/admin/documents/missing",
        "/admin/profile/missing",
        "/admin/links/missing",
        "/admin/facts/missing",
    ] {
        let response = get(addr, path).await;
        assert!(
            response.starts_with("HTTP/1.1 404 Not Found\r\n"),
            "{path}: {response}"
        );
        assert!(body_of(&response).contains("error"));
    }
}

#[tokio::test]
async fn duplicate_category_is_409() {
    let (addr, _temp) = start_app(UploadStorage::Disk).await;

    let response = send_json(addr, "POST", "/admin/categories", r#"{"name":"Reports"}"#).await;
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"));

    let response = send_json(addr, "POST", "/admin/categories", r#"{"name":"Reports"}"#).await;
    assert!(response.starts_with("HTTP/1.1 409 Conflict\r\n"));
}

#[tokio::test]
async fn category_with_documents_cannot_be_deleted() {
    let (addr, _temp) = start_app(UploadStorage::Disk).await;

    let response = send_json(addr, "POST", "/admin/categories", r#"{"name":"Reports"}"#).await;
    let category_id = field(&json_body(&response), "id").to_string();

    let body = multipart_body(Some(&category_id), "annual.pdf", "%PDF");
    send_multipart(addr, "POST", "/admin/documents", body).await;

    let response = send(
        addr,
        format!(
            "DELETE /admin/categories/{category_id} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"
        ),
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 409 Conflict\r\n"));
}

#[tokio::test]
async fn contact_crud_over_http() {
    let (addr, _temp) = start_app(UploadStorage::Disk).await;

    let response = send_json(
        addr,
        "POST",
        "/admin/contacts",
        r#"{"name":"Ada","email":"ada@example.com","message":"Hello!"}"#,
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"));
    let contact_id = field(&json_body(&response), "id").to_string();

    let response = send_json(
        addr,
        "PUT",
        &format!("/admin/contacts/{contact_id}"),
        r#"{"message":"Updated"}"#,
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(json_body(&response)["message"], "Updated");

    let response = send_json(
        addr,
        "POST",
        "/admin/contacts",
        r#"{"name":"Bad","email":"not-an-email","message":"Hi"}"#,
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));

    let response = send(
        addr,
        format!(
            "DELETE /admin/contacts/{contact_id} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"
        ),
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 204 No Content\r\n"));

    let response = get(addr, "/admin/contacts").await;
    assert_eq!(json_body(&response), serde_json::json!([]));
}

#[tokio::test]
async fn profile_links_and_facts_over_http() {
    let (addr, _temp) = start_app(UploadStorage::Disk).await;

    let response = send_json(
        addr,
        "POST",
        "/admin/profile",
        r#"{"name":"Jo Doe","job_title":"Engineer","slogan":"Building things",
            "about_me":"A long story","profile_image_url":"/static/uploads/ab/cd/abcd",
            "about_image_url":"/static/uploads/ef/01/ef01"}"#,
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"), "{response}");
    let profile_id = field(&json_body(&response), "id").to_string();

    let response = send_json(
        addr,
        "PUT",
        &format!("/admin/profile/{profile_id}"),
        r#"{"job_title":"Senior Engineer"}"#,
    )
    .await;
    assert_eq!(json_body(&response)["job_title"], "Senior Engineer");

    let response = send_json(
        addr,
        "POST",
        "/admin/links",
        r#"{"label":"GitHub","url":"https://github.com/example"}"#,
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"));

    let response = send_json(
        addr,
        "POST",
        "/admin/facts",
        r#"{"title":"Based in","detail":"Lisbon"}"#,
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 201 Created\r\n"));

    let response = get(addr, "/admin/links").await;
    assert_eq!(json_body(&response)[0]["label"], "GitHub");

    let response = get(addr, "/admin/facts").await;
    assert_eq!(json_body(&response)[0]["detail"], "Lisbon");
}
