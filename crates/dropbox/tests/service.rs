//! Integration tests for `DropboxService` against a mock Dropbox.

use bytes::Bytes;
use dropbox::{DropboxError, DropboxService, Endpoints, ExportDocument, OAuthApp};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "sl.test-token";

async fn setup() -> (MockServer, DropboxService) {
    let server = MockServer::start().await;
    let service = DropboxService::new(
        OAuthApp::new("app-key", "app-secret"),
        Endpoints::single(server.uri()),
    )
    .unwrap();
    (server, service)
}

fn listing() -> serde_json::Value {
    json!({
        "entries": [
            { ".tag": "folder", "name": "Archive", "id": "id:f1", "path_lower": "/docs/archive" },
            { ".tag": "file", "name": "contract.pdf", "id": "id:a1", "path_lower": "/docs/contract.pdf", "size": 2048 },
            { ".tag": "file", "name": "notes.txt", "id": "id:a2", "path_lower": "/docs/notes.txt", "size": 12 },
            { ".tag": "file", "name": "Scan.PDF", "id": "id:a3", "path_lower": "/docs/scan.pdf", "size": 99 }
        ],
        "cursor": "AAE",
        "has_more": false
    })
}

// ============================================================================
// OAuth
// ============================================================================

#[tokio::test]
async fn test_get_token_exchanges_code() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .and(body_string_contains("client_id=app-key"))
        .and(body_string_contains("client_secret=app-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "sl.new",
            "token_type": "bearer",
            "expires_in": 14400,
            "account_id": "dbid:abc",
            "uid": "12345"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = service
        .get_token("the-code", "https://app.example.com/dropbox/callback")
        .await
        .unwrap();

    assert_eq!(token.access_token, "sl.new");
    assert_eq!(token.expires_in, Some(14400));
    assert_eq!(token.account_id.as_deref(), Some("dbid:abc"));
}

#[tokio::test]
async fn test_get_token_passes_provider_error_through() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "code doesn't exist or has expired"
        })))
        .mount(&server)
        .await;

    let err = service.get_token("stale", "https://x").await.unwrap_err();
    match err {
        DropboxError::Api { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

// ============================================================================
// Current user
// ============================================================================

#[tokio::test]
async fn test_get_current_user_sends_bearer_token() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/2/users/get_current_account"))
        .and(header("authorization", "Bearer sl.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account_id": "dbid:abc",
            "name": {
                "given_name": "Ada",
                "surname": "Lovelace",
                "familiar_name": "Ada",
                "display_name": "Ada Lovelace",
                "abbreviated_name": "AL"
            },
            "email": "ada@example.com",
            "email_verified": true,
            "country": "GB"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let account = service.get_current_user(TOKEN).await.unwrap();
    assert_eq!(account.name.display_name, "Ada Lovelace");
    assert_eq!(account.extra.get("country"), Some(&json!("GB")));
}

#[tokio::test]
async fn test_invalid_token_is_returned_unchanged() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/2/users/get_current_account"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error_summary": "invalid_access_token/",
            "error": { ".tag": "invalid_access_token" }
        })))
        .mount(&server)
        .await;

    let err = service.get_current_user("expired").await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_get_documents_sends_fixed_listing_arguments() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/2/files/list_folder"))
        .and(body_json(json!({
            "path": "/docs",
            "recursive": false,
            "include_deleted": false,
            "include_media_info": false,
            "limit": 2000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(1)
        .mount(&server)
        .await;

    let docs = service.get_documents(TOKEN, "/docs", None).await.unwrap();

    assert_eq!(docs.len(), 4);
    assert!(docs.iter().all(|d| d.parent_id == "/docs"));
    assert!(docs[0].is_folder);
    assert!(!docs[1].is_folder);
    assert_eq!(docs[1].entry.extra.get("size"), Some(&json!(2048)));
}

#[tokio::test]
async fn test_get_documents_filters_by_extension() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/2/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .mount(&server)
        .await;

    let docs = service.get_documents(TOKEN, "/docs", Some("pdf")).await.unwrap();
    let names: Vec<&str> = docs.iter().map(|d| d.entry.name.as_str()).collect();

    assert_eq!(names, vec!["Archive", "contract.pdf", "Scan.PDF"]);
}

#[tokio::test]
async fn test_get_documents_empty_extension_means_no_filter() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/2/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .mount(&server)
        .await;

    let docs = service.get_documents(TOKEN, "", Some("")).await.unwrap();
    assert_eq!(docs.len(), 4);
    assert!(docs.iter().all(|d| d.parent_id.is_empty()));
}

#[tokio::test]
async fn test_get_documents_path_not_found() {
    let (server, service) = setup().await;

    let body = json!({
        "error_summary": "path/not_found/..",
        "error": { ".tag": "path", "path": { ".tag": "not_found" } }
    });

    Mock::given(method("POST"))
        .and(path("/2/files/list_folder"))
        .respond_with(ResponseTemplate::new(409).set_body_json(body.clone()))
        .mount(&server)
        .await;

    match service.get_documents(TOKEN, "/missing", None).await.unwrap_err() {
        DropboxError::Api { status, body: raw } => {
            assert_eq!(status.as_u16(), 409);
            let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
            assert_eq!(parsed, body);
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreadable_error_body_keeps_provider_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Advertises a longer body than it sends, then hangs up.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 100\r\n\r\npartial")
            .await
            .unwrap();
    });

    let service = DropboxService::new(
        OAuthApp::new("app-key", "app-secret"),
        Endpoints::single(format!("http://{}", addr)),
    )
    .unwrap();

    let err = service.get_current_user(TOKEN).await.unwrap_err();
    match err {
        DropboxError::Api { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert!(body.is_empty());
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

// ============================================================================
// Download
// ============================================================================

#[tokio::test]
async fn test_download_document_buffers_linked_content() {
    let (server, service) = setup().await;
    let contents: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();

    Mock::given(method("POST"))
        .and(path("/2/files/get_temporary_link"))
        .and(body_json(json!({ "path": "id:a1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": { "name": "contract.pdf", "id": "id:a1", "size": contents.len() },
            "link": format!("{}/tmp/contract.pdf", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tmp/contract.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(contents.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let download = service.download_document(TOKEN, "id:a1").await.unwrap();
    assert_eq!(download.metadata.name, "contract.pdf");
    assert_eq!(download.contents.len(), contents.len());
    assert_eq!(&download.contents[..], &contents[..]);
}

#[tokio::test]
async fn test_download_document_link_failure() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/2/files/get_temporary_link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": { "name": "gone.pdf" },
            "link": format!("{}/tmp/gone.pdf", server.uri())
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tmp/gone.pdf"))
        .respond_with(ResponseTemplate::new(410).set_body_string("link expired"))
        .mount(&server)
        .await;

    let err = service.download_document(TOKEN, "id:gone").await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(410));
}

// ============================================================================
// Upload / delete
// ============================================================================

#[tokio::test]
async fn test_upload_file_targets_parent_folder() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/2/files/upload"))
        .and(header("content-type", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "cert.pdf",
            "id": "id:c1",
            "path_display": "/Signed/cert.pdf",
            "size": 9,
            "rev": "a1c10ce0dd78"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let document = ExportDocument::new("cert.pdf", "/Signed");
    let metadata = service
        .upload_file(TOKEN, &document, Bytes::from_static(b"%PDF-1.7\n"))
        .await
        .unwrap();

    assert_eq!(metadata.path_display.as_deref(), Some("/Signed/cert.pdf"));
    assert_eq!(metadata.size, Some(9));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].body, b"%PDF-1.7\n");

    let arg = requests[0]
        .headers
        .get("dropbox-api-arg")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    let arg: serde_json::Value = serde_json::from_str(arg).unwrap();
    assert_eq!(
        arg,
        json!({ "path": "/Signed/cert.pdf", "mode": "add", "autorename": false, "mute": false })
    );
}

#[tokio::test]
async fn test_delete_file() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/2/files/delete_v2"))
        .and(body_json(json!({ "path": "/docs/notes.txt" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": { ".tag": "file", "name": "notes.txt", "path_lower": "/docs/notes.txt" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = service.delete_file(TOKEN, "/docs/notes.txt").await.unwrap();
    assert_eq!(result.metadata.name, "notes.txt");
}
