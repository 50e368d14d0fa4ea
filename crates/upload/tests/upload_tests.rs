use pgstay_upload::{ImageHostClient, ImageUploader, UploadError};
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_upload_returns_secure_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/jodhpur-pg/image/upload"))
        .and(body_string_contains("residents-unsigned"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_id": "abc123",
            "secure_url": "https://res.cloudinary.com/jodhpur-pg/image/upload/v1/abc123.jpg"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        ImageHostClient::new("jodhpur-pg", "residents-unsigned").with_host(&mock_server.uri());

    let url = client
        .upload(b"fake-jpeg-bytes".to_vec(), "photo.jpg")
        .await
        .unwrap();
    assert_eq!(
        url,
        "https://res.cloudinary.com/jodhpur-pg/image/upload/v1/abc123.jpg"
    );

    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\"; filename=\"photo.jpg\""));
    assert!(body.contains("name=\"upload_preset\""));
}

#[tokio::test]
async fn test_upload_rejected_by_host() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/jodhpur-pg/image/upload"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "Upload preset not found" }
        })))
        .mount(&mock_server)
        .await;

    let client = ImageHostClient::new("jodhpur-pg", "wrong").with_host(&mock_server.uri());
    let err = client.upload(vec![1, 2, 3], "aadhar.png").await.unwrap_err();

    assert!(matches!(err, UploadError::Rejected { .. }));
    assert_eq!(err.user_message(), "Image upload failed");
}

#[tokio::test]
async fn test_upload_without_secure_url_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/jodhpur-pg/image/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "public_id": "abc" })))
        .mount(&mock_server)
        .await;

    let client = ImageHostClient::new("jodhpur-pg", "residents").with_host(&mock_server.uri());
    let err = client.upload(vec![1, 2, 3], "photo.jpg").await.unwrap_err();
    assert!(matches!(err, UploadError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_upload_file_uses_file_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/jodhpur-pg/image/upload"))
        .and(body_string_contains("filename=\"room-42.jpg\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": "https://res.cloudinary.com/jodhpur-pg/image/upload/room-42.jpg"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("room-42.jpg");
    let mut file = std::fs::File::create(&file_path).unwrap();
    file.write_all(b"jpeg bytes").unwrap();

    let client = ImageHostClient::new("jodhpur-pg", "residents").with_host(&mock_server.uri());
    let url = client.upload_file(&file_path).await.unwrap();
    assert!(url.ends_with("room-42.jpg"));

    let missing = client.upload_file(&dir.path().join("missing.jpg")).await;
    assert!(matches!(missing, Err(UploadError::Io(_))));
}
