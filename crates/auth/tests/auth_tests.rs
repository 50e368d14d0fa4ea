use pgstay_auth::recovery::reset_with_link;
use pgstay_auth::{
    AuthClient, AuthError, CredentialStore, FileCredentialStore, MemoryCredentialStore, ProfileUpdate, RecoveryError,
    RecoveryFlow, RecoveryState, Registration, SessionStore, CREDENTIAL_KEY,
};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resident_json(email: &str, is_admin: bool) -> Value {
    json!({
        "id": 11,
        "email": email,
        "mobile": "9812345670",
        "first_name": "Ravi",
        "last_name": "Sharma",
        "father_name": "Mohan Sharma",
        "aadhar": "123412341234",
        "address": "Ratanada, Jodhpur",
        "is_resident": true,
        "isAdmin": is_admin,
        "photo_url": null,
        "aadhar_photo_url": null
    })
}

fn client_with(server: &MockServer, credentials: Arc<MemoryCredentialStore>) -> AuthClient {
    let session = SessionStore::new(credentials);
    AuthClient::new(&server.uri(), Client::new(), session)
}

#[tokio::test]
async fn test_register_signs_in() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/register/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "user": resident_json("ravi@example.com", false),
            "refresh": "refresh-token",
            "access": "access-token"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    let auth = client_with(&mock_server, credentials.clone());

    let registration = Registration {
        email: "ravi@example.com".to_string(),
        password: "secret1".to_string(),
        mobile: "9812345670".to_string(),
        first_name: "Ravi".to_string(),
        last_name: "Sharma".to_string(),
        ..Default::default()
    };
    let resident = auth.register(&registration).await.unwrap();

    assert_eq!(resident.email, "ravi@example.com");
    assert!(auth.session().is_authenticated());
    assert_eq!(auth.session().credential().as_deref(), Some("access-token"));
    assert_eq!(
        credentials.load(CREDENTIAL_KEY).unwrap().as_deref(),
        Some("access-token")
    );
}

#[tokio::test]
async fn test_login_failure_keeps_session_signed_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/login/"))
        .and(body_json(json!({ "email": "ravi@example.com", "password": "wrong" })))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid email or password" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));
    let err = auth.login("ravi@example.com", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.backend_message(), Some("Invalid email or password"));
    assert!(!auth.session().is_authenticated());
}

#[tokio::test]
async fn test_restore_with_valid_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .and(header("Authorization", "Bearer persisted-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(resident_json("owner@example.com", true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::with_credential("persisted-token"));
    let auth = client_with(&mock_server, credentials.clone());

    assert!(auth.restore_session().await);
    assert!(!auth.session().is_loading());
    assert!(auth.session().is_admin());
    assert_eq!(
        auth.session().current_identity().map(|r| r.email),
        Some("owner@example.com".to_string())
    );
    assert_eq!(
        credentials.load(CREDENTIAL_KEY).unwrap().as_deref(),
        Some("persisted-token")
    );
}

#[tokio::test]
async fn test_restore_with_expired_credential_discards_it() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let credentials = Arc::new(MemoryCredentialStore::with_credential("expired-token"));
    let auth = client_with(&mock_server, credentials.clone());

    assert!(!auth.restore_session().await);
    assert!(!auth.session().is_authenticated());
    assert!(!auth.session().is_loading());
    assert_eq!(credentials.load(CREDENTIAL_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_restore_without_credential_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));
    assert!(!auth.restore_session().await);
    assert!(!auth.session().is_authenticated());
}

#[tokio::test]
async fn test_update_profile_refreshes_identity() {
    let mock_server = MockServer::start().await;

    let mut updated = resident_json("ravi@example.com", false);
    updated["photo_url"] = json!("https://res.cloudinary.com/demo/image/upload/p.jpg");

    Mock::given(method("PATCH"))
        .and(path("/users/profile/"))
        .and(header("Authorization", "Bearer access-token"))
        .and(body_json(json!({
            "photo_url": "https://res.cloudinary.com/demo/image/upload/p.jpg"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));
    let resident = serde_json::from_value(resident_json("ravi@example.com", false)).unwrap();
    auth.session().login("access-token", resident);

    let update = ProfileUpdate::new()
        .with_photo_url("https://res.cloudinary.com/demo/image/upload/p.jpg");
    auth.update_profile(&update).await.unwrap();

    let identity = auth.session().current_identity().unwrap();
    assert_eq!(
        identity.photo(),
        Some("https://res.cloudinary.com/demo/image/upload/p.jpg")
    );
    assert_eq!(auth.session().credential().as_deref(), Some("access-token"));
}

#[tokio::test]
async fn test_profile_requires_session() {
    let mock_server = MockServer::start().await;
    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));

    let err = auth.fetch_profile().await.unwrap_err();
    assert!(matches!(err, AuthError::MissingSession));
}

#[tokio::test]
async fn test_recovery_happy_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/password-reset/"))
        .and(body_json(json!({ "email": "ravi@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "OTP sent to your email",
            "email": "ravi@example.com"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/verify-otp/"))
        .and(body_json(json!({ "email": "ravi@example.com", "otp": "482913" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "OTP verified successfully",
            "verified": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/password-reset-confirm/"))
        .and(body_json(json!({
            "email": "ravi@example.com",
            "otp": "482913",
            "new_password": "newsecret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Password reset successful"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));
    let mut flow = RecoveryFlow::new(auth);

    flow.request_code("ravi@example.com").await.unwrap();
    assert_eq!(
        flow.state(),
        &RecoveryState::AwaitingVerification {
            email: "ravi@example.com".to_string()
        }
    );

    flow.verify_code("482-913").await.unwrap();
    assert_eq!(flow.state().step_number(), 3);

    flow.set_new_password("newsecret", "newsecret").await.unwrap();
    assert!(flow.state().is_completed());
}

#[tokio::test]
async fn test_request_code_failure_stays_put() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/password-reset/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "Failed to send OTP" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));
    let mut flow = RecoveryFlow::new(auth);

    let err = flow.request_code("ravi@example.com").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to send OTP. Please try again.");
    assert_eq!(flow.state(), &RecoveryState::default());
}

#[tokio::test]
async fn test_verify_rejection_surfaces_backend_reason() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/password-reset/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/verify-otp/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "OTP has expired",
            "verified": false
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));
    let mut flow = RecoveryFlow::new(auth);
    flow.request_code("ravi@example.com").await.unwrap();

    let err = flow.verify_code("111111").await.unwrap_err();
    assert_eq!(err, RecoveryError::Rejected("OTP has expired".to_string()));
    assert_eq!(flow.state().step_number(), 2);

    // an incomplete code never reaches the backend
    assert_eq!(
        flow.verify_code("12a4").await.unwrap_err(),
        RecoveryError::IncompleteCode
    );

    let err = flow.verify_code("222222").await.unwrap_err();
    assert!(!err.is_local());
}

#[tokio::test]
async fn test_verify_rejection_without_reason_uses_generic_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/password-reset/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/verify-otp/"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&mock_server)
        .await;

    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));
    let mut flow = RecoveryFlow::new(auth);
    flow.request_code("ravi@example.com").await.unwrap();

    let err = flow.verify_code("123456").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid OTP");
}

#[tokio::test]
async fn test_new_password_checked_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/password-reset/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/verify-otp/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/password-reset-confirm/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));
    let mut flow = RecoveryFlow::new(auth);
    flow.request_code("ravi@example.com").await.unwrap();
    flow.verify_code("123456").await.unwrap();

    assert_eq!(
        flow.set_new_password("abc", "abcd").await.unwrap_err(),
        RecoveryError::PasswordMismatch
    );
    assert_eq!(
        flow.set_new_password("ab", "ab").await.unwrap_err(),
        RecoveryError::PasswordTooShort
    );
    assert_eq!(flow.state().step_number(), 3);
}

#[tokio::test]
async fn test_restart_requires_a_new_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/password-reset/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));
    let mut flow = RecoveryFlow::new(auth);
    flow.request_code("ravi@example.com").await.unwrap();

    flow.restart().unwrap();
    assert_eq!(
        flow.state(),
        &RecoveryState::AwaitingCode {
            email: Some("ravi@example.com".to_string())
        }
    );
    assert!(matches!(
        flow.verify_code("123456").await,
        Err(RecoveryError::WrongStep { .. })
    ));

    flow.request_code("ravi@example.com").await.unwrap();
    assert_eq!(flow.state().step_number(), 2);
}

#[tokio::test]
async fn test_link_reset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/password-reset-confirm/"))
        .and(body_json(json!({ "uid": "MTE", "token": "c3x-9f", "new_password": "newsecret" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "Invalid request" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let auth = client_with(&mock_server, Arc::new(MemoryCredentialStore::new()));

    assert_eq!(
        reset_with_link(&auth, "MTE", "c3x-9f", "short", "short").await,
        Err(RecoveryError::PasswordTooShort)
    );
    assert_eq!(
        reset_with_link(&auth, "MTE", "c3x-9f", "newsecret", "newsecret").await,
        Err(RecoveryError::Rejected("Invalid request".to_string()))
    );
}

#[tokio::test]
async fn test_restore_discards_corrupt_credential_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "garbage").unwrap();

    let store = Arc::new(FileCredentialStore::new(&path));
    let session = SessionStore::new(store.clone());
    assert!(session.is_loading());
    let auth = AuthClient::new(&mock_server.uri(), Client::new(), session);

    assert!(!auth.restore_session().await);
    assert!(!auth.session().is_loading());
    assert_eq!(store.load(CREDENTIAL_KEY).unwrap(), None);

    auth.session()
        .login("fresh-token", serde_json::from_value(resident_json("ravi@example.com", false)).unwrap());
    assert_eq!(store.load(CREDENTIAL_KEY).unwrap().as_deref(), Some("fresh-token"));
}
