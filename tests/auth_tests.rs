use kong_diary::auth::{FileSessionStore, MemorySessionStore, Session, SessionStore};
use kong_diary::config::{ClientOptions, DiaryConfig};
use kong_diary::error::Error;
use kong_diary::KongDiary;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_with_store(server: &MockServer, store: Arc<dyn SessionStore>) -> KongDiary {
    dotenv::dotenv().ok(); // Load .env file if present
    let config = DiaryConfig::new(&server.uri()).unwrap();
    KongDiary::with_store(config, store)
}

fn session(access_token: &str, refresh_token: Option<&str>) -> Session {
    Session {
        user_id: 7,
        display_name: "콩이".to_string(),
        email: "kong@example.com".to_string(),
        access_token: access_token.to_string(),
        refresh_token: refresh_token.map(str::to_string),
    }
}

#[tokio::test]
async fn test_sign_in_stores_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({"email": "kong@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "message": "로그인 성공",
            "data": {
                "accessToken": "access",
                "refreshToken": "refresh",
                "user": {"id": 7, "email": "kong@example.com", "nickname": "콩이"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let diary = client_with_store(&server, store.clone());

    let signed_in = diary.auth().sign_in("kong@example.com", "pw").await.unwrap();
    assert_eq!(signed_in, session("access", Some("refresh")));
    assert_eq!(diary.auth().current_session(), Some(signed_in.clone()));
    assert_eq!(store.load().await.unwrap(), Some(signed_in));
}

#[tokio::test]
async fn test_sign_in_envelope_error() {
    let server = MockServer::start().await;

    // application failures arrive with HTTP 200
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 999,
            "message": "비밀번호가 일치하지 않습니다.",
            "data": null
        })))
        .mount(&server)
        .await;

    let diary = client_with_store(&server, Arc::new(MemorySessionStore::new()));
    let result = diary.auth().sign_in("kong@example.com", "wrong").await;

    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 999);
            assert_eq!(message, "비밀번호가 일치하지 않습니다.");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(!diary.auth().is_logged_in());
}

#[tokio::test]
async fn test_sign_in_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 400,
            "message": "이메일 형식이 올바르지 않습니다.",
            "data": null
        })))
        .mount(&server)
        .await;

    let diary = client_with_store(&server, Arc::new(MemorySessionStore::new()));
    let err = diary.auth().sign_in("kong", "pw").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_sign_up_does_not_sign_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/user/signup"))
        .and(body_json(json!({
            "email": "new@example.com",
            "password": "pw",
            "nickname": "새콩"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "message": "회원가입이 성공적으로 완료되었습니다.",
            "data": {"id": "12", "email": "new@example.com", "nickname": "새콩", "password": "hash"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let diary = client_with_store(&server, Arc::new(MemorySessionStore::new()));
    let user = diary
        .auth()
        .sign_up("new@example.com", "pw", "새콩")
        .await
        .unwrap();

    assert_eq!(user.id, 12);
    assert_eq!(user.nickname, "새콩");
    assert!(!diary.auth().is_logged_in());
}

#[tokio::test]
async fn test_refresh_sends_raw_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(header("content-type", "text/plain"))
        .and(body_string("refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "message": "토큰 재발급 성공",
            "data": {"accessToken": "renewed"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let diary = client_with_store(&server, store.clone());
    diary
        .auth()
        .set_session(session("stale", Some("refresh")))
        .await
        .unwrap();

    let renewed = diary.auth().refresh_session().await.unwrap();
    assert_eq!(renewed, session("renewed", Some("refresh")));
    assert_eq!(store.load().await.unwrap(), Some(renewed));
}

#[tokio::test]
async fn test_failed_refresh_discards_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 999,
            "message": "유효하지 않은 리프레시 토큰입니다.",
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let diary = client_with_store(&server, store.clone());
    diary
        .auth()
        .set_session(session("stale", Some("revoked")))
        .await
        .unwrap();

    let result = diary.auth().refresh_session().await;
    assert!(matches!(result, Err(Error::SessionExpired)));
    assert!(!diary.auth().is_logged_in());
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_refresh_without_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let diary = client_with_store(&server, Arc::new(MemorySessionStore::new()));
    diary.auth().set_session(session("stale", None)).await.unwrap();

    let result = diary.auth().refresh_session().await;
    assert!(matches!(result, Err(Error::SessionExpired)));
    assert!(!diary.auth().is_logged_in());
}

#[tokio::test]
async fn test_sign_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .and(header("authorization", "Bearer access"))
        .and(body_json(json!({"email": "kong@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "message": "로그아웃 성공",
            "data": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::with_session(session("access", Some("refresh"))));
    let diary = client_with_store(&server, store.clone());
    diary.auth().restore_session().await.unwrap();

    diary.auth().sign_out().await.unwrap();
    assert!(!diary.auth().is_logged_in());
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sign_out_clears_session_when_backend_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let diary = client_with_store(&server, store.clone());
    diary
        .auth()
        .set_session(session("access", Some("refresh")))
        .await
        .unwrap();

    let err = diary.auth().sign_out().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(!diary.auth().is_logged_in());
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sign_out_requires_session() {
    let server = MockServer::start().await;
    let diary = client_with_store(&server, Arc::new(MemorySessionStore::new()));
    assert!(matches!(
        diary.auth().sign_out().await,
        Err(Error::NotLoggedIn)
    ));
}

#[tokio::test]
async fn test_restore_flat_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(
        &path,
        r#"{"id": 7, "email": "kong@example.com", "nickname": "콩이", "token": "access", "refreshToken": "refresh"}"#,
    )
    .unwrap();

    let server = MockServer::start().await;
    let options = ClientOptions::default().with_session_path(&path);
    let config = DiaryConfig::new(&server.uri()).unwrap().with_options(options);
    let diary = KongDiary::with_config(config);

    let restored = diary.auth().restore_session().await.unwrap();
    assert_eq!(restored, Some(session("access", Some("refresh"))));
    assert!(diary.auth().is_logged_in());

    // written back in the nested shape
    diary
        .auth()
        .set_session(session("next", Some("refresh")))
        .await
        .unwrap();
    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored["user"]["nickname"], "콩이");
    assert_eq!(stored["accessToken"], "next");

    let reread = FileSessionStore::new(&path).load().await.unwrap();
    assert_eq!(reread, Some(session("next", Some("refresh"))));
}

#[tokio::test]
async fn test_session_not_persisted_when_disabled() {
    let server = MockServer::start().await;
    let store = Arc::new(MemorySessionStore::new());
    let options = ClientOptions::default().with_persist_session(false);
    let config = DiaryConfig::new(&server.uri()).unwrap().with_options(options);
    let diary = KongDiary::with_store(config, store.clone());

    diary
        .auth()
        .set_session(session("access", None))
        .await
        .unwrap();
    assert!(diary.auth().is_logged_in());
    assert!(store.load().await.unwrap().is_none());
}
