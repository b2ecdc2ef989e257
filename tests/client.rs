mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fintrack::auth::Auth;
use fintrack::client::resources::Collection;
use fintrack::client::{ClientOptions, RequestError, LOGOUT_PATH, REFRESH_PATH};
use fintrack::types::finance::ExpenseCreate;
use fintrack::types::token::{LoginRequest, RegisterRequest};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

fn count_clears(client: &fintrack::client::Client) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let count_cb = count.clone();
    client.session().set_tokens_cleared_callback(move || {
        count_cb.fetch_add(1, Ordering::SeqCst);
    });
    count
}

#[tokio::test]
async fn login_persists_tokens() {
    let server = MockServer::start().await;
    let (token, exp) = mint_token(3600);

    Mock::given(method("POST"))
        .and(path("/auth/users/login"))
        .and(body_json(json!({"email": "ana@example.com", "password": "s3cret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": token,
            "refreshToken": "3f7c1e52-opaque",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    assert!(!client.is_authenticated());

    client
        .login(&LoginRequest {
            email: String::from("ana@example.com"),
            password: String::from("s3cret"),
        })
        .await
        .unwrap();

    let tokens = client.session().get_tokens().unwrap().unwrap();
    assert_eq!(tokens.token, token);
    assert_eq!(tokens.refresh_token, "3f7c1e52-opaque");
    assert_eq!(tokens.expires_at, (exp * 1000) as u64);
    assert!(client.is_authenticated());
}

#[tokio::test]
async fn valid_token_is_attached() {
    let server = MockServer::start().await;
    let (token, exp) = mint_token(3600);

    Mock::given(method("GET"))
        .and(path("/auth/users/me"))
        .and(header("Authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &token, "refresh-1", exp);

    let user = client.get_user_info().await.unwrap();
    assert_eq!(user.email, "ana@example.com");
}

#[tokio::test]
async fn no_session_sends_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    let err = client.get_user_info().await.unwrap_err();
    assert!(err.is_unauthorized());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn concurrent_expired_requests_refresh_once() {
    const REQUESTS: usize = 8;

    let server = MockServer::start().await;
    let (expired, expired_exp) = mint_token(-60);
    let (fresh, fresh_exp) = mint_token(3600);

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": fresh, "refreshToken": "refresh-2"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/users/me"))
        .and(header("Authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_json()))
        .expect(REQUESTS as u64)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &expired, "refresh-1", expired_exp);

    let mut handles = Vec::with_capacity(REQUESTS);
    for _ in 0..REQUESTS {
        let client = client.clone();
        handles.push(tokio::spawn(async move { client.get_user_info().await }));
    }
    for handle in handles {
        let user = handle.await.unwrap().unwrap();
        assert_eq!(user.id, 42);
    }

    let tokens = client.session().get_tokens().unwrap().unwrap();
    assert_eq!(tokens.token, fresh);
    assert_eq!(tokens.refresh_token, "refresh-2");
    assert_eq!(tokens.expires_at, (fresh_exp * 1000) as u64);
}

#[tokio::test]
async fn refresh_rejected_clears_session() {
    let server = MockServer::start().await;
    let (expired, exp) = mint_token(-60);

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid refresh token"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_json()))
        .expect(0)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &expired, "revoked", exp);
    let clears = count_clears(&client);

    let err = client.get_user_info().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.messages(), vec!["Session expired, please log in again."]);

    assert!(client.session().get_tokens().unwrap().is_none());
    assert_eq!(clears.load(Ordering::SeqCst), 1);
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn refresh_server_error_clears_session() {
    let server = MockServer::start().await;
    let (expired, exp) = mint_token(-60);

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &expired, "refresh-1", exp);
    let clears = count_clears(&client);

    let err = client.get_monthly_report().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(client.session().get_tokens().unwrap().is_none());
    assert_eq!(clears.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn refresh_without_token_pair_fails() {
    let server = MockServer::start().await;
    let (expired, exp) = mint_token(-60);

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &expired, "refresh-1", exp);

    let err = client.get_user_info().await.unwrap_err();
    assert!(matches!(err, RequestError::Refresh(_)));
    assert!(client.session().get_tokens().unwrap().is_none());
}

#[tokio::test]
async fn expired_without_refresh_token() {
    let server = MockServer::start().await;
    let (expired, exp) = mint_token(-60);

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &expired, "", exp);

    let err = client.get_user_info().await.unwrap_err();
    assert!(matches!(err, RequestError::NoRefreshToken));
    assert!(client.session().get_tokens().unwrap().is_none());
}

#[tokio::test]
async fn expired_with_refresh_token_is_authenticated() {
    let (expired, exp) = mint_token(-60);
    let client = new_client("http://127.0.0.1:9");
    store_tokens(&client, &expired, "refresh-1", exp);

    // The renewal is left to the next real request.
    assert!(client.is_authenticated());
    assert!(client.session().get_tokens().unwrap().is_some());
}

#[tokio::test]
async fn auth_endpoints_never_refresh() {
    let server = MockServer::start().await;
    let (expired, exp) = mint_token(-60);

    Mock::given(method("POST"))
        .and(path("/auth/users/register"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"message": "User registered"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &expired, "refresh-1", exp);

    let resp = client
        .register(&RegisterRequest {
            name: String::from("Ana"),
            email: String::from("ana@example.com"),
            password: String::from("s3cret"),
        })
        .await
        .unwrap();
    assert_eq!(resp.message.as_deref(), Some("User registered"));
    assert!(resp.token_pair().is_none());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn logout_clears_session_when_server_fails() {
    let server = MockServer::start().await;
    let (token, exp) = mint_token(3600);

    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .and(body_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &token, "refresh-1", exp);
    let clears = count_clears(&client);

    let err = client.logout().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(client.session().get_tokens().unwrap().is_none());
    assert_eq!(clears.load(Ordering::SeqCst), 1);
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn logout_without_session_skips_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    client.logout().await.unwrap();
}

#[tokio::test]
async fn mutation_retries_on_timeout() {
    let server = MockServer::start().await;
    let (token, exp) = mint_token(3600);

    Mock::given(method("DELETE"))
        .and(path("/auth/expenses/9"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(500)))
        .expect(2)
        .mount(&server)
        .await;

    let opts = ClientOptions {
        timeout: Duration::from_millis(100),
        ..test_options()
    };
    let client = new_client_with_options(&server.uri(), opts);
    store_tokens(&client, &token, "refresh-1", exp);

    let err = client.delete(Collection::Expenses, 9).await.unwrap_err();
    assert!(matches!(err, RequestError::Timeout));
    assert_eq!(
        err.messages(),
        vec!["The server took too long to respond, please try again."]
    );
}

#[tokio::test]
async fn mutation_surfaces_server_errors_without_retry() {
    let server = MockServer::start().await;
    let (token, exp) = mint_token(3600);

    Mock::given(method("POST"))
        .and(path("/auth/expenses"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["Amount must be positive", "Category not found"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &token, "refresh-1", exp);

    let err = client
        .create(
            Collection::Expenses,
            &ExpenseCreate {
                description: String::from("Coffee"),
                amount: -3.0,
                creation_date: String::from("2026-10-01"),
                category_name: String::from("Food"),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.messages(),
        vec!["Amount must be positive", "Category not found"]
    );
}

#[tokio::test]
async fn auth_state_follows_session() {
    let server = MockServer::start().await;
    let (token, _) = mint_token(3600);

    Mock::given(method("POST"))
        .and(path("/auth/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": token,
            "refreshToken": "refresh-1",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(LOGOUT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "bye"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    let auth = Auth::new(client.clone());
    assert!(!auth.check_auth_status().authenticated);

    let state = auth.login("ana@example.com", "s3cret").await.unwrap();
    assert!(state.authenticated);
    let user = state.user.unwrap();
    assert_eq!(user.id, USER_ID);
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(client.session().get_user_data().unwrap(), Some(user));

    // A clear from inside the pipeline flips the state.
    client.session().clear_all_tokens();
    assert!(!auth.is_authenticated());

    auth.login("ana@example.com", "s3cret").await.unwrap();
    assert!(auth.check_auth_status().authenticated);
    auth.logout().await;
    assert_eq!(auth.state(), Default::default());
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn check_auth_status_derives_user() {
    let (token, exp) = mint_token(3600);
    let client = new_client("http://127.0.0.1:9");
    store_tokens(&client, &token, "refresh-1", exp);

    let auth = Auth::new(client.clone());
    let state = auth.check_auth_status();
    assert!(state.authenticated);
    assert_eq!(state.token.as_deref(), Some(token.as_str()));
    assert_eq!(state.user.unwrap().id, USER_ID);
    assert!(client.session().get_user_data().unwrap().is_some());
}

#[tokio::test]
async fn waiting_past_refresh_wait_fails() {
    let server = MockServer::start().await;
    let (expired, exp) = mint_token(-60);
    let (fresh, _) = mint_token(3600);

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": fresh, "refreshToken": "refresh-2"}))
                .set_delay(Duration::from_millis(800)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/users/me"))
        .and(header("Authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_json()))
        .expect(1)
        .mount(&server)
        .await;

    let opts = ClientOptions {
        refresh_wait: Duration::from_millis(200),
        ..test_options()
    };
    let client = new_client_with_options(&server.uri(), opts);
    store_tokens(&client, &expired, "refresh-1", exp);

    let first = {
        let client = client.clone();
        tokio::spawn(async move { client.get_user_info().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = client.get_user_info().await.unwrap_err();
    assert!(matches!(err, RequestError::RefreshTimeout));
    assert_eq!(
        err.messages(),
        vec!["The server took too long to respond, please try again."]
    );

    // The refresh that held the lock still completes.
    first.await.unwrap().unwrap();
    assert_eq!(client.session().get_tokens().unwrap().unwrap().token, fresh);
}

#[tokio::test]
async fn manual_refresh_joins_inflight_refresh() {
    let server = MockServer::start().await;
    let (expired, exp) = mint_token(-60);
    let (fresh, _) = mint_token(3600);

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": fresh, "refreshToken": "refresh-2"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_info_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &expired, "refresh-1", exp);
    let auth = Auth::new(client.clone());

    let request = {
        let client = client.clone();
        tokio::spawn(async move { client.get_user_info().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(auth.refresh_session().await);
    let state = auth.state();
    assert!(state.authenticated);
    assert_eq!(state.token.as_deref(), Some(fresh.as_str()));

    request.await.unwrap().unwrap();
}

#[tokio::test]
async fn manual_refresh_renews_valid_token() {
    let server = MockServer::start().await;
    let (token, exp) = mint_token(3600);
    let (fresh, _) = mint_token(7200);

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": fresh, "refreshToken": "refresh-2"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &token, "refresh-1", exp);

    let data = client.refresh_session().await.unwrap();
    assert_eq!(data.token, fresh);
    assert_eq!(data.refresh_token, "refresh-2");
}

#[tokio::test]
async fn manual_refresh_without_refresh_token() {
    let server = MockServer::start().await;
    let (token, exp) = mint_token(3600);

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = new_client(&server.uri());
    store_tokens(&client, &token, "", exp);
    let auth = Auth::new(client.clone());

    assert!(!auth.refresh_session().await);
    assert!(client.session().get_tokens().unwrap().is_some());
}
