#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use fintrack::client::{Client, ClientOptions};
use fintrack::session::Session;
use fintrack::storage::{MemoryStorage, UnionStorage};
use fintrack::time::current_timestamp;
use fintrack::types::token::TokenData;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

pub const USER_ID: &str = "42";

/// A signed JWT for user 42 that expires `ttl_secs` from now (negative for the past).
pub fn mint_token(ttl_secs: i64) -> (String, i64) {
    let now = current_timestamp() as i64;
    let exp = now + ttl_secs;
    let claims = json!({
        "sub": USER_ID,
        "iat": now,
        "exp": exp,
    });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"fintrack-test-secret"),
    )
    .unwrap();
    (token, exp)
}

pub fn test_options() -> ClientOptions {
    ClientOptions {
        timeout: Duration::from_secs(2),
        retry_delay: Duration::from_millis(10),
        ..Default::default()
    }
}

pub fn new_client(uri: &str) -> Arc<Client> {
    new_client_with_options(uri, test_options())
}

pub fn new_client_with_options(uri: &str, opts: ClientOptions) -> Arc<Client> {
    let session = Arc::new(Session::new(UnionStorage::Memory(MemoryStorage::new())));
    Arc::new(Client::new(uri, session, opts).unwrap())
}

pub fn store_tokens(client: &Client, token: &str, refresh_token: &str, exp: i64) {
    client
        .session()
        .save_tokens(&TokenData {
            token: token.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at: (exp * 1000) as u64,
        })
        .unwrap();
}

pub fn page_json(content: serde_json::Value) -> serde_json::Value {
    let total = content.as_array().map(|a| a.len()).unwrap_or(0);
    json!({
        "content": content,
        "page": {
            "size": 20,
            "number": 0,
            "totalElements": total,
            "totalPages": 1,
        }
    })
}

pub fn user_info_json() -> serde_json::Value {
    json!({
        "id": 42,
        "name": "Ana",
        "email": "ana@example.com",
        "enable": true,
        "createdAt": "2026-01-10T08:00:00"
    })
}

pub fn debt_json(id: u64, current_amount: f64) -> serde_json::Value {
    json!({
        "id": id,
        "description": format!("Loan {id}"),
        "initialAmount": 1000.0,
        "currentAmount": current_amount,
        "interestRate": 3.5,
        "type": "LOAN",
        "creditorName": "Bank",
        "startDate": "2026-01-01",
        "dueDate": "2027-01-01",
        "status": "ACTIVE",
        "createdAt": "2026-01-01T10:00:00",
        "paymentProgress": 10.0
    })
}

pub fn goal_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Goal {id}"),
        "targetAmount": 5000.0,
        "currentAmount": 1200.0,
        "startDate": "2026-01-01",
        "targetDate": "2026-12-31",
        "status": "IN_PROGRESS",
        "progressPercentage": 24.0
    })
}

pub fn deposit_json(id: u64, goal_id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "amount": 150.0,
        "createdAt": "2026-03-02T09:30:00",
        "goalId": goal_id
    })
}
