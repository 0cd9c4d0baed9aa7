#![allow(dead_code)]
use std::collections::HashMap;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use server::{build_router, ServerState};

pub const PASSWORD: &str = "S3curePass!";

pub fn test_auth_config() -> configs::AuthConfig {
    configs::AuthConfig { jwt_secret: "test-secret".into(), ..configs::AuthConfig::default() }
}

/// Router over in-memory repositories; clones share the same data.
pub fn app() -> Router {
    build_router(ServerState::in_memory(&test_auth_config()), server::routes::default_cors())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub raw: Vec<u8>,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }
}

/// A browser stand-in that keeps cookies between requests.
pub struct Client {
    app: Router,
    cookies: HashMap<String, String>,
    bearer: Option<String>,
}

impl Client {
    pub fn new(app: Router) -> Self {
        Self { app, cookies: HashMap::new(), bearer: None }
    }

    pub fn with_bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }

    /// Send `value` as cookie `name`, e.g. to replay a stale session.
    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    pub async fn request(&mut self, method: Method, uri: &str, content_type: Option<&str>, body: String) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(token) = &self.bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = builder.body(Body::from(body)).unwrap();
        let resp = self.app.clone().oneshot(req).await.unwrap();

        for value in resp.headers().get_all(header::SET_COOKIE) {
            self.store_cookie(value.to_str().unwrap());
        }
        let status = resp.status();
        let headers = resp.headers().clone();
        let raw = to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec();
        let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);
        TestResponse { status, headers, raw, body }
    }

    fn store_cookie(&mut self, set_cookie: &str) {
        let pair = set_cookie.split(';').next().unwrap_or_default();
        let Some((name, value)) = pair.split_once('=') else { return };
        let removed = value.is_empty() || set_cookie.contains("Max-Age=0");
        if removed {
            self.cookies.remove(name.trim());
        } else {
            self.cookies.insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, String::new()).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, String::new()).await
    }

    pub async fn form(&mut self, method: Method, uri: &str, body: &str) -> TestResponse {
        self.request(method, uri, Some("application/x-www-form-urlencoded"), body.to_string()).await
    }

    pub async fn json(&mut self, method: Method, uri: &str, body: Value) -> TestResponse {
        self.request(method, uri, Some("application/json"), body.to_string()).await
    }

    /// GET the redirect target of `resp`.
    pub async fn follow(&mut self, resp: &TestResponse) -> TestResponse {
        assert_eq!(resp.status, StatusCode::FOUND, "expected a redirect, got {}", resp.text());
        let location = resp.location().expect("redirect without location").to_string();
        self.get(&location).await
    }

    pub async fn sign_up(&mut self, email: &str) -> TestResponse {
        let body = format!("email={email}&password={PASSWORD}&password_confirmation={PASSWORD}");
        self.form(Method::POST, "/users", &body).await
    }

    /// Ids currently listed on the index page, newest first.
    pub async fn listed_ids(&mut self) -> Vec<i64> {
        let page = self.get("/").await;
        assert_eq!(page.status, StatusCode::OK);
        page.body["refuelings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect()
    }
}

/// Signed-in client on a shared app.
pub async fn signed_in(app: &Router, email: &str) -> Client {
    let mut client = Client::new(app.clone());
    let resp = client.sign_up(email).await;
    assert_eq!(resp.status, StatusCode::FOUND, "sign up failed: {}", resp.text());
    client
}
