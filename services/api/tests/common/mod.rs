//! Shared setup for the router tests: in-memory store, a cheap hasher and a
//! scripted summary generator.

#![allow(dead_code)]

use api_lib::adapters::FileParser;
use api_lib::config::Config;
use api_lib::web::{router, state::AppState};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use juris_resumo_core::domain::{SummaryKind, SummarySize};
use juris_resumo_core::ports::{
    CredentialHasher, DocumentTextExtractor, KeyValueStore, PortError, PortResult, ProviderError,
    SummaryGenerator,
};
use juris_resumo_core::store::MemoryStore;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@admin.com";
pub const ADMIN_PASSWORD: &str = "admin";
pub const CASE_NUMBER: &str = "0001234-56.2024.8.26.0100";

pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> PortResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash == format!("plain:{password}")
    }
}

pub struct ScriptedGenerator;

#[async_trait]
impl SummaryGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        text: &str,
        kind: SummaryKind,
        _size: SummarySize,
    ) -> Result<String, ProviderError> {
        Ok(match kind {
            SummaryKind::Technical => format!(
                "**Número do Processo:** {CASE_NUMBER}\n\n**Partes:** Autor x Réu\n\n**Resumo:** {text}"
            ),
            SummaryKind::Simplified => {
                "O juiz decidiu a favor do cliente e o processo segue para a fase final.".to_string()
            }
        })
    }
}

/// Reads and writes like `MemoryStore`, but every delete fails.
#[derive(Default)]
pub struct UndeletableStore {
    inner: MemoryStore,
}

#[async_trait]
impl KeyValueStore for UndeletableStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, _key: &str) -> PortResult<()> {
        Err(PortError::Unexpected("disk I/O error".to_string()))
    }
}

pub fn config() -> Config {
    Config::from_lookup(|_| None).expect("default config")
}

pub async fn app_with(generator: Arc<dyn SummaryGenerator>) -> Router {
    app_on(Arc::new(MemoryStore::new()), generator).await
}

pub async fn app_on(kv: Arc<dyn KeyValueStore>, generator: Arc<dyn SummaryGenerator>) -> Router {
    let extractor: Arc<dyn DocumentTextExtractor> = Arc::new(FileParser::new());
    let state = Arc::new(AppState::new(
        Arc::new(config()),
        kv,
        Arc::new(PlainHasher),
        generator,
        extractor,
    ));
    state.auth.init_admin().await.expect("seed admin");
    router(state)
}

pub async fn app() -> Router {
    app_with(Arc::new(ScriptedGenerator)).await
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("utf-8 body")
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body")
        .to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

fn with_token(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    with_token(Request::builder().method(method).uri(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    with_token(Request::builder().method(method).uri(uri), token)
        .body(Body::empty())
        .expect("request")
}

pub fn multipart_request(
    uri: &str,
    token: Option<&str>,
    file_name: &str,
    mime_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let boundary = "juris-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    with_token(Request::builder().method("POST").uri(uri), token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request")
}

pub async fn register(app: &Router, email: &str, password: &str) -> TestResponse {
    send(
        app,
        json_request(
            "POST",
            "/auth/register",
            None,
            serde_json::json!({ "email": email, "password": password, "confirmPassword": password }),
        ),
    )
    .await
}

/// Logs in and returns the session token.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    response.json()["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

/// Registers a user, approves it as admin and returns a fresh session token.
pub async fn approved_user(app: &Router, email: &str) -> String {
    let created = register(app, email, "segredo1").await;
    assert_eq!(created.status, StatusCode::CREATED);
    let user_id = created.json()["id"].as_str().expect("user id").to_string();

    let admin = login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let approved = send(
        app,
        json_request(
            "PUT",
            &format!("/admin/users/{user_id}/approval"),
            Some(&admin),
            serde_json::json!({ "isApproved": true }),
        ),
    )
    .await;
    assert_eq!(approved.status, StatusCode::NO_CONTENT);

    login(app, email, "segredo1").await
}
