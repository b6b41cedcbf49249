//! Calls to the remote analysis API.
//!
//! Every endpoint goes through [`HttpClient::request`], so all of them share
//! the retry policy and error typing. Results are opaque [`Payload`]s; a
//! failed call carries a [`RequestError`](crate::http::RequestError) that
//! callers recover with `downcast_ref`.

mod base_url;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use serde_json::json;
use std::path::Path;

use crate::http::{FormPayload, HttpClient, Payload, RequestOptions};
use crate::runtime::Runtime;
use crate::state::UserIdentity;

pub use base_url::{API_PREFIX, DEFAULT_ORIGIN, LOCAL_FALLBACK_PORT, is_local_host, resolve_base_url};

pub const REGISTER_PATH: &str = "register";
pub const ANALYZE_FILE_PATH: &str = "analyze";
pub const ANALYZE_TEXT_PATH: &str = "analyze-text";
pub const CHAT_PATH: &str = "chat";
pub const HEALTH_PATH: &str = "health";
pub const ADMIN_LOGIN_PATH: &str = "admin/login";

/// Header identifying the registered user to the server.
pub const USER_EMAIL_HEADER: &str = "user-email";

/// Who a request is made for, and in which language answers are wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub email: Option<String>,
    pub language: String,
}

/// A document to upload for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Reads a file, guessing its MIME type from the extension.
    pub fn from_path<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("Invalid file path {}", path.display()))?
            .to_string();

        let bytes = runtime.read(path)?;
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        debug!("Prepared upload {} ({}, {} bytes)", file_name, mime, bytes.len());

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn health_check(&self) -> Result<Payload>;
    async fn register_user(&self, user: &UserIdentity) -> Result<Payload>;
    async fn analyze_file(&self, upload: &FileUpload, caller: &Caller) -> Result<Payload>;
    async fn analyze_text(&self, text: &str, caller: &Caller) -> Result<Payload>;
    async fn chat(&self, query: &str, caller: &Caller) -> Result<Payload>;
    async fn admin_login(&self, username: &str, password: &str) -> Result<Payload>;
}

/// [`AnalysisApi`] over HTTP.
#[derive(Clone)]
pub struct VakeelApi {
    http: HttpClient,
}

impl VakeelApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub fn http_client(&self) -> &HttpClient {
        &self.http
    }

    async fn call(&self, path: &str, options: RequestOptions) -> Result<Payload> {
        Ok(self.http.request(path, &options).await?)
    }
}

/// Identifies a known caller to the server.
///
/// The analysis and chat handlers take the user id from `Authorization` and
/// answer 401 without it; `User-Email` carries the same id for the rest.
fn with_caller(options: RequestOptions, caller: &Caller) -> Result<RequestOptions> {
    match &caller.email {
        Some(email) => {
            let value = HeaderValue::from_str(email)
                .with_context(|| format!("Invalid email for request header: {}", email))?;
            Ok(options
                .header(AUTHORIZATION, value.clone())
                .header(HeaderName::from_static(USER_EMAIL_HEADER), value))
        }
        None => Ok(options),
    }
}

#[async_trait]
impl AnalysisApi for VakeelApi {
    #[tracing::instrument(skip(self))]
    async fn health_check(&self) -> Result<Payload> {
        self.call(HEALTH_PATH, RequestOptions::get()).await
    }

    #[tracing::instrument(skip(self, user))]
    async fn register_user(&self, user: &UserIdentity) -> Result<Payload> {
        let options = RequestOptions::post().json(json!({
            "name": user.name,
            "email": user.email,
        }));
        self.call(REGISTER_PATH, options).await
    }

    #[tracing::instrument(skip(self, upload, caller))]
    async fn analyze_file(&self, upload: &FileUpload, caller: &Caller) -> Result<Payload> {
        let form = FormPayload::new()
            .file(
                "file",
                upload.file_name.clone(),
                upload.mime.clone(),
                upload.bytes.clone(),
            )
            .text("language", caller.language.clone());
        let options = with_caller(RequestOptions::post().form(form), caller)?;
        self.call(ANALYZE_FILE_PATH, options).await
    }

    #[tracing::instrument(skip(self, text, caller))]
    async fn analyze_text(&self, text: &str, caller: &Caller) -> Result<Payload> {
        let options = RequestOptions::post().json(json!({
            "text": text,
            "language": caller.language,
        }));
        let options = with_caller(options, caller)?;
        self.call(ANALYZE_TEXT_PATH, options).await
    }

    #[tracing::instrument(skip(self, caller))]
    async fn chat(&self, query: &str, caller: &Caller) -> Result<Payload> {
        let options = RequestOptions::post().json(json!({
            "query": query,
            "language": caller.language,
        }));
        let options = with_caller(options, caller)?;
        self.call(CHAT_PATH, options).await
    }

    #[tracing::instrument(skip(self, password))]
    async fn admin_login(&self, username: &str, password: &str) -> Result<Payload> {
        let options = RequestOptions::post().json(json!({
            "username": username,
            "password": password,
        }));
        self.call(ADMIN_LOGIN_PATH, options).await
    }
}
