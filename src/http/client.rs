//! HTTP client with built-in retry logic and error handling.

use log::debug;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Url};

use super::error::RequestError;
use super::request::{RequestBody, RequestOptions, merge_headers};
use super::response::Payload;
use crate::retry::{RetryPolicy, with_retry};

/// HTTP client bound to an API base URL, retrying transient failures.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    policy: RetryPolicy,
}

impl HttpClient {
    pub fn new(client: Client, base_url: Url, policy: RetryPolicy) -> Self {
        Self {
            client,
            base_url,
            policy,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Resolves a path relative to the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Performs one logical API call.
    ///
    /// Client errors (4xx) fail after a single attempt. Server and network
    /// failures are retried according to the client's [`RetryPolicy`].
    #[tracing::instrument(skip(self, options))]
    pub async fn request(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Payload, RequestError> {
        let url = self.url_for(path);
        let headers = merge_headers(&options.headers, options.body.as_ref());
        let operation_name = format!("{} {}", options.method, path);

        debug!("{} {}...", options.method, url);

        with_retry(
            &self.policy,
            &operation_name,
            || self.send_once(&url, options, &headers),
            RequestError::is_retryable,
        )
        .await
    }

    /// Single attempt without retry.
    async fn send_once(
        &self,
        url: &str,
        options: &RequestOptions,
        headers: &HeaderMap,
    ) -> Result<Payload, RequestError> {
        let mut builder = self
            .client
            .request(options.method.clone(), url)
            .headers(headers.clone());

        builder = match &options.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(form)) => {
                let form = form.to_form().map_err(RequestError::invalid_request)?;
                builder.multipart(form)
            }
            None => builder,
        };

        let response = builder.send().await.map_err(RequestError::from_transport)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(RequestError::network)?;
        let payload = Payload::parse(content_type.as_deref(), body);

        if !status.is_success() {
            return Err(RequestError::from_response(status, payload));
        }

        debug!("{} {} -> {}", options.method, url, status);
        Ok(payload)
    }
}
