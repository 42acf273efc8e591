//! `gitlab` crate client served by the [`HttpTransport`] chain.
//!
//! Endpoint builders and pagination come from `gitlab::api`; every request
//! they produce goes through retry and the conditional cache like any other.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use gitlab::api::{ApiError, AsyncClient, BodyError, Endpoint, Pageable, RestClient};
use http::Method;
use serde::Serialize;
use url::Url;

use super::error::GitLabError;
use crate::http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// REST client handed to `query_async`.
///
/// Non-2xx answers come back as [`ApiError::Client`] wrapping a classified
/// [`GitLabError`], so callers never inspect the crate's own error shapes.
pub(crate) struct GitLabRest {
    transport: Arc<dyn HttpTransport>,
    api_base: String,
    token: String,
}

impl GitLabRest {
    pub(crate) fn new(transport: Arc<dyn HttpTransport>, api_base: String, token: &str) -> Self {
        Self {
            transport,
            api_base,
            token: token.to_string(),
        }
    }

    pub(crate) fn api_base(&self) -> &str {
        &self.api_base
    }

    fn to_request(
        &self,
        request: http::request::Builder,
        body: Vec<u8>,
    ) -> Result<HttpRequest, GitLabError> {
        let (parts, body) = request
            .body(body)
            .map_err(|e| GitLabError::Config(e.to_string()))?
            .into_parts();

        let method = match parts.method.as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            other => {
                return Err(GitLabError::Config(format!("unsupported HTTP method {other}")));
            }
        };

        // An empty query still leaves a trailing `?` after the crate appends parameters.
        let uri = parts.uri.to_string();
        let mut request = HttpRequest::new(method, uri.strip_suffix('?').unwrap_or(&uri));
        for (name, value) in &parts.headers {
            if let Ok(value) = value.to_str() {
                request.set_header(name.as_str(), value);
            }
        }
        request.set_header("Accept", "application/json");
        request.set_header("Authorization", format!("Bearer {}", self.token));
        request.body = body;
        Ok(request)
    }
}

impl RestClient for GitLabRest {
    type Error = GitLabError;

    fn rest_endpoint(&self, endpoint: &str) -> Result<Url, ApiError<Self::Error>> {
        let url = format!("{}/{}", self.api_base, endpoint.trim_start_matches('/'));
        Url::parse(&url).map_err(|e| {
            ApiError::client(GitLabError::Config(format!("invalid endpoint {url}: {e}")))
        })
    }
}

#[async_trait]
impl AsyncClient for GitLabRest {
    async fn rest_async(
        &self,
        request: http::request::Builder,
        body: Vec<u8>,
    ) -> Result<http::Response<Bytes>, ApiError<Self::Error>> {
        let request = self.to_request(request, body).map_err(ApiError::client)?;
        let resource = resource_name(
            request
                .url
                .strip_prefix(self.api_base.as_str())
                .unwrap_or(&request.url),
        );

        tracing::debug!(method = request.method.as_str(), url = %request.url, "GitLab request");
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ApiError::client(GitLabError::Http(e)))?;

        if !response.is_success() {
            tracing::debug!(
                status = response.status,
                resource = %resource,
                "GitLab request failed"
            );
            return Err(ApiError::client(GitLabError::from_response(
                response.status,
                &resource,
                &response.body,
            )));
        }
        to_http_response(response).map_err(ApiError::client)
    }
}

fn to_http_response(response: HttpResponse) -> Result<http::Response<Bytes>, GitLabError> {
    let HttpResponse {
        status,
        headers,
        body,
    } = response;
    headers
        .iter()
        .fold(http::Response::builder().status(status), |b, (k, v)| {
            b.header(k.as_str(), v.as_str())
        })
        .body(Bytes::from(body))
        .map_err(|e| GitLabError::Http(HttpError::Transport(e.to_string())))
}

/// Readable resource name for error messages: query dropped, path decoded.
pub(crate) fn resource_name(path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    urlencoding::decode(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// An API path, optionally with a query string, and an optional JSON body.
///
/// Covers the calls `gitlab::api` has no builder for, and the writes, whose
/// bodies are the typed request structs in [`super::types`].
#[derive(Debug, Clone)]
pub(crate) struct JsonEndpoint {
    method: Method,
    path: String,
    body: Option<Vec<u8>>,
}

impl JsonEndpoint {
    pub(crate) fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.trim_start_matches('/').to_string(),
            body: None,
        }
    }

    pub(crate) fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn with_json<B: Serialize + ?Sized>(
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Self, GitLabError> {
        Ok(Self {
            body: Some(serde_json::to_vec(body)?),
            ..Self::new(method, path)
        })
    }
}

impl Endpoint for JsonEndpoint {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn endpoint(&self) -> Cow<'static, str> {
        self.path.clone().into()
    }

    fn body(&self) -> Result<Option<(&'static str, Vec<u8>)>, BodyError> {
        Ok(self.body.clone().map(|body| ("application/json", body)))
    }
}

impl Pageable for JsonEndpoint {}
