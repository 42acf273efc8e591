use async_trait::async_trait;
use thiserror::Error;

/// Methods the GitLab API is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the method may change server state.
    #[must_use]
    pub fn is_mutating(self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

/// Header list in wire order. Lookups ignore ASCII case.
pub type HttpHeaders = Vec<(String, String)>;

/// A fully buffered HTTP request.
///
/// The body is owned, so a request can be cloned and resent any number of
/// times by retrying layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a request with no headers and an empty body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// Replace any existing value for `name` and add the new one.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Lossy UTF-8 view of the body, for error messages and marker checks.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("http transport error: {0}")]
    Transport(String),

    /// The peer reset the connection. Retried by [`crate::retry::RetryTransport`].
    #[error("connection reset: {0}")]
    ConnectionReset(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("no mock response registered for {method} {url}")]
    NoMockResponse { method: String, url: String },
}

impl HttpError {
    /// Whether this error is expected to clear up on its own.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, HttpError::ConnectionReset(_))
    }
}

/// Transport boundary for all HTTP I/O.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        (**self).send(request).await
    }
}

/// Get the first header value matching `name` (case-insensitive).
#[must_use]
pub fn header_get<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

pub mod reqwest_transport {
    use super::*;

    use std::error::Error as StdError;
    use std::time::Duration as StdDuration;

    /// Last-resort text marker, used only when the io error kind was lost.
    const CONNECTION_RESET_TEXT: &str = "connection reset by peer";

    /// A real HTTP transport backed by reqwest.
    #[derive(Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }

        pub fn with_timeout(timeout: StdDuration, user_agent: &str) -> Result<Self, HttpError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(user_agent)
                .build()
                .map_err(|e| HttpError::Transport(e.to_string()))?;
            Ok(Self { client })
        }
    }

    /// Map a reqwest error onto the transport taxonomy.
    ///
    /// Walks the source chain looking for an `io::Error` so a reset is
    /// recognised by kind rather than by message.
    pub(crate) fn classify(err: &reqwest::Error) -> HttpError {
        let msg = err.to_string();
        if err.is_timeout() {
            return HttpError::Timeout(msg);
        }

        let mut source: Option<&(dyn StdError + 'static)> = err.source();
        while let Some(cause) = source {
            if let Some(io) = cause.downcast_ref::<std::io::Error>()
                && io.kind() == std::io::ErrorKind::ConnectionReset
            {
                return HttpError::ConnectionReset(msg);
            }
            if cause.to_string().contains(CONNECTION_RESET_TEXT) {
                return HttpError::ConnectionReset(msg);
            }
            source = cause.source();
        }

        if msg.contains(CONNECTION_RESET_TEXT) {
            HttpError::ConnectionReset(msg)
        } else {
            HttpError::Transport(msg)
        }
    }

    impl From<HttpMethod> for reqwest::Method {
        fn from(method: HttpMethod) -> Self {
            match method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Delete => reqwest::Method::DELETE,
            }
        }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let HttpRequest {
                method,
                url,
                headers,
                body,
            } = request;

            let builder = headers
                .iter()
                .fold(self.client.request(method.into(), &url), |b, (k, v)| {
                    b.header(k.as_str(), v.as_str())
                });
            let builder = if body.is_empty() { builder } else { builder.body(body) };

            let resp = builder.send().await.map_err(|e| classify(&e))?;
            let status = resp.status().as_u16();
            // Non-ASCII header values are kept as empty strings.
            let headers: HttpHeaders = resp
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            let body = resp.bytes().await.map_err(|e| classify(&e))?.to_vec();

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
mod mock {
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Scripted transport for unit tests.
    ///
    /// Responses are queued per method and URL and handed out in order. Every
    /// request is recorded so tests can assert on what was sent.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        inner: Arc<Mutex<MockTransportInner>>,
    }

    #[derive(Default)]
    struct MockTransportInner {
        routes: HashMap<(HttpMethod, String), VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Vec<HttpRequest>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a response for a method + URL.
        ///
        /// If multiple responses are registered for the same key, they are returned
        /// in FIFO order.
        pub fn push_response(
            &self,
            method: HttpMethod,
            url: impl Into<String>,
            response: HttpResponse,
        ) {
            self.push(method, url, Ok(response));
        }

        /// Register a transport failure for a method + URL.
        pub fn push_error(&self, method: HttpMethod, url: impl Into<String>, error: HttpError) {
            self.push(method, url, Err(error));
        }

        /// Register a JSON response with the given status.
        pub fn push_json(
            &self,
            method: HttpMethod,
            url: impl Into<String>,
            status: u16,
            body: serde_json::Value,
        ) {
            self.push_response(
                method,
                url,
                HttpResponse {
                    status,
                    headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                    body: body.to_string().into_bytes(),
                },
            );
        }

        fn push(
            &self,
            method: HttpMethod,
            url: impl Into<String>,
            result: Result<HttpResponse, HttpError>,
        ) {
            let mut inner = self
                .inner
                .lock()
                .expect("mock transport lock should not be poisoned");
            inner
                .routes
                .entry((method, route_key(&url.into())))
                .or_default()
                .push_back(result);
        }

        #[must_use]
        pub fn requests(&self) -> Vec<HttpRequest> {
            let inner = self
                .inner
                .lock()
                .expect("mock transport lock should not be poisoned");
            inner.requests.clone()
        }

        /// Requests that were not plain reads.
        #[must_use]
        pub fn mutating_requests(&self) -> Vec<HttpRequest> {
            self.requests()
                .into_iter()
                .filter(|r| r.method.is_mutating())
                .collect()
        }
    }

    /// Routes match regardless of query parameter order.
    fn route_key(url: &str) -> String {
        match url.split_once('?') {
            Some((path, "")) => path.to_string(),
            Some((path, query)) => {
                let mut pairs: Vec<&str> = query.split('&').collect();
                pairs.sort_unstable();
                format!("{path}?{}", pairs.join("&"))
            }
            None => url.to_string(),
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let mut inner = self
                .inner
                .lock()
                .expect("mock transport lock should not be poisoned");

            let key = (request.method, route_key(&request.url));
            inner.requests.push(request);

            match inner.routes.get_mut(&key).and_then(|q| q.pop_front()) {
                Some(result) => result,
                None => Err(HttpError::NoMockResponse {
                    method: key.0.as_str().to_string(),
                    url: key.1,
                }),
            }
        }
    }
}

#[cfg(test)]
pub use mock::MockTransport;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_get_is_case_insensitive_and_returns_first_match() {
        let headers: HttpHeaders = vec![
            ("ETag".to_string(), "W/\"abc\"".to_string()),
            ("etag".to_string(), "W/\"def\"".to_string()),
        ];
        assert_eq!(header_get(&headers, "etag"), Some("W/\"abc\""));
        assert_eq!(header_get(&headers, "ETAG"), Some("W/\"abc\""));
        assert_eq!(header_get(&headers, "missing"), None);
    }

    #[test]
    fn http_method_as_str_matches_expected_values() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
        assert!(!HttpMethod::Get.is_mutating());
        assert!(HttpMethod::Delete.is_mutating());
    }

    #[test]
    fn set_header_replaces_existing_value() {
        let mut req = HttpRequest::new(HttpMethod::Get, "https://example.com");
        req.set_header("If-None-Match", "\"a\"");
        req.set_header("if-none-match", "\"b\"");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("IF-NONE-MATCH"), Some("\"b\""));
    }

    #[test]
    fn only_connection_resets_are_transient() {
        assert!(HttpError::ConnectionReset("reset".into()).is_transient());
        assert!(!HttpError::Transport("dns".into()).is_transient());
        assert!(!HttpError::Timeout("slow".into()).is_transient());
    }

    #[tokio::test]
    async fn mock_transport_returns_registered_response_and_records_request() {
        let transport = MockTransport::new();
        let url = "https://example.com/api";

        transport.push_response(
            HttpMethod::Get,
            url,
            HttpResponse {
                status: 200,
                headers: vec![("X-Test".to_string(), "ok".to_string())],
                body: b"hello".to_vec(),
            },
        );

        let req = HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: Vec::new(),
        };
        let resp = transport.send(req.clone()).await.expect("mock response");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("x-test"), Some("ok"));
        assert_eq!(resp.body_text(), "hello");

        assert_eq!(transport.requests(), vec![req]);
    }

    #[tokio::test]
    async fn mock_transport_replays_queued_errors() {
        let transport = MockTransport::new();
        let url = "https://example.com/flaky";
        transport.push_error(
            HttpMethod::Get,
            url,
            HttpError::ConnectionReset("read: connection reset by peer".into()),
        );

        let err = transport
            .send(HttpRequest::new(HttpMethod::Get, url))
            .await
            .expect_err("queued error");
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn mock_transport_matches_query_in_any_order() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            "https://example.com/items?page=1&per_page=100",
            HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: b"[]".to_vec(),
            },
        );

        let req = HttpRequest::new(
            HttpMethod::Get,
            "https://example.com/items?per_page=100&page=1",
        );
        let resp = transport.send(req).await.expect("mock response");
        assert_eq!(resp.status, 200);
        assert_eq!(
            transport.requests()[0].url,
            "https://example.com/items?per_page=100&page=1"
        );
    }

    #[tokio::test]
    async fn mock_transport_errors_when_no_response_is_registered() {
        let transport = MockTransport::new();
        let req = HttpRequest::new(HttpMethod::Get, "https://example.com/missing");

        let err = transport
            .send(req)
            .await
            .expect_err("missing mock should error");
        match err {
            HttpError::NoMockResponse { method, url } => {
                assert_eq!(method, "GET");
                assert_eq!(url, "https://example.com/missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn reqwest_transport_send_returns_transport_error_for_invalid_url() {
        let transport = reqwest_transport::ReqwestTransport::new(reqwest::Client::new());
        let req = HttpRequest::new(HttpMethod::Get, "not a url");

        let err = transport.send(req).await.expect_err("expected error");
        assert!(matches!(err, HttpError::Transport(_)));
    }
}
