//! GitLab API client creation and request plumbing.

use std::sync::Arc;

use gitlab::api::{self, AsyncQuery, Pagination};
use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::GitLabError;
use super::organizations::OrganizationsClient;
use super::repositories::{OrgRepositoriesClient, UserRepositoriesClient};
use super::rest::{GitLabRest, JsonEndpoint};
use super::types::GitLabUser;
use crate::cache::{CacheStats, CacheStore, CachingTransport};
use crate::http::HttpTransport;
use crate::http::reqwest_transport::ReqwestTransport;
use crate::platform::{self, ClientOptions, ProviderError, domain_url, host_of};
use crate::retry::{CacheHitCounter, RetryTransport};

/// Identifier reported by [`GitLabClient::provider_id`].
pub const PROVIDER_ID: &str = "gitlab";

/// GitLab API client.
///
/// Bound to one domain and one token for its whole lifetime. Cloning is
/// cheap; clones share the transport chain, cache and hit counter.
///
/// Requests are built with `gitlab::api` endpoints and sent by [`GitLabRest`]
/// over the retry and caching layers.
#[derive(Clone)]
pub struct GitLabClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    rest: GitLabRest,
    options: ClientOptions,
    counter: Arc<CacheHitCounter>,
    cache: Option<Arc<CacheStore>>,
}

impl GitLabClient {
    /// Create a client talking to `options.domain` over HTTPS.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = GitLabClient::new(&token, ClientOptions::default())?;
    /// ```
    pub fn new(token: &str, options: ClientOptions) -> platform::Result<Self> {
        let transport = ReqwestTransport::with_timeout(options.timeout, &options.user_agent)
            .map_err(|e| ProviderError::from(GitLabError::Config(e.to_string())))?;
        Ok(Self::new_with_transport(token, options, Arc::new(transport)))
    }

    /// Create a client on top of an arbitrary physical transport.
    ///
    /// The retry layer, and the conditional cache when enabled, are stacked
    /// on top of `transport`.
    pub fn new_with_transport(
        token: &str,
        options: ClientOptions,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let counter = Arc::new(CacheHitCounter::new());
        let cache = options
            .conditional_requests
            .then(|| Arc::new(CacheStore::new()));
        let transport: Arc<dyn HttpTransport> = match &cache {
            Some(store) => {
                let caching = CachingTransport::new(transport, Arc::clone(store));
                Arc::new(RetryTransport::new(
                    caching,
                    options.retry.clone(),
                    Arc::clone(&counter),
                ))
            }
            None => Arc::new(RetryTransport::new(
                transport,
                options.retry.clone(),
                Arc::clone(&counter),
            )),
        };

        let api_base = format!("{}/api/v4", domain_url(&options.domain));

        Self {
            inner: Arc::new(ClientInner {
                rest: GitLabRest::new(transport, api_base, token),
                options,
                counter,
                cache,
            }),
        }
    }

    pub fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    /// The domain this client is bound to, as configured.
    pub fn domain(&self) -> &str {
        &self.inner.options.domain
    }

    /// Base URL of the REST API, e.g. `https://gitlab.com/api/v4`.
    pub fn api_base(&self) -> &str {
        self.inner.rest.api_base()
    }

    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    /// Counter fed by responses served from the conditional cache.
    pub fn cache_hit_counter(&self) -> &Arc<CacheHitCounter> {
        &self.inner.counter
    }

    /// Hit/fetch totals of the conditional cache, if it is enabled.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.inner.cache.as_ref().map(|store| store.stats())
    }

    pub fn organizations(&self) -> OrganizationsClient {
        OrganizationsClient::new(self.clone())
    }

    pub fn org_repositories(&self) -> OrgRepositoriesClient {
        OrgRepositoriesClient::new(self.clone())
    }

    pub fn user_repositories(&self) -> UserRepositoriesClient {
        UserRepositoriesClient::new(self.clone())
    }

    /// The user the token belongs to.
    pub async fn current_user(&self) -> platform::Result<GitLabUser> {
        let endpoint = api::users::CurrentUser::builder()
            .build()
            .map_err(GitLabError::builder)?;
        Ok(self.query(endpoint).await?)
    }

    /// Fail unless `domain` is the host this client is bound to.
    ///
    /// Scheme, trailing slash and ASCII case are ignored.
    pub(crate) fn ensure_domain(&self, domain: &str) -> platform::Result<()> {
        if host_of(domain).eq_ignore_ascii_case(host_of(self.domain())) {
            Ok(())
        } else {
            Err(ProviderError::invalid_argument(format!(
                "{domain} is not served by this client (bound to {})",
                self.domain()
            )))
        }
    }

    /// Fail unless destructive calls were enabled for this client.
    pub(crate) fn ensure_destructive_allowed(&self, operation: &str) -> platform::Result<()> {
        if self.inner.options.destructive_calls {
            Ok(())
        } else {
            Err(ProviderError::DestructiveCallDisallowed {
                operation: operation.to_string(),
            })
        }
    }

    /// Run any `gitlab::api` query: an endpoint, `api::paged` or `api::ignore`.
    pub(crate) async fn query<Q, T>(&self, query: Q) -> Result<T, GitLabError>
    where
        Q: AsyncQuery<T, GitLabRest> + Send + Sync,
    {
        Ok(query.query_async(&self.inner.rest).await?)
    }

    /// Make an authenticated GET request.
    pub(crate) async fn get<T>(&self, path: &str) -> Result<T, GitLabError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.query(JsonEndpoint::get(path)).await
    }

    /// GET every page of a list endpoint.
    pub(crate) async fn get_paged<T>(&self, path: &str) -> Result<Vec<T>, GitLabError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.query(api::paged(JsonEndpoint::get(path), Pagination::All))
            .await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GitLabError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        self.query(JsonEndpoint::with_json(Method::POST, path, body)?)
            .await
    }

    /// POST where the response body is not needed.
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), GitLabError> {
        let endpoint = JsonEndpoint::with_json(Method::POST, path, body)?;
        self.query(api::ignore(endpoint)).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, GitLabError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        self.query(JsonEndpoint::with_json(Method::PUT, path, body)?)
            .await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), GitLabError> {
        self.query(api::ignore(JsonEndpoint::new(Method::DELETE, path)))
            .await
    }
}

/// Percent-encode a path or name for use as a single URL path segment.
pub(crate) fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::gitlab::GitLabMember;
    use crate::gitlab::test_support::{API, DOMAIN, client, client_with, response, test_options};
    use crate::http::{HttpMethod, MockTransport};

    #[test]
    fn test_gitlab_client_is_clone_send_sync() {
        fn assert_traits<T: Clone + Send + Sync>() {}
        assert_traits::<GitLabClient>();
    }

    #[test]
    fn test_api_base_from_domain() {
        let mock = MockTransport::new();
        let c = client_with(&mock, ClientOptions::default());
        assert_eq!(c.api_base(), "https://gitlab.com/api/v4");
        assert_eq!(c.provider_id(), "gitlab");

        let c = client_with(
            &mock,
            ClientOptions::default().with_domain("http://localhost:8080/"),
        );
        assert_eq!(c.api_base(), "http://localhost:8080/api/v4");
    }

    #[tokio::test]
    async fn test_requests_carry_bearer_token() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/user"),
            200,
            serde_json::json!({"id": 1, "username": "octo", "name": "Octo"}),
        );

        let user = client(&mock).current_user().await.unwrap();
        assert_eq!(user.username, "octo");

        let requests = mock.requests();
        assert_eq!(requests[0].header("Authorization"), Some("Bearer test-token"));
        assert_eq!(requests[0].header("Accept"), Some("application/json"));
    }

    fn members(ids: std::ops::RangeInclusive<u64>) -> String {
        let members: Vec<_> = ids
            .map(|id| json!({"id": id, "username": format!("user{id}"), "access_level": 30}))
            .collect();
        serde_json::Value::Array(members).to_string()
    }

    #[tokio::test]
    async fn test_get_paged_reads_until_short_page() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Get,
            format!("{API}/groups/5/members?per_page=100&page=1"),
            response(200, &[("x-next-page", "2")], &members(1..=100)),
        );
        mock.push_response(
            HttpMethod::Get,
            format!("{API}/groups/5/members?per_page=100&page=2"),
            response(200, &[("x-next-page", "")], &members(101..=101)),
        );

        let items: Vec<GitLabMember> = client(&mock)
            .get_paged("/groups/5/members")
            .await
            .unwrap();
        assert_eq!(items.len(), 101);
        assert_eq!(items[100].username, "user101");
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_writes_send_json_bodies() {
        let mock = MockTransport::new();
        mock.push_json(HttpMethod::Put, format!("{API}/projects/42"), 200, json!({"id": 42}));
        mock.push_response(
            HttpMethod::Delete,
            format!("{API}/projects/42"),
            response(202, &[], ""),
        );

        let c = client(&mock);
        let updated: serde_json::Value = c
            .put("/projects/42", &json!({"description": "new"}))
            .await
            .unwrap();
        assert_eq!(updated["id"], 42);
        c.delete("/projects/42").await.unwrap();

        let requests = mock.mutating_requests();
        assert_eq!(requests[0].header("Content-Type"), Some("application/json"));
        assert_eq!(requests[0].body, br#"{"description":"new"}"#);
        assert_eq!(requests[1].method, HttpMethod::Delete);
        assert!(requests[1].body.is_empty());
    }

    #[test]
    fn test_ensure_domain_compares_hosts() {
        let mock = MockTransport::new();
        let c = client(&mock);
        assert!(c.ensure_domain(DOMAIN).is_ok());
        assert!(c.ensure_domain("https://GitLab.Example.com/").is_ok());

        let err = c.ensure_domain("github.com").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidArgument { .. }));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_becomes_typed_error() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{API}/projects/acme%2Fmissing"),
            404,
            serde_json::json!({"message": "404 Project Not Found"}),
        );

        let err: ProviderError = client(&mock)
            .get::<serde_json::Value>("/projects/acme%2Fmissing")
            .await
            .unwrap_err()
            .into();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("acme/missing"));
    }

    #[tokio::test]
    async fn test_conditional_requests_count_cache_hits() {
        let mock = MockTransport::new();
        let url = format!("{API}/groups/acme");
        mock.push_response(
            HttpMethod::Get,
            url.clone(),
            response(200, &[("ETag", "\"g1\"")], r#"{"id":5,"name":"acme","full_path":"acme"}"#),
        );
        mock.push_response(HttpMethod::Get, url.clone(), response(304, &[], ""));

        let c = client_with(&mock, test_options().with_conditional_requests(true));
        let counter = c.cache_hit_counter().clone();

        let (_, first) = counter
            .count_hits_for(|| c.get::<serde_json::Value>("/groups/acme"))
            .await;
        let (second_body, second) = counter
            .count_hits_for(|| c.get::<serde_json::Value>("/groups/acme"))
            .await;

        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(second_body.unwrap()["name"], "acme");
        assert_eq!(mock.requests()[1].header("If-None-Match"), Some("\"g1\""));
        assert_eq!(c.cache_stats(), Some(CacheStats::new(1, 1)));
    }

    #[tokio::test]
    async fn test_no_conditional_headers_when_cache_disabled() {
        let mock = MockTransport::new();
        let url = format!("{API}/groups/acme");
        for _ in 0..2 {
            mock.push_response(
                HttpMethod::Get,
                url.clone(),
                response(200, &[("ETag", "\"g1\"")], r#"{"id":5}"#),
            );
        }

        let c = client(&mock);
        c.get::<serde_json::Value>("/groups/acme").await.unwrap();
        c.get::<serde_json::Value>("/groups/acme").await.unwrap();

        assert!(mock.requests()[1].header("If-None-Match").is_none());
        assert!(c.cache_stats().is_none());
    }

    #[test]
    fn test_destructive_calls_are_gated() {
        let mock = MockTransport::new();
        let err = client(&mock)
            .ensure_destructive_allowed("delete acme/demo")
            .unwrap_err();
        assert!(matches!(err, ProviderError::DestructiveCallDisallowed { .. }));

        let allowed = client_with(&mock, test_options().with_destructive_calls(true));
        assert!(allowed.ensure_destructive_allowed("delete acme/demo").is_ok());
    }
}
