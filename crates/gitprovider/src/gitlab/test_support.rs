//! Fixtures shared by the GitLab unit tests.

use std::sync::Arc;

use serde_json::{Value, json};

use super::client::GitLabClient;
use crate::http::{HttpResponse, MockTransport};
use crate::platform::ClientOptions;
use crate::retry::RetryConfig;

pub const DOMAIN: &str = "gitlab.example.com";
pub const API: &str = "https://gitlab.example.com/api/v4";

pub fn test_options() -> ClientOptions {
    ClientOptions::default()
        .with_domain(DOMAIN)
        .with_retry(RetryConfig::disabled())
}

pub fn client_with(mock: &MockTransport, options: ClientOptions) -> GitLabClient {
    GitLabClient::new_with_transport("test-token", options, Arc::new(mock.clone()))
}

pub fn client(mock: &MockTransport) -> GitLabClient {
    client_with(mock, test_options())
}

pub fn response(status: u16, headers: &[(&str, &str)], body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        body: body.as_bytes().to_vec(),
    }
}

pub fn project_json(id: u64, namespace: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "path": name,
        "path_with_namespace": format!("{namespace}/{name}"),
        "description": "Demo project",
        "default_branch": "main",
        "visibility": "private",
        "namespace": {
            "id": 5,
            "name": namespace,
            "path": namespace,
            "full_path": namespace,
            "kind": "group"
        },
        "web_url": format!("https://{DOMAIN}/{namespace}/{name}"),
        "ssh_url_to_repo": format!("git@{DOMAIN}:{namespace}/{name}.git"),
        "http_url_to_repo": format!("https://{DOMAIN}/{namespace}/{name}.git"),
        "shared_with_groups": [],
        "created_at": "2024-01-01T00:00:00Z",
        "last_activity_at": "2024-01-02T00:00:00Z"
    })
}

pub fn group_json(id: u64, full_path: &str) -> Value {
    let name = full_path.rsplit('/').next().unwrap_or(full_path);
    json!({
        "id": id,
        "name": name,
        "path": name,
        "full_path": full_path,
        "description": format!("{name} group"),
        "visibility": "private"
    })
}

pub fn deploy_key_json(id: u64, title: &str, key: &str, can_push: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "key": key,
        "can_push": can_push,
        "created_at": "2024-01-01T00:00:00Z"
    })
}

pub fn commit_json(sha: &str, message: &str) -> Value {
    json!({
        "id": sha,
        "short_id": &sha[..sha.len().min(8)],
        "title": message,
        "message": message,
        "author_name": "Octo",
        "created_at": "2024-01-03T00:00:00Z",
        "web_url": format!("https://{DOMAIN}/acme/demo/-/commit/{sha}"),
        "parent_ids": []
    })
}
