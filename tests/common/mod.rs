#![allow(dead_code)]

use release_stats::error::{ReleaseStatsError, Result};
use release_stats::github::{Endpoint, HttpClient, HttpResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Clone)]
enum Reply {
    Respond {
        status: u16,
        headers: Vec<(String, String)>,
        body: String,
    },
    Fail(String),
}

/// Scripted stand-in for the GitHub API. Unscripted endpoints answer 404.
#[derive(Default)]
pub struct FakeGitHub {
    replies: HashMap<String, Reply>,
    requests: Mutex<Vec<(String, Option<String>)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &str, status: u16, body: Value) -> Self {
        self.replies.insert(
            path.to_string(),
            Reply::Respond {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn respond_raw(mut self, path: &str, status: u16, body: &str) -> Self {
        self.replies.insert(
            path.to_string(),
            Reply::Respond {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn respond_with_headers(
        mut self,
        path: &str,
        status: u16,
        headers: &[(&str, &str)],
        body: Value,
    ) -> Self {
        self.replies.insert(
            path.to_string(),
            Reply::Respond {
                status,
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn fail(mut self, path: &str, message: &str) -> Self {
        self.replies.insert(path.to_string(), Reply::Fail(message.to_string()));
        self
    }

    /// Requested paths, in issue order.
    pub fn requested(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn tokens_sent(&self) -> Vec<Option<String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, token)| token.clone())
            .collect()
    }

    /// Highest number of requests that were outstanding at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn was_requested(&self, path: &str) -> bool {
        self.requested().iter().any(|p| p == path)
    }
}

impl HttpClient for FakeGitHub {
    async fn request(&self, endpoint: &Endpoint, token: Option<&str>) -> Result<HttpResponse> {
        let path = endpoint.to_string();
        self.requests
            .lock()
            .unwrap()
            .push((path.clone(), token.map(str::to_string)));

        let outstanding = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(outstanding, Ordering::SeqCst);

        // Let sibling requests interleave
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.replies.get(&path).cloned() {
            Some(Reply::Respond {
                status,
                headers,
                body,
            }) => {
                let mut header_map = HeaderMap::new();
                for (name, value) in headers {
                    header_map.insert(
                        HeaderName::from_bytes(name.as_bytes()).unwrap(),
                        HeaderValue::from_str(&value).unwrap(),
                    );
                }
                Ok(HttpResponse {
                    status: StatusCode::from_u16(status).unwrap(),
                    headers: header_map,
                    body,
                })
            }
            Some(Reply::Fail(message)) => Err(ReleaseStatsError::TransportError(message)),
            None => Ok(HttpResponse {
                status: StatusCode::NOT_FOUND,
                headers: HeaderMap::new(),
                body: json!({ "message": "Not Found" }).to_string(),
            }),
        }
    }
}

pub fn repo_json(name: &str, stars: u64) -> Value {
    json!({
        "name": name,
        "full_name": format!("alice/{}", name),
        "description": format!("{} description", name),
        "html_url": format!("https://github.com/alice/{}", name),
        "stargazers_count": stars,
        "forks_count": 1,
        "language": "Rust",
        "fork": false
    })
}

pub fn asset_json(name: &str, downloads: u64) -> Value {
    json!({
        "name": name,
        "download_count": downloads,
        "size": 2048,
        "created_at": "2024-03-01T12:00:00Z"
    })
}

pub fn release_json(tag: &str, name: Option<&str>, assets: Vec<Value>) -> Value {
    json!({
        "tag_name": tag,
        "name": name,
        "published_at": "2024-03-02T08:30:00Z",
        "prerelease": false,
        "draft": false,
        "assets": assets
    })
}

pub fn traffic_json(count: u64, uniques: u64) -> Value {
    json!({ "count": count, "uniques": uniques, "clones": [], "views": [] })
}

pub const ALICE_REPOS: &str = "/users/alice/repos?per_page=100&sort=updated";

pub fn releases_path(repo: &str) -> String {
    format!("/repos/alice/{}/releases?per_page=100", repo)
}

pub fn clones_path(repo: &str) -> String {
    format!("/repos/alice/{}/traffic/clones", repo)
}

pub fn views_path(repo: &str) -> String {
    format!("/repos/alice/{}/traffic/views", repo)
}

/// The two-repository account: "a" has no releases, "b" has 30 downloads.
pub fn alice() -> FakeGitHub {
    FakeGitHub::new()
        .respond_with_headers(
            ALICE_REPOS,
            200,
            &[
                ("x-ratelimit-remaining", "57"),
                ("x-ratelimit-limit", "60"),
                ("x-ratelimit-reset", "1700000000"),
            ],
            json!([repo_json("a", 12), repo_json("b", 2)]),
        )
        .respond(&releases_path("a"), 200, json!([]))
        .respond(
            &releases_path("b"),
            200,
            json!([release_json(
                "v1.0.0",
                None,
                vec![
                    asset_json("b-linux.tar.gz", 5),
                    asset_json("b-macos.tar.gz", 10),
                    asset_json("b-windows.zip", 15),
                ]
            )]),
        )
}
