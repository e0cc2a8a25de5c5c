//! Shared test infrastructure for ticksync integration tests.
//!
//! Provides a scripted in-memory transport and a canned account.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use ticksync::{Client, HttpRequest, Method, Transport, TransportError};

pub const TOKEN: &str = "testtoken";
pub const SYNC: &str = "/batch/check/0";
pub const SIGNIN: &str = "/user/signin";

struct Route {
    method: Method,
    path: String,
    status: u16,
    body: String,
    once: bool,
    used: bool,
}

#[derive(Default)]
struct MockState {
    routes: Vec<Route>,
    requests: Vec<HttpRequest>,
}

/// Transport that answers from scripted routes and records every request.
///
/// One-shot routes are consumed in registration order and take precedence
/// over persistent ones; among persistent routes the latest wins. Unmatched
/// requests get a 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(&self, method: Method, path: &str, status: u16, body: String, once: bool) {
        self.state.lock().unwrap().routes.push(Route {
            method,
            path: path.to_string(),
            status,
            body,
            once,
            used: false,
        });
    }

    /// Answer every matching request with this JSON.
    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.route(method, path, status, body.to_string(), false);
    }

    /// Answer the next matching request with this JSON.
    pub fn once(&self, method: Method, path: &str, status: u16, body: Value) {
        self.route(method, path, status, body.to_string(), true);
    }

    /// Answer the next matching request with a raw body.
    pub fn once_raw(&self, method: Method, path: &str, status: u16, body: &str) {
        self.route(method, path, status, body.to_string(), true);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// (method, path) of every recorded request, in order.
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.requests().into_iter().map(|r| (r.method, r.path)).collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn exchange(&self, request: HttpRequest) -> Result<String, TransportError> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        state.requests.push(request.clone());

        let matches = |r: &Route| r.method == request.method && r.path == request.path;
        let once = state.routes.iter().position(|r| r.once && !r.used && matches(r));
        let reply = match once {
            Some(i) => {
                let route = &mut state.routes[i];
                route.used = true;
                Some((route.status, route.body.clone()))
            }
            None => state
                .routes
                .iter()
                .rev()
                .find(|r| !r.once && matches(*r))
                .map(|r| (r.status, r.body.clone())),
        };

        match reply {
            Some((status, body)) if (200..300).contains(&status) => Ok(body),
            Some((status, body)) => Err(TransportError::Status { status, body }),
            None => Err(TransportError::Status {
                status: 404,
                body: format!("no route for {} {}", request.method, request.path),
            }),
        }
    }
}

/// The canned account: two projects, three tasks, three tags.
pub fn sync_response() -> Value {
    json!({
        "inboxId": "testinboxid",
        "projectGroups": [
            {"name": "pgname1", "id": "pgid1"},
            {"name": "pgname2", "id": "pgid2"}
        ],
        "projectProfiles": [
            {"name": "pname1", "id": "pid1"},
            {"name": "pname2", "id": "pid2"}
        ],
        "syncTaskBean": {
            "update": [
                {"id": "1", "title": "1", "projectId": "pid1", "tags": ["a", "b"],
                 "startDate": "2022-12-12T15:04:05.000+0000", "priority": 5},
                {"id": "2", "title": "2", "projectId": "pid1", "tags": ["b", "c"],
                 "startDate": "2022-12-13T15:04:05.000+0000", "priority": 0},
                {"id": "3", "title": "3", "projectId": "pid2", "tags": ["b", "c"],
                 "startDate": "2022-12-14T15:04:05.000+0000", "priority": 1}
            ]
        },
        "tags": [{"name": "a"}, {"name": "b"}, {"name": "c"}]
    })
}

/// Register sign-in and sync routes for the canned account.
pub fn serve_account(mock: &MockTransport) {
    mock.on(Method::Post, SIGNIN, 200, json!({"token": TOKEN}));
    mock.on(Method::Get, SYNC, 200, sync_response());
}

/// Connected client plus its transport, with the connect traffic cleared.
pub async fn connected() -> (Client, MockTransport) {
    let mock = MockTransport::new();
    serve_account(&mock);
    let client = Client::connect(mock.clone(), "testuser", "testpass")
        .await
        .expect("Failed to connect");
    mock.clear_requests();
    (client, mock)
}

/// Ids of the given tasks, in order.
pub fn ids(tasks: &[ticksync::TaskRecord]) -> Vec<&str> {
    tasks.iter().map(|t| t.id.as_str()).collect()
}
