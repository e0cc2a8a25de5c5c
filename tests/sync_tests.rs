//! Integration tests for sign-in and the sync engine.

mod common;

use common::{MockTransport, SIGNIN, SYNC, TOKEN, connected, ids, serve_account, sync_response};
use serde_json::{Value, json};
use std::sync::Arc;
use ticksync::{Client, ClientError, Filter, Method, ProtocolError, Snapshot, TaskRecord};

// =============================================================================
// Sign-in
// =============================================================================

#[tokio::test]
async fn test_connect_signs_in_then_syncs_with_cookie() {
    let mock = MockTransport::new();
    serve_account(&mock);

    let client = Client::connect(mock.clone(), "testuser", "testpass").await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);

    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].path, SIGNIN);
    assert_eq!(
        requests[0].body,
        Some(json!({"username": "testuser", "password": "testpass"}))
    );
    assert_eq!(requests[0].token, None);

    assert_eq!(requests[1].method, Method::Get);
    assert_eq!(requests[1].path, SYNC);
    assert_eq!(requests[1].token.as_deref(), Some(TOKEN));

    assert_eq!(client.tasks().await.len(), 3);
}

#[tokio::test]
async fn test_signin_without_token_is_protocol_error() {
    let mock = MockTransport::new();
    mock.once(Method::Post, SIGNIN, 200, json!({"faketoken": "testtoken"}));

    let client = Client::new(mock.clone());
    let err = client.signin("testuser", "testpass").await.unwrap_err();

    assert!(matches!(err, ClientError::Protocol(ProtocolError::MissingToken { .. })));
    assert!(err.to_string().contains("no token found in the response, full response json is"));
}

#[tokio::test]
async fn test_signin_server_error_is_transport_error() {
    let mock = MockTransport::new();
    mock.once(Method::Post, SIGNIN, 404, json!({}));

    let client = Client::new(mock.clone());
    let err = client.signin("testuser", "testpass").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_connect_fails_when_sync_fails() {
    let mock = MockTransport::new();
    mock.on(Method::Post, SIGNIN, 200, json!({"token": TOKEN}));
    mock.once(Method::Get, SYNC, 404, json!({}));

    let result = Client::connect(mock.clone(), "testuser", "testpass").await;
    assert!(result.is_err());
    assert!(result.err().unwrap().is_transport());
}

#[tokio::test]
async fn test_with_token_skips_signin() {
    let mock = MockTransport::new();
    mock.on(Method::Get, SYNC, 200, sync_response());

    let client = Client::with_token(mock.clone(), "existing");
    client.sync().await.unwrap();

    assert_eq!(mock.count(Method::Post, SIGNIN), 0);
    assert_eq!(mock.requests()[0].token.as_deref(), Some("existing"));
}

// =============================================================================
// Sync
// =============================================================================

#[tokio::test]
async fn test_cache_starts_empty() {
    let client = Client::new(MockTransport::new());

    assert!(client.tasks().await.is_empty());
    assert!(client.tags().await.is_empty());
    assert!(client.project_index().await.is_empty());
    assert_eq!(client.inbox_id().await, "");
}

#[tokio::test]
async fn test_sync_populates_cache() {
    let (client, _mock) = connected().await;

    assert_eq!(client.inbox_id().await, "testinboxid");
    assert_eq!(client.project_groups().await.len(), 2);
    assert_eq!(client.tags().await, vec!["a", "b", "c"]);

    let index = client.project_index().await;
    assert_eq!(index.resolve("inbox"), Some("testinboxid"));
    assert_eq!(index.resolve("pname1"), Some("pid1"));
    assert_eq!(index.resolve_name("pid2"), "pname2");

    let tasks = client.tasks().await;
    assert_eq!(ids(&tasks), vec!["1", "2", "3"]);
    assert_eq!(tasks[0].project_name, "pname1");
    assert_eq!(tasks[2].project_name, "pname2");
}

#[tokio::test]
async fn test_sync_replaces_cache_wholesale() {
    let (client, mock) = connected().await;

    mock.once(
        Method::Get,
        SYNC,
        200,
        json!({
            "inboxId": "testinboxid",
            "projectProfiles": [{"name": "pname3", "id": "pid3"}],
            "syncTaskBean": {"update": [{"id": "9", "title": "9", "projectId": "pid3"}]},
            "tags": [{"name": "z"}]
        }),
    );
    client.sync().await.unwrap();

    let tasks = client.tasks().await;
    assert_eq!(ids(&tasks), vec!["9"]);
    assert_eq!(tasks[0].project_name, "pname3");
    assert_eq!(client.tags().await, vec!["z"]);
    assert!(client.project_groups().await.is_empty());
    assert_eq!(client.resolve_project("pname1").await, None);
    assert_eq!(client.resolve_project("inbox").await.as_deref(), Some("testinboxid"));
}

#[tokio::test]
async fn test_sync_transport_error_keeps_cache() {
    let (client, mock) = connected().await;
    let before = client.snapshot().await;

    mock.once(Method::Get, SYNC, 500, json!({"error": "boom"}));
    let err = client.sync().await.unwrap_err();

    assert!(err.is_transport());
    assert_eq!(client.snapshot().await, before);
}

#[tokio::test]
async fn test_sync_malformed_record_is_protocol_error_and_keeps_cache() {
    let (client, mock) = connected().await;
    let before = client.snapshot().await;

    mock.once(
        Method::Get,
        SYNC,
        200,
        json!({
            "inboxId": "testinboxid",
            "syncTaskBean": {"update": [
                {"id": "1", "title": "ok"},
                {"id": "2", "title": "bad", "startDate": "not a date"}
            ]}
        }),
    );
    let err = client.sync().await.unwrap_err();

    match err {
        ClientError::Protocol(ProtocolError::MalformedTask { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected MalformedTask, got {:?}", other),
    }
    assert_eq!(client.snapshot().await, before);
}

#[tokio::test]
async fn test_sync_non_json_body_is_protocol_error() {
    let (client, mock) = connected().await;

    mock.once_raw(Method::Get, SYNC, 200, "<html>maintenance</html>");
    let err = client.sync().await.unwrap_err();

    assert!(err.is_protocol());
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_sync_server_project_named_inbox_keeps_alias() {
    let (client, mock) = connected().await;

    mock.once(
        Method::Get,
        SYNC,
        200,
        json!({
            "inboxId": "testinboxid",
            "projectProfiles": [{"name": "inbox", "id": "impostor"}],
            "syncTaskBean": {"update": [
                {"id": "1", "projectId": "testinboxid"},
                {"id": "2", "projectId": "impostor"}
            ]}
        }),
    );
    client.sync().await.unwrap();

    assert_eq!(client.resolve_project("inbox").await.as_deref(), Some("testinboxid"));
    let tasks = client.tasks().await;
    assert_eq!(tasks[0].project_name, "inbox");
    assert_eq!(tasks[1].project_name, "inbox");
    assert_eq!(tasks[1].project_id, "impostor");
}

#[tokio::test]
async fn test_task_lookup_does_not_sync() {
    let (client, mock) = connected().await;

    assert_eq!(client.task("2").await.map(|t| t.title), Some("2".to_string()));
    assert!(client.task("missing").await.is_none());
    assert!(mock.requests().is_empty());
}

// =============================================================================
// Concurrency
// =============================================================================

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_client_is_send_and_sync() {
    assert_send_sync::<Client>();
    assert_send_sync::<Arc<Client>>();
}

fn account(project: &str, pid: &str, task_ids: &[&str], tag: &str) -> Value {
    let tasks: Vec<Value> = task_ids
        .iter()
        .map(|id| json!({"id": id, "title": id, "projectId": pid, "tags": [tag]}))
        .collect();
    json!({
        "inboxId": "testinboxid",
        "projectProfiles": [{"name": project, "id": pid}],
        "syncTaskBean": {"update": tasks},
        "tags": [{"name": tag}]
    })
}

/// Which of the two accounts a set of tasks came from, if exactly one.
fn origin(tasks: &[TaskRecord]) -> Option<&'static str> {
    let all = |project: &str, want: &[&str]| {
        ids(tasks) == want && tasks.iter().all(|t| t.project_name == project)
    };
    if all("alpha", &["a1", "a2"]) {
        Some("alpha")
    } else if all("beta", &["b1", "b2", "b3"]) {
        Some("beta")
    } else {
        None
    }
}

fn snapshot_origin(snapshot: &Snapshot) -> Option<&'static str> {
    let from = origin(&snapshot.tasks)?;
    let consistent = snapshot.tags == vec![if from == "alpha" { "ta" } else { "tb" }]
        && snapshot.projects.resolve(from).is_some();
    consistent.then_some(from)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_syncs_always_leave_a_whole_snapshot() {
    let (client, mock) = connected().await;
    let alpha = account("alpha", "pa", &["a1", "a2"], "ta");
    let beta = account("beta", "pb", &["b1", "b2", "b3"], "tb");

    const ROUNDS: usize = 16;
    for i in 0..ROUNDS * 2 {
        let body = if i % 2 == 0 { alpha.clone() } else { beta.clone() };
        mock.once(Method::Get, SYNC, 200, body);
    }

    let client = Arc::new(client);
    let mut handles = Vec::new();
    for i in 0..ROUNDS {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                client.search(&Filter::new()).await.map(|tasks| origin(&tasks))
            } else {
                client.sync().await?;
                Ok::<_, ClientError>(snapshot_origin(&client.snapshot().await))
            }
        }));
    }

    for handle in handles {
        let from = handle.await.unwrap().unwrap();
        assert!(from.is_some(), "observed a mixed snapshot");
    }

    assert_eq!(mock.count(Method::Get, SYNC), ROUNDS);
    assert!(snapshot_origin(&client.snapshot().await).is_some());
}
