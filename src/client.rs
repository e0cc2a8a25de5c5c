//! Session and synchronized cache.
//!
//! `Client` owns the session token and the snapshot of server state. `sync`
//! is the only writer of the snapshot; the repository, query and relation
//! operations live in their own modules as further `impl Client` blocks.

use crate::cache::Snapshot;
use crate::config::Config;
use crate::error::{ClientError, ProtocolError};
use crate::projects::ProjectIndex;
use crate::protocol::{SIGNIN_PATH, SYNC_PATH, SigninRequest, SigninResponse, SyncResponse};
use crate::transport::{HttpRequest, HttpTransport, Transport};
use crate::types::{ProjectGroup, TaskRecord};
use eyre::Context;
use log::{debug, info};
use serde::de::DeserializeOwned;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Client for the batch-sync API.
///
/// All operations take `&self`; the cache is behind a lock that is held only
/// while swapping in a new snapshot, never across a network call.
pub struct Client {
    transport: Box<dyn Transport>,
    token: RwLock<Option<String>>,
    cache: RwLock<Snapshot>,
}

impl Client {
    /// Create a client with no session and an empty cache.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            token: RwLock::new(None),
            cache: RwLock::new(Snapshot::default()),
        }
    }

    /// Create a client that reuses an existing session token.
    pub fn with_token(transport: impl Transport + 'static, token: impl Into<String>) -> Self {
        Self {
            transport: Box::new(transport),
            token: RwLock::new(Some(token.into())),
            cache: RwLock::new(Snapshot::default()),
        }
    }

    /// Sign in and perform the first sync.
    pub async fn connect(
        transport: impl Transport + 'static,
        username: &str,
        password: &str,
    ) -> Result<Self, ClientError> {
        let client = Self::new(transport);
        client.signin(username, password).await?;
        client.sync().await?;
        Ok(client)
    }

    /// Build an HTTP client from configuration, sign in and sync.
    pub async fn from_config(config: &Config) -> eyre::Result<Self> {
        let base_url = config.server.base_url()?;
        let transport = HttpTransport::new(&base_url, config.server.timeout(), &config.server.user_agent)
            .context("Failed to build HTTP client")?;
        let password = config.password()?;

        info!("Connecting to {} as {}", base_url, config.auth.username);
        Self::connect(transport, &config.auth.username, &password)
            .await
            .context("Failed to connect")
    }

    /// Exchange credentials for a session token.
    pub async fn signin(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let body = serde_json::to_value(SigninRequest { username, password })
            .map_err(|source| ProtocolError::Malformed { context: "signin", source })?;
        let raw = self.transport.exchange(HttpRequest::post(SIGNIN_PATH, body)).await?;

        let response: SigninResponse = decode(&raw, "signin")?;
        if response.token.is_empty() {
            return Err(ProtocolError::MissingToken { body: raw }.into());
        }

        *self.token.write().await = Some(response.token);
        info!("Signed in as {}", username);
        Ok(())
    }

    /// Fetch full server state and replace the cache with it.
    ///
    /// Cost is proportional to total account state. On any error the previous
    /// snapshot stays in place.
    pub async fn sync(&self) -> Result<(), ClientError> {
        let raw = self.send(HttpRequest::get(SYNC_PATH)).await?;
        let response: SyncResponse = decode(&raw, "sync")?;
        let snapshot = Snapshot::from_sync(response)?;

        info!(
            "Synced {} projects, {} tasks, {} tags",
            snapshot.projects.len(),
            snapshot.tasks.len(),
            snapshot.tags.len()
        );
        *self.cache.write().await = snapshot;
        Ok(())
    }

    /// Send an authenticated request.
    pub(crate) async fn send(&self, request: HttpRequest) -> Result<String, ClientError> {
        let request = match self.token.read().await.as_ref() {
            Some(token) => request.with_token(token.clone()),
            None => request,
        };
        debug!("send: {} {}", request.method, request.path);
        Ok(self.transport.exchange(request).await?)
    }

    /// Borrow the current snapshot.
    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.cache.read().await
    }

    /// Copy of the current snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.read().await.clone()
    }

    pub async fn inbox_id(&self) -> String {
        self.read().await.inbox_id.clone()
    }

    pub async fn project_groups(&self) -> Vec<ProjectGroup> {
        self.read().await.project_groups.clone()
    }

    pub async fn project_index(&self) -> ProjectIndex {
        self.read().await.projects.clone()
    }

    /// Known tag vocabulary, in server order.
    pub async fn tags(&self) -> Vec<String> {
        self.read().await.tags.clone()
    }

    /// Cached tasks, in server order. Does not sync.
    pub async fn tasks(&self) -> Vec<TaskRecord> {
        self.read().await.tasks.clone()
    }

    /// Cached task by id. Does not sync.
    pub async fn task(&self, id: &str) -> Option<TaskRecord> {
        self.read().await.task(id).cloned()
    }

    /// Resolve a project name against the cached index.
    pub async fn resolve_project(&self, name: &str) -> Option<String> {
        self.read().await.projects.resolve(name).map(String::from)
    }

    /// Resolve a project id against the cached index; unknown ids give "".
    pub async fn project_name(&self, id: &str) -> String {
        self.read().await.projects.resolve_name(id).to_string()
    }

    /// Fill in a server-returned record's project name from the index.
    pub(crate) async fn backfill_project_name(&self, mut task: TaskRecord) -> TaskRecord {
        task.project_name = self.project_name(&task.project_id).await;
        task
    }
}

/// Decode a response body, mapping failures to a protocol error.
pub(crate) fn decode<T: DeserializeOwned>(raw: &str, context: &'static str) -> Result<T, ProtocolError> {
    serde_json::from_str(raw).map_err(|source| ProtocolError::Malformed { context, source })
}
