//! Error taxonomy for client operations.

use thiserror::Error;

/// Failure of the underlying HTTP exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl TransportError {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// The server answered, but not with what we expected.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("no token found in the response, full response json is {body}")]
    MissingToken { body: String },

    #[error("malformed {context} response: {source}")]
    Malformed {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed task record at index {index}: {source}")]
    MalformedTask {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Caller misuse, detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("the task has already been created with id={0}")]
    AlreadyCreated(String),

    #[error("the task has not been created, thus not deleted")]
    NotCreated,

    #[error("task Id is empty")]
    EmptyId,

    #[error("projectName {0} not found")]
    ProjectNotFound(String),

    #[error("the parent has not been created")]
    ParentNotCreated,

    #[error("the child has not been created")]
    ChildNotCreated,
}

/// The server accepted a compound operation but the follow-up sync disagrees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("task {id} not found after sync")]
    TaskMissingAfterSync { id: String },
}

/// Any error a client operation can return.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, ClientError::Protocol(_))
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, ClientError::Precondition(_))
    }

    /// True when the server may hold state the cache does not reflect.
    pub fn is_consistency(&self) -> bool {
        matches!(self, ClientError::Consistency(_))
    }

    /// The precondition that failed, if that is what this is.
    pub fn precondition(&self) -> Option<&PreconditionError> {
        match self {
            ClientError::Precondition(e) => Some(e),
            _ => None,
        }
    }
}
