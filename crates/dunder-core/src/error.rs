/// Why a single request to the agent backend produced no usable reply.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("empty message")]
    EmptyUtterance,
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response (HTTP {status}): {source}")]
    InvalidBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Api(String),
    #[error("request task failed: {0}")]
    Task(String),
}

/// Why a submission was refused before any request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("message is blank")]
    Blank,
    #[error("a request is already in flight")]
    Busy,
}
