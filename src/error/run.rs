use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Expected {expected} worker completions, received {received}.")]
    MissingCompletions { expected: usize, received: usize },
    #[error("Expected {expected} worker results, received {received}.")]
    MissingResults { expected: usize, received: usize },
    #[error("Worker task failed: {source}")]
    WorkerJoin {
        #[source]
        source: tokio::task::JoinError,
    },
}
