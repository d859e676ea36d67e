use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("a resize listener needs a running tokio runtime")]
    NoRuntime,
}
