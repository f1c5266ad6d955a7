use thiserror::Error;

/// Failure of a single classification call. Never fatal: the session logs it
/// and treats the tick as a sensing gap.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("classifier not loaded")]
    NotLoaded,
}

/// Setup-time failures of the gesture session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("gesture model failed to load: {0}")]
    ModelLoad(String),
    #[error("could not spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
