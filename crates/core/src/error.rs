use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VidlensError {
    #[error("Not a video file: {path}")]
    NotAVideo { path: PathBuf },

    #[error("Chunk {chunk_index} failed after {attempts} attempts: {reason}")]
    UploadFailed {
        chunk_index: u64,
        attempts: u32,
        reason: String,
    },

    #[error("Analysis request failed: {reason}")]
    AnalysisFailed { reason: String },

    #[error("Preview failed for {video_path}: {reason}")]
    PreviewFailed {
        video_path: PathBuf,
        reason: String,
    },

    #[error("Upload session cancelled")]
    Cancelled,

    #[error("Missing server address: {env_var} environment variable is not set")]
    MissingServer { env_var: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, VidlensError>;
