pub mod analysis;
pub mod config;
pub mod error;
pub mod media;
pub mod preview;
pub mod report;
pub mod session;
pub mod transport;
pub mod types;
pub mod upload;
pub mod workflow;

pub use analysis::{FALLBACK_RESULT, parse_analysis, request_analysis};
pub use config::{SERVER_ENV_VAR, ServerConfig};
pub use error::{Result, VidlensError};
pub use media::{is_video, video_content_type};
pub use preview::{PreviewHandle, spawn_preview};
pub use report::{ANALYSIS_FILENAME, save_analysis};
pub use session::{Chunk, DEFAULT_CHUNK_SIZE, UploadSession};
pub use transport::{AnalysisRequester, ChunkMeta, ChunkTransport, HttpTransport};
pub use types::AnalysisResult;
pub use upload::{MAX_CHUNK_ATTEMPTS, upload_video};
pub use workflow::{analyze_video, run_session};
