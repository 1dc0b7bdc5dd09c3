use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::{
    config::ServerConfig,
    error::{Result, VidlensError},
    media,
    session::UploadSession,
    transport::{AnalysisRequester, ChunkTransport, HttpTransport},
    types::AnalysisResult,
    upload::upload_video,
};

/// Run the whole pipeline for one file: validate, chunk-upload, then request
/// the analysis under the session's upload id.
pub async fn analyze_video(
    config: &ServerConfig,
    video_path: &Path,
    chunk_size: u64,
    cancel: &CancellationToken,
) -> Result<AnalysisResult> {
    if !media::is_video(video_path) {
        return Err(VidlensError::NotAVideo {
            path: video_path.to_path_buf(),
        });
    }

    let transport = HttpTransport::new(config.clone());
    run_session(&transport, video_path, chunk_size, cancel).await
}

/// Upload every chunk of the file, then issue exactly one analysis request
/// carrying the session's upload id.
///
/// The analysis request is only reached when every chunk was acknowledged;
/// an aborted upload surfaces its own error instead. Cancelling the token
/// stops the session between chunks and before the analysis call.
pub async fn run_session<T>(
    transport: &T,
    video_path: &Path,
    chunk_size: u64,
    cancel: &CancellationToken,
) -> Result<AnalysisResult>
where
    T: ChunkTransport + AnalysisRequester,
{
    let file_size = tokio::fs::metadata(video_path).await?.len();
    let session = UploadSession::with_chunk_size(file_size, chunk_size);

    tracing::info!(
        upload_id = %session.upload_id,
        file_size,
        total_chunks = session.total_chunks,
        "starting upload session"
    );

    upload_video(transport, &session, video_path, cancel).await?;

    if cancel.is_cancelled() {
        return Err(VidlensError::Cancelled);
    }

    transport.request_analysis(&session.upload_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ChunkMeta;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Chunk { index: u64, upload_id: String },
        Analysis { upload_id: String },
    }

    struct RecordingServer {
        calls: Mutex<Vec<Call>>,
        // Chunk index that fails on every attempt.
        fail_chunk: Option<u64>,
    }

    impl RecordingServer {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_chunk: None,
            }
        }

        fn failing_chunk(index: u64) -> Self {
            Self {
                fail_chunk: Some(index),
                ..Self::new()
            }
        }

        fn analysis_calls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter_map(|call| match call {
                    Call::Analysis { upload_id } => Some(upload_id.clone()),
                    Call::Chunk { .. } => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl ChunkTransport for RecordingServer {
        async fn send_chunk(&self, meta: &ChunkMeta, _bytes: Vec<u8>) -> Result<()> {
            if self.fail_chunk == Some(meta.chunk_index) {
                return Err(VidlensError::AnalysisFailed {
                    reason: "injected".into(),
                });
            }
            self.calls.lock().unwrap().push(Call::Chunk {
                index: meta.chunk_index,
                upload_id: meta.upload_id.clone(),
            });
            Ok(())
        }
    }

    #[async_trait]
    impl AnalysisRequester for RecordingServer {
        async fn request_analysis(&self, upload_id: &str) -> Result<AnalysisResult> {
            self.calls.lock().unwrap().push(Call::Analysis {
                upload_id: upload_id.to_string(),
            });
            Ok(AnalysisResult { text: "OK".into() })
        }
    }

    fn temp_video(size: usize) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&vec![0xcdu8; size]).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn exactly_one_analysis_request_follows_the_chunks() {
        let (_dir, path) = temp_video(2500);
        let server = RecordingServer::new();

        let result = run_session(&server, &path, 1000, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.text, "OK");

        let calls = server.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        let chunk_id = match &calls[0] {
            Call::Chunk { index: 0, upload_id } => upload_id.clone(),
            other => panic!("unexpected first call: {other:?}"),
        };
        // All chunks precede the analysis call and share its upload id.
        assert_eq!(
            *calls.last().unwrap(),
            Call::Analysis {
                upload_id: chunk_id.clone()
            }
        );
        for call in calls.iter().take(3) {
            match call {
                Call::Chunk { upload_id, .. } => assert_eq!(*upload_id, chunk_id),
                other => panic!("analysis issued before upload finished: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn aborted_upload_never_requests_analysis() {
        let (_dir, path) = temp_video(2500);
        let server = RecordingServer::failing_chunk(1);

        let err = run_session(&server, &path, 1000, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, VidlensError::UploadFailed { .. }));
        assert!(server.analysis_calls().is_empty());
    }

    #[tokio::test]
    async fn cancelled_session_never_requests_analysis() {
        let (_dir, path) = temp_video(2500);
        let server = RecordingServer::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = run_session(&server, &path, 1000, &cancel).await.unwrap_err();

        assert!(matches!(err, VidlensError::Cancelled));
        assert!(server.analysis_calls().is_empty());
    }
}
