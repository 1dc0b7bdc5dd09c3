use std::path::Path;

use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, SeekFrom},
};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Result, VidlensError},
    session::{Chunk, UploadSession},
    transport::{ChunkMeta, ChunkTransport},
};

/// Total attempts per chunk before the session is aborted.
pub const MAX_CHUNK_ATTEMPTS: u32 = 3;

/// Send every chunk of `video_path` through `transport`, strictly in index
/// order, each awaited to completion before the next begins.
///
/// A chunk that keeps failing after bounded retries aborts the whole session;
/// the analysis request must never be issued for a partially stored file.
/// Cancellation is observed between chunks.
pub async fn upload_video(
    transport: &dyn ChunkTransport,
    session: &UploadSession,
    video_path: &Path,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut file = File::open(video_path).await?;

    for chunk in session.chunks() {
        if cancel.is_cancelled() {
            return Err(VidlensError::Cancelled);
        }

        let bytes = read_chunk(&mut file, &chunk).await?;
        let meta = ChunkMeta::for_chunk(session, &chunk);
        send_with_retry(transport, &meta, bytes).await?;

        tracing::debug!(
            upload_id = %session.upload_id,
            chunk_index = chunk.index,
            total_chunks = session.total_chunks,
            "chunk sent"
        );
    }

    tracing::info!(
        upload_id = %session.upload_id,
        total_chunks = session.total_chunks,
        "upload complete"
    );

    Ok(())
}

async fn read_chunk(file: &mut File, chunk: &Chunk) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; chunk.len() as usize];
    file.seek(SeekFrom::Start(chunk.start)).await?;
    file.read_exact(&mut bytes).await?;
    Ok(bytes)
}

async fn send_with_retry(
    transport: &dyn ChunkTransport,
    meta: &ChunkMeta,
    bytes: Vec<u8>,
) -> Result<()> {
    let mut last_reason = String::new();

    for attempt in 1..=MAX_CHUNK_ATTEMPTS {
        match transport.send_chunk(meta, bytes.clone()).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::debug!(
                    chunk_index = meta.chunk_index,
                    attempt,
                    error = %e,
                    "chunk send failed"
                );
                last_reason = e.to_string();
            }
        }
    }

    Err(VidlensError::UploadFailed {
        chunk_index: meta.chunk_index,
        attempts: MAX_CHUNK_ATTEMPTS,
        reason: last_reason,
    })
}
