use async_trait::async_trait;

use crate::{
    analysis,
    config::ServerConfig,
    error::Result,
    session::{Chunk, UploadSession},
    types::AnalysisResult,
};

/// Metadata accompanying one chunk on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMeta {
    pub upload_id: String,
    pub chunk_index: u64,
    pub total_chunks: u64,
}

impl ChunkMeta {
    pub fn for_chunk(session: &UploadSession, chunk: &Chunk) -> Self {
        Self {
            upload_id: session.upload_id.clone(),
            chunk_index: chunk.index,
            total_chunks: session.total_chunks,
        }
    }
}

/// Seam between the chunk loop and the wire. Tests substitute a recorder.
#[async_trait]
pub trait ChunkTransport: Send + Sync {
    async fn send_chunk(&self, meta: &ChunkMeta, bytes: Vec<u8>) -> Result<()>;
}

/// Seam for the analysis call, so the workflow can be exercised without a
/// live server.
#[async_trait]
pub trait AnalysisRequester: Send + Sync {
    async fn request_analysis(&self, upload_id: &str) -> Result<AnalysisResult>;
}

/// Sends chunks as multipart form POSTs to the analysis server.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ServerConfig,
}

impl HttpTransport {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl AnalysisRequester for HttpTransport {
    async fn request_analysis(&self, upload_id: &str) -> Result<AnalysisResult> {
        analysis::request_analysis(&self.client, &self.config, upload_id).await
    }
}

#[async_trait]
impl ChunkTransport for HttpTransport {
    async fn send_chunk(&self, meta: &ChunkMeta, bytes: Vec<u8>) -> Result<()> {
        // Integer fields are string-encoded, matching the server's form contract.
        let form = reqwest::multipart::Form::new()
            .part(
                "chunk",
                reqwest::multipart::Part::bytes(bytes).file_name("chunk"),
            )
            .text("upload_id", meta.upload_id.clone())
            .text("chunk_index", meta.chunk_index.to_string())
            .text("total_chunks", meta.total_chunks.to_string());

        self.client
            .post(self.config.upload_chunk_url())
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
