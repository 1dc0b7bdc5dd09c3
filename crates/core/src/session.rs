use uuid::Uuid;

/// Fixed chunk size for uploads: 1 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

/// One file transfer: a shared identifier plus the chunk geometry.
///
/// The identifier is a UUID v4 rather than anything time-derived, so rapid
/// repeated uploads and concurrent clients cannot collide.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub upload_id: String,
    pub file_size: u64,
    pub chunk_size: u64,
    pub total_chunks: u64,
}

/// A contiguous byte range `[start, end)` of the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub index: u64,
    pub start: u64,
    pub end: u64,
}

impl Chunk {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl UploadSession {
    pub fn new(file_size: u64) -> Self {
        Self::with_chunk_size(file_size, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(file_size: u64, chunk_size: u64) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        Self {
            upload_id: Uuid::new_v4().to_string(),
            file_size,
            chunk_size,
            total_chunks: file_size.div_ceil(chunk_size),
        }
    }

    /// Chunks in ascending index order, partitioning `[0, file_size)`.
    pub fn chunks(&self) -> impl Iterator<Item = Chunk> + '_ {
        let (file_size, chunk_size) = (self.file_size, self.chunk_size);
        (0..self.total_chunks).map(move |index| Chunk {
            index,
            start: index * chunk_size,
            end: file_size.min((index + 1) * chunk_size),
        })
    }
}
