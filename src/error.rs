use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Archive error {0}")]
    IoError(#[from] std::io::Error),

    #[error("Bad archive structure : {0}")]
    BadArchiveStructure(String),

    #[error("Unexpected end of data: {needed} bytes needed at index {index}, {available} available")]
    UnexpectedEnd {
        index: usize,
        needed: usize,
        available: usize,
    },

    #[error("Checksum mismatch for '{name}': recorded {expected:08x}, computed {actual:08x}")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    #[error("Archive limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("The compression method code '{0}' is not supported")]
    UnsupportedCompressionMethod(u16),

    #[error("Entry '{name}' could not be rendered: {source}")]
    Rasterizer {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[cfg(feature = "favicon")]
    #[error("Manifest serialization error : {0}")]
    Manifest(#[from] serde_json::Error),
}
