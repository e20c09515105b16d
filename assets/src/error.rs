use std::{io, path::PathBuf};

/// Failures encountered while retrieving or decoding a single asset tier.
///
/// These never escape [`crate::AssetPipeline::resolve`]; each one is logged
/// and the next fallback tier takes over.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    /// Nothing is stored at the requested path.
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The bytes do not look like the expected container.
    #[error("{path} is not a valid {expected} file")]
    Malformed {
        /// Path whose contents were rejected.
        path: PathBuf,
        /// Human-readable name of the expected format.
        expected: &'static str,
    },

    /// The image codec rejected the texture bytes.
    #[error("image decoding failed: {0}")]
    Decode(#[from] image::ImageError),
}
