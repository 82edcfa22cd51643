use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure modes. Every variant names the offending file or parameter
/// so the CLI message is actionable without a stack trace.
#[derive(Debug, Error)]
pub enum Error {
    #[error("input file not found or unreadable: {path}")]
    InputNotFound { path: PathBuf },

    #[error("unsupported background format for {path}: {detail}")]
    UnsupportedFormat { path: PathBuf, detail: String },

    #[error("page {requested} does not exist in {path} (has {available} pages)")]
    PageIndex {
        path: PathBuf,
        requested: usize,
        available: usize,
    },

    #[error("transcript is not valid UTF-8 text: {path}")]
    Encoding { path: PathBuf },
}
