//! Fatal setup errors raised before any pair is processed.

use std::path::PathBuf;

use thiserror::Error;

use crate::pairs::Label;

#[derive(Debug, Error)]
pub enum SetupError {
    /// The model artifact does not exist.
    #[error("model file not found at {}", .0.display())]
    ModelNotFound(PathBuf),

    /// One of the labelled input directories is absent.
    #[error("{label} input directory not found at {}", .path.display())]
    MissingInputDir {
        /// Which collection is missing.
        label: Label,
        /// Where it was expected.
        path: PathBuf,
    },
}
