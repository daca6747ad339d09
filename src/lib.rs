pub mod config;
pub mod distance;
pub mod error;
pub mod evaluate;
pub mod pairs;
pub mod report;
pub mod roc;
pub mod run;

// Re-export vision types for convenience
pub use faceroc_vision::{Embedder, Embedding, InputSpec, OnnxEmbedder, TensorLayout};
