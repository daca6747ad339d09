pub mod embedder;
pub mod embedding;
pub mod model;
pub mod preprocess;

// Re-export commonly used types
pub use embedder::{Embedder, ModelInfo, OnnxEmbedder};
pub use embedding::{encode_face, Embedding};
pub use preprocess::{preprocess, InputSpec, TensorLayout};
