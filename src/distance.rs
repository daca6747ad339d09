//! Distances between unit-normalized embeddings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Embedding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    L2,
    Cosine,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::L2, Metric::Cosine];

    pub fn distance(self, a: &Embedding, b: &Embedding) -> f32 {
        match self {
            Metric::L2 => l2_distance(a, b),
            Metric::Cosine => cosine_distance(a, b),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::L2 => "L2",
            Metric::Cosine => "Cosine",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Euclidean norm of `a - b`. In `[0, 2]` for unit vectors.
pub fn l2_distance(a: &Embedding, b: &Embedding) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let diff = &a.vector - &b.vector;
    diff.dot(&diff).sqrt()
}

/// `1 - a·b`. Only equals cosine distance when both inputs have unit norm.
pub fn cosine_distance(a: &Embedding, b: &Embedding) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    1.0 - a.vector.dot(&b.vector)
}
