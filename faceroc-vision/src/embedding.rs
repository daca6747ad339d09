use anyhow::Result;
use image::DynamicImage;
use ndarray::{Array1, ArrayD};

use crate::embedder::Embedder;
use crate::preprocess::{preprocess, InputSpec};

/// Face embedding, flattened to one vector and unit length unless the raw
/// model output was all zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub vector: Array1<f32>,
}

impl Embedding {
    /// Flatten a raw model output (e.g. `[1, 512]`) and L2-normalize it.
    ///
    /// A vector whose norm is exactly zero is returned unchanged.
    pub fn from_raw(raw: ArrayD<f32>) -> Self {
        let flat: Array1<f32> = raw.iter().copied().collect();
        Self::normalized(flat)
    }

    pub fn normalized(vector: Array1<f32>) -> Self {
        let norm = vector.dot(&vector).sqrt();
        if norm == 0.0 {
            return Self { vector };
        }
        Self {
            vector: vector / norm,
        }
    }

    pub fn len(&self) -> usize {
        self.vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.vector.dot(&self.vector).sqrt()
    }
}

/// Preprocess an image, run it through the embedder and normalize the output.
pub fn encode_face<E: Embedder + ?Sized>(
    embedder: &mut E,
    img: &DynamicImage,
    spec: &InputSpec,
) -> Result<Embedding> {
    let input = preprocess(img, spec);
    let raw = embedder.embed(&input)?;
    Ok(Embedding::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, IxDyn};

    #[test]
    fn test_from_raw_flattens_and_normalizes() {
        let raw = ArrayD::from_shape_vec(IxDyn(&[1, 2]), vec![3.0, 4.0]).unwrap();
        let emb = Embedding::from_raw(raw);
        assert_eq!(emb.len(), 2);
        assert!((emb.vector[0] - 0.6).abs() < 1e-6);
        assert!((emb.vector[1] - 0.8).abs() < 1e-6);
        assert!((emb.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_passes_through() {
        let emb = Embedding::normalized(arr1(&[0.0, 0.0, 0.0]));
        assert_eq!(emb.vector, arr1(&[0.0, 0.0, 0.0]));
        assert!(emb.vector.iter().all(|v| v.is_finite()));
    }
}
