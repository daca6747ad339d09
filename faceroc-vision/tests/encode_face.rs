use anyhow::Result;
use faceroc_vision::{encode_face, Embedder, InputSpec, TensorLayout};
use image::{DynamicImage, Rgb, RgbImage};
use ndarray::{Array4, ArrayD, IxDyn};

/// Records what it was fed and returns a fixed multi-dimensional output.
struct RecordingEmbedder {
    seen: Vec<Vec<usize>>,
    output: ArrayD<f32>,
}

impl Embedder for RecordingEmbedder {
    fn embed(&mut self, input: &Array4<f32>) -> Result<ArrayD<f32>> {
        self.seen.push(input.shape().to_vec());
        Ok(self.output.clone())
    }
}

#[test]
fn test_output_is_flattened_and_normalized() -> Result<()> {
    let mut embedder = RecordingEmbedder {
        seen: Vec::new(),
        output: ArrayD::from_shape_vec(IxDyn(&[1, 2, 2]), vec![1.0, 1.0, 1.0, 1.0])?,
    };

    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 200, Rgb([10, 20, 30])));
    let emb = encode_face(&mut embedder, &img, &InputSpec::default())?;

    assert_eq!(embedder.seen, vec![vec![1, 160, 160, 3]]);
    assert_eq!(emb.len(), 4);
    assert!(emb.vector.iter().all(|&v| (v - 0.5).abs() < 1e-6));
    assert!((emb.norm() - 1.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_layout_reaches_embedder() -> Result<()> {
    let mut embedder = RecordingEmbedder {
        seen: Vec::new(),
        output: ArrayD::from_shape_vec(IxDyn(&[1, 3]), vec![0.0, 2.0, 0.0])?,
    };
    let spec = InputSpec {
        width: 112,
        height: 112,
        layout: TensorLayout::Nchw,
    };

    let img = DynamicImage::new_rgb8(64, 64);
    let emb = encode_face(&mut embedder, &img, &spec)?;

    assert_eq!(embedder.seen, vec![vec![1, 3, 112, 112]]);
    assert_eq!(emb.vector.to_vec(), vec![0.0, 1.0, 0.0]);
    Ok(())
}

#[test]
fn test_zero_output_is_not_divided() -> Result<()> {
    let mut embedder = RecordingEmbedder {
        seen: Vec::new(),
        output: ArrayD::zeros(IxDyn(&[1, 8])),
    };
    let emb = encode_face(&mut embedder, &DynamicImage::new_rgb8(160, 160), &InputSpec::default())?;
    assert!(emb.vector.iter().all(|&v| v == 0.0));
    Ok(())
}
