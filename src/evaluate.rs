use std::path::PathBuf;

use anyhow::{Context, Result};
use faceroc_vision::{encode_face, Embedder, InputSpec};
use log::{debug, info};
use serde::Serialize;

use crate::distance::{cosine_distance, l2_distance, Metric};
use crate::pairs::{load_image, ImagePair, Label};

const PROGRESS_EVERY: usize = 50;

/// Distances for one pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceSample {
    pub first: PathBuf,
    pub second: PathBuf,
    pub l2: f32,
    pub cosine: f32,
    pub label: Label,
}

/// Per-pair results in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Samples {
    samples: Vec<DistanceSample>,
}

impl Samples {
    pub fn push(&mut self, sample: DistanceSample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DistanceSample> {
        self.samples.iter()
    }

    pub fn l2(&self) -> Vec<f32> {
        self.samples.iter().map(|s| s.l2).collect()
    }

    pub fn cosine(&self) -> Vec<f32> {
        self.samples.iter().map(|s| s.cosine).collect()
    }

    pub fn distances(&self, metric: Metric) -> Vec<f32> {
        match metric {
            Metric::L2 => self.l2(),
            Metric::Cosine => self.cosine(),
        }
    }

    pub fn labels(&self) -> Vec<Label> {
        self.samples.iter().map(|s| s.label).collect()
    }

    pub fn count(&self, label: Label) -> usize {
        self.samples.iter().filter(|s| s.label == label).count()
    }
}

impl FromIterator<DistanceSample> for Samples {
    fn from_iter<I: IntoIterator<Item = DistanceSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// Embed both images of every pair and record their distances.
///
/// Pairs are processed one at a time and the output keeps their order.
/// Missing image files are replaced by a black `placeholder`-sized image
/// and still contribute a sample.
pub fn evaluate<E: Embedder + ?Sized>(
    embedder: &mut E,
    pairs: &[ImagePair],
    spec: &InputSpec,
    placeholder: (u32, u32),
) -> Result<Samples> {
    info!("Processing {} pair(s)...", pairs.len());

    let mut samples = Samples::default();
    for (idx, pair) in pairs.iter().enumerate() {
        let img1 = load_image(&pair.first, placeholder)?;
        let img2 = load_image(&pair.second, placeholder)?;

        let e1 = encode_face(&mut *embedder, &img1, spec)
            .with_context(|| format!("embedding {}", pair.first.display()))?;
        let e2 = encode_face(&mut *embedder, &img2, spec)
            .with_context(|| format!("embedding {}", pair.second.display()))?;

        let sample = DistanceSample {
            first: pair.first.clone(),
            second: pair.second.clone(),
            l2: l2_distance(&e1, &e2),
            cosine: cosine_distance(&e1, &e2),
            label: pair.label,
        };
        debug!(
            "pair {} ({}): l2={:.4} cos={:.4}",
            idx, sample.label, sample.l2, sample.cosine
        );
        samples.push(sample);

        if (idx + 1) % PROGRESS_EVERY == 0 {
            info!("{}/{} pairs processed", idx + 1, pairs.len());
        }
    }

    Ok(samples)
}
