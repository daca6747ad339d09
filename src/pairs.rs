//! Enumerating labelled image pairs from disk.
//!
//! Each labelled directory holds image files that form pairs two at a time
//! once sorted by file name: `(0, 1)`, `(2, 3)`, ... A trailing file without
//! a partner is dropped. Nothing checks that adjacent files really show the
//! same (or different) people; that is up to whoever prepared the data.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Ground truth for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Same,
    Different,
}

impl Label {
    /// `1` for same identity, `0` otherwise.
    pub fn as_u8(self) -> u8 {
        match self {
            Label::Same => 1,
            Label::Different => 0,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Label::Same
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Same => f.write_str("same"),
            Label::Different => f.write_str("different"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePair {
    pub first: PathBuf,
    pub second: PathBuf,
    pub label: Label,
}

/// Pairs from `<data_dir>/<same_dir>` followed by pairs from `<data_dir>/<diff_dir>`.
pub fn load_pairs(data_dir: &Path, same_dir: &str, diff_dir: &str) -> Result<Vec<ImagePair>> {
    let dirs = [
        (data_dir.join(same_dir), Label::Same),
        (data_dir.join(diff_dir), Label::Different),
    ];

    for (dir, label) in &dirs {
        if !dir.is_dir() {
            return Err(SetupError::MissingInputDir {
                label: *label,
                path: dir.clone(),
            }
            .into());
        }
    }

    let mut pairs = Vec::new();
    for (dir, label) in &dirs {
        pairs.extend(enumerate_pairs(dir, *label)?);
    }
    Ok(pairs)
}

/// Sort the directory's file names and group them two at a time.
pub fn enumerate_pairs(dir: &Path, label: Label) -> Result<Vec<ImagePair>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        if entry.path().is_dir() {
            continue;
        }
        names.push(entry.file_name());
    }
    names.sort();

    Ok(names
        .chunks_exact(2)
        .map(|chunk| ImagePair {
            first: dir.join(&chunk[0]),
            second: dir.join(&chunk[1]),
            label,
        })
        .collect())
}

/// Read an image as RGB, or an all-black placeholder if the file is missing.
pub fn load_image(path: &Path, placeholder: (u32, u32)) -> Result<DynamicImage> {
    if !path.exists() {
        warn!("Image not found {}", path.display());
        return Ok(DynamicImage::new_rgb8(placeholder.0, placeholder.1));
    }
    let img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"").unwrap();
        }
    }

    #[test]
    fn test_pairs_follow_sorted_names() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), &["b_2.png", "a_1.png", "b_1.png", "a_2.png", "c_1.png"]);
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let pairs = enumerate_pairs(dir.path(), Label::Same).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].first, dir.path().join("a_1.png"));
        assert_eq!(pairs[0].second, dir.path().join("a_2.png"));
        assert_eq!(pairs[1].first, dir.path().join("b_1.png"));
        assert_eq!(pairs[1].second, dir.path().join("b_2.png"));
        assert!(pairs.iter().all(|p| p.label == Label::Same));
    }

    #[test]
    fn test_floor_half_pairs() {
        for n in 0..7 {
            let dir = tempfile::tempdir().unwrap();
            let names: Vec<String> = (0..n).map(|i| format!("{i:03}.jpg")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            touch(dir.path(), &refs);
            let pairs = enumerate_pairs(dir.path(), Label::Different).unwrap();
            assert_eq!(pairs.len(), n / 2);
        }
    }

    #[test]
    fn test_missing_directory_is_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("same")).unwrap();

        let err = load_pairs(dir.path(), "same", "diff").unwrap_err();
        match err.downcast_ref::<SetupError>() {
            Some(SetupError::MissingInputDir { label, .. }) => assert_eq!(*label, Label::Different),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_same_pairs_come_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("same")).unwrap();
        std::fs::create_dir(dir.path().join("diff")).unwrap();
        touch(&dir.path().join("same"), &["1.png", "2.png"]);
        touch(&dir.path().join("diff"), &["1.png", "2.png", "3.png", "4.png"]);

        let pairs = load_pairs(dir.path(), "same", "diff").unwrap();
        let labels: Vec<Label> = pairs.iter().map(|p| p.label).collect();
        assert_eq!(labels, vec![Label::Same, Label::Different, Label::Different]);
    }

    #[test]
    fn test_missing_image_becomes_placeholder() {
        let img = load_image(Path::new("/nonexistent/face.png"), (160, 160)).unwrap();
        assert_eq!((img.width(), img.height()), (160, 160));
        assert!(img.to_rgb8().as_raw().iter().all(|&p| p == 0));
    }
}
