//! ROC analysis over pair distances.
//!
//! ROC construction treats a larger score as more likely positive, while a
//! smaller distance means "same person". Distances are therefore negated on
//! the way in and thresholds negated again on the way out, so callers only
//! ever see distance units.

use serde::Serialize;
use thiserror::Error;

use crate::distance::Metric;
use crate::evaluate::Samples;
use crate::pairs::Label;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RocError {
    #[error("no samples to analyze")]
    Empty,

    #[error("got {distances} distances but {labels} labels")]
    LengthMismatch { distances: usize, labels: usize },

    /// Every pair carries the same label, so one of the rates is undefined.
    #[error("all pairs are labelled {0}; ROC needs both same and different pairs")]
    SingleClass(Label),
}

/// Curve in score space, ordered by decreasing threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    pub thresholds: Vec<f64>,
}

/// Result of analyzing one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocAnalysis {
    pub metric: Metric,
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    /// Distance thresholds matching each curve point.
    pub thresholds: Vec<f64>,
    pub auc: f64,
    /// Predict same-person when the distance is strictly below this value.
    pub recommended_threshold: f64,
}

/// Sweep every distinct score from highest to lowest, counting a sample as
/// predicted positive when `score >= threshold`.
///
/// The first point is `(0, 0)` with an infinite threshold.
pub fn roc_curve(scores: &[f64], labels: &[Label]) -> Result<RocCurve, RocError> {
    if scores.len() != labels.len() {
        return Err(RocError::LengthMismatch {
            distances: scores.len(),
            labels: labels.len(),
        });
    }
    if scores.is_empty() {
        return Err(RocError::Empty);
    }

    let positives = labels.iter().filter(|l| l.is_positive()).count();
    let negatives = labels.len() - positives;
    if positives == 0 {
        return Err(RocError::SingleClass(Label::Different));
    }
    if negatives == 0 {
        return Err(RocError::SingleClass(Label::Same));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };

    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < order.len() {
        let threshold = scores[order[i]];
        while i < order.len() && scores[order[i]].total_cmp(&threshold).is_eq() {
            if labels[order[i]].is_positive() {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        curve.fpr.push(fp as f64 / negatives as f64);
        curve.tpr.push(tp as f64 / positives as f64);
        curve.thresholds.push(threshold);
    }

    Ok(curve)
}

/// Trapezoidal area under the curve.
pub fn auc(fpr: &[f64], tpr: &[f64]) -> f64 {
    fpr.windows(2)
        .zip(tpr.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (y[1] + y[0]) / 2.0)
        .sum()
}

/// Index of the point maximizing Youden's J (`tpr - fpr`); ties keep the
/// earliest point.
pub fn youden_index(fpr: &[f64], tpr: &[f64]) -> usize {
    let mut best = 0;
    let mut best_j = f64::NEG_INFINITY;
    for (i, (f, t)) in fpr.iter().zip(tpr).enumerate() {
        let j = t - f;
        if j > best_j {
            best = i;
            best_j = j;
        }
    }
    best
}

/// Build the ROC curve, AUC and Youden threshold for one metric's distances.
pub fn analyze(metric: Metric, distances: &[f32], labels: &[Label]) -> Result<RocAnalysis, RocError> {
    let scores: Vec<f64> = distances.iter().map(|&d| -f64::from(d)).collect();
    let curve = roc_curve(&scores, labels)?;

    let area = auc(&curve.fpr, &curve.tpr);
    let best = youden_index(&curve.fpr, &curve.tpr);
    let thresholds: Vec<f64> = curve.thresholds.iter().map(|t| -t).collect();
    let recommended_threshold = thresholds[best];

    Ok(RocAnalysis {
        metric,
        fpr: curve.fpr,
        tpr: curve.tpr,
        thresholds,
        auc: area,
        recommended_threshold,
    })
}

/// Analyze every metric independently.
pub fn analyze_samples(samples: &Samples) -> Result<Vec<RocAnalysis>, RocError> {
    let labels = samples.labels();
    Metric::ALL
        .iter()
        .map(|&metric| analyze(metric, &samples.distances(metric), &labels))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::Label::{Different as D, Same as S};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_separation() {
        let res = analyze(Metric::L2, &[0.2, 0.3, 1.5, 1.8], &[S, S, D, D]).unwrap();
        assert!(close(res.auc, 1.0));
        assert!(res.recommended_threshold >= 0.3 && res.recommended_threshold < 1.5);
        assert!(close(res.recommended_threshold, 0.3_f32 as f64));
        assert_eq!(res.fpr, vec![0.0, 0.0, 0.0, 0.5, 1.0]);
        assert_eq!(res.tpr, vec![0.0, 0.5, 1.0, 1.0, 1.0]);
        assert_eq!(res.thresholds[0], f64::NEG_INFINITY);
        assert!(res.thresholds[1..].windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_identical_distributions() {
        let res = analyze(Metric::Cosine, &[0.7; 4], &[S, D, S, D]).unwrap();
        assert!(close(res.auc, 0.5));
        assert_eq!(res.fpr, vec![0.0, 1.0]);
        assert_eq!(res.tpr, vec![0.0, 1.0]);

        let res = analyze(
            Metric::L2,
            &[0.1, 0.5, 0.9, 0.9, 0.5, 0.1],
            &[S, S, S, D, D, D],
        )
        .unwrap();
        assert!(close(res.auc, 0.5));
    }

    #[test]
    fn test_partial_overlap() {
        let res = analyze(Metric::L2, &[0.1, 0.3, 0.4, 0.6], &[S, D, S, D]).unwrap();
        assert!(close(res.auc, 0.75));
        // J is 0.5 at two points; the first one (smaller distance) wins
        assert!(close(res.recommended_threshold, 0.1_f32 as f64));
    }

    #[test]
    fn test_inverted_metric() {
        let res = analyze(Metric::L2, &[1.5, 1.8, 0.2, 0.3], &[S, S, D, D]).unwrap();
        assert!(close(res.auc, 0.0));
        assert_eq!(res.recommended_threshold, f64::NEG_INFINITY);
    }

    #[test]
    fn test_ties_use_greater_or_equal() {
        let curve = roc_curve(&[1.0, 1.0, 0.0], &[S, D, D]).unwrap();
        assert_eq!(curve.tpr, vec![0.0, 1.0, 1.0]);
        assert_eq!(curve.fpr, vec![0.0, 0.5, 1.0]);
        assert_eq!(curve.thresholds, vec![f64::INFINITY, 1.0, 0.0]);
    }

    #[test]
    fn test_auc_bounds() {
        let distances = [0.9, 0.05, 1.3, 0.4, 0.4, 1.1, 0.6, 0.2];
        let labels = [S, S, D, D, S, D, S, D];
        let res = analyze(Metric::Cosine, &distances, &labels).unwrap();
        assert!((0.0..=1.0).contains(&res.auc));
        assert_eq!(*res.fpr.last().unwrap(), 1.0);
        assert_eq!(*res.tpr.last().unwrap(), 1.0);
        assert!(res.fpr.windows(2).all(|w| w[0] <= w[1]));
        assert!(res.tpr.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_errors() {
        assert_eq!(analyze(Metric::L2, &[], &[]).unwrap_err(), RocError::Empty);
        assert_eq!(
            analyze(Metric::L2, &[0.1], &[S, D]).unwrap_err(),
            RocError::LengthMismatch {
                distances: 1,
                labels: 2
            }
        );
        assert_eq!(
            analyze(Metric::L2, &[0.1, 0.2], &[S, S]).unwrap_err(),
            RocError::SingleClass(S)
        );
        assert_eq!(
            analyze(Metric::L2, &[0.1, 0.2], &[D, D]).unwrap_err(),
            RocError::SingleClass(D)
        );
    }

    #[test]
    fn test_youden_first_max() {
        assert_eq!(youden_index(&[0.0, 0.0, 0.5], &[0.0, 0.5, 1.0]), 1);
        assert_eq!(youden_index(&[0.0, 1.0], &[0.0, 1.0]), 0);
    }
}
