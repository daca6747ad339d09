//! Console summary, ROC chart and JSON export.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::evaluate::Samples;
use crate::pairs::Label;
use crate::roc::RocAnalysis;

const CHART_TITLE: &str = "Face Recognition Performance (ROC)";
const COLORS: [&str; 4] = ["#3498db", "#e67e22", "#27ae60", "#9b59b6"];

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub samples: Samples,
    pub analyses: Vec<RocAnalysis>,
}

impl RunReport {
    pub fn summary(&self) -> String {
        summary(&self.samples, &self.analyses)
    }
}

/// Fixed-format results block.
pub fn summary(samples: &Samples, analyses: &[RocAnalysis]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "----------------RESULTS----------------");
    let _ = writeln!(
        out,
        "Pairs: {} same, {} different",
        samples.count(Label::Same),
        samples.count(Label::Different)
    );
    for a in analyses {
        let name = format!("AUC ({} Distance):", a.metric);
        let _ = writeln!(out, "{:<23}{:.4}", name, a.auc);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Recommended Thresholds:");
    for a in analyses {
        let name = format!("{} Distance:", a.metric);
        let _ = writeln!(
            out,
            "  {:<18}{:.4} (same person if distance < {:.4})",
            name, a.recommended_threshold, a.recommended_threshold
        );
    }
    out
}

/// SVG plot of every ROC curve against the chance diagonal.
pub fn roc_svg(analyses: &[RocAnalysis]) -> String {
    let (width, height) = (700u32, 560u32);
    let margin_top = 50;
    let margin_right = 30;
    let margin_bottom = 70;
    let margin_left = 80;
    let plot_width = f64::from(width - margin_left - margin_right);
    let plot_height = f64::from(height - margin_top - margin_bottom);

    let scale_x = |v: f64| f64::from(margin_left) + v.clamp(0.0, 1.0) * plot_width;
    let scale_y = |v: f64| f64::from(margin_top) + (1.0 - v.clamp(0.0, 1.0)) * plot_height;

    let mut svg = String::with_capacity(8192);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">"#,
        width, height
    );
    svg.push_str(
        r#"<style>
  .background { fill: #ffffff; }
  .title { font: bold 18px system-ui, sans-serif; fill: #1a1a1a; }
  .axis-label { font: 13px system-ui, sans-serif; fill: #1a1a1a; }
  .tick-label { font: 11px system-ui, sans-serif; fill: #1a1a1a; }
  .legend { font: 13px system-ui, sans-serif; fill: #1a1a1a; }
  .grid { stroke: #e0e0e0; stroke-width: 1; }
  .axis { stroke: #333333; stroke-width: 1.5; }
  .chance { stroke: #000000; stroke-width: 1; stroke-dasharray: 6 4; opacity: 0.5; }
  .legend-bg { fill: #ffffff; stroke: #cccccc; }
</style>
"#,
    );
    let _ = writeln!(
        svg,
        r#"<rect class="background" width="{}" height="{}"/>"#,
        width, height
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="30" text-anchor="middle" class="title">{}</text>"#,
        f64::from(width) / 2.0,
        CHART_TITLE
    );

    for i in 0..=5 {
        let v = f64::from(i) / 5.0;
        let (x, y) = (scale_x(v), scale_y(v));
        let _ = writeln!(
            svg,
            r#"<line x1="{:.2}" y1="{}" x2="{:.2}" y2="{}" class="grid"/>"#,
            x,
            margin_top,
            x,
            height - margin_bottom
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{}" y1="{:.2}" x2="{}" y2="{:.2}" class="grid"/>"#,
            margin_left,
            y,
            width - margin_right,
            y
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{}" text-anchor="middle" class="tick-label">{:.1}</text>"#,
            x,
            height - margin_bottom + 20,
            v
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{:.2}" text-anchor="end" class="tick-label">{:.1}</text>"#,
            margin_left - 10,
            y + 4.0,
            v
        );
    }

    let _ = writeln!(
        svg,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis"/>"#,
        margin_left,
        height - margin_bottom,
        width - margin_right,
        height - margin_bottom
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" class="axis"/>"#,
        margin_left,
        margin_top,
        margin_left,
        height - margin_bottom
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" class="axis-label">False Positive Rate</text>"#,
        f64::from(margin_left) + plot_width / 2.0,
        height - 20
    );
    let _ = writeln!(
        svg,
        r#"<text x="25" y="{0}" text-anchor="middle" class="axis-label" transform="rotate(-90 25 {0})">True Positive Rate</text>"#,
        f64::from(margin_top) + plot_height / 2.0
    );

    // No-discrimination reference
    let _ = writeln!(
        svg,
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="chance"/>"#,
        scale_x(0.0),
        scale_y(0.0),
        scale_x(1.0),
        scale_y(1.0)
    );

    for (a, color) in analyses.iter().zip(COLORS.iter().cycle()) {
        let mut path = String::new();
        for (i, (x, y)) in a.fpr.iter().zip(&a.tpr).enumerate() {
            let prefix = if i == 0 { "M" } else { " L" };
            let _ = write!(path, "{} {:.2},{:.2}", prefix, scale_x(*x), scale_y(*y));
        }
        let _ = writeln!(
            svg,
            r#"<path d="{}" stroke="{}" stroke-width="2" fill="none"/>"#,
            path, color
        );
    }

    // Legend sits in the lower right corner of the plot
    let legend_w = 160;
    let legend_h = 15 + analyses.len() as u32 * 22;
    let legend_x = width - margin_right - legend_w - 10;
    let legend_y = height - margin_bottom - legend_h - 10;
    let _ = writeln!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="4" class="legend-bg"/>"#,
        legend_x, legend_y, legend_w, legend_h
    );
    for (i, (a, color)) in analyses.iter().zip(COLORS.iter().cycle()).enumerate() {
        let y = legend_y + 18 + i as u32 * 22;
        let _ = writeln!(
            svg,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="2"/>"#,
            legend_x + 10,
            y - 4,
            legend_x + 30,
            y - 4,
            color
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" class="legend">{} (AUC={:.2})</text>"#,
            legend_x + 38,
            y,
            a.metric,
            a.auc
        );
    }

    svg.push_str("</svg>\n");
    svg
}

pub fn write_chart(path: &Path, analyses: &[RocAnalysis]) -> Result<()> {
    create_parent(path)?;
    std::fs::write(path, roc_svg(analyses))
        .with_context(|| format!("writing chart {}", path.display()))
}

pub fn write_json(path: &Path, report: &RunReport) -> Result<()> {
    create_parent(path)?;
    let data = serde_json::to_string_pretty(report)?;
    std::fs::write(path, data).with_context(|| format!("writing results {}", path.display()))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}
