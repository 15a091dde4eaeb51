//! Console reports.
//!
//! This module formats the outcome of both tools for the terminal. It provides:
//! 1. **Stimulus summary:** Frame size, record count and output files.
//! 2. **Verification report:** PSNR/SSIM block plus input record accounting.
//!
//! Rendering and printing are separate so the text can be checked without
//! capturing stdout.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::sim::loader::LoadStats;

/// Width of the `=` rules around the verification results.
const RULE_WIDTH: usize = 30;

/// Outcome of a stimulus generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StimulusSummary {
    /// Frame rows.
    pub height: usize,
    /// Frame columns.
    pub width: usize,
    /// Records written to each file.
    pub lines: usize,
    /// Whether the observed image was resampled. Not printed.
    pub resized: bool,
    /// Divisor record file.
    pub illumination_hex: PathBuf,
    /// Dividend record file.
    pub observed_hex: PathBuf,
}

impl StimulusSummary {
    /// Renders the summary as printed by [`StimulusSummary::print`].
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Processing images, size: ({}, {}), total pixels: {}",
            self.height, self.width, self.lines
        );
        let _ = writeln!(out, "Conversion complete!");
        let _ = writeln!(
            out,
            "Files saved as: {} and {}",
            self.illumination_hex.display(),
            self.observed_hex.display()
        );
        let _ = writeln!(out, "Total lines: {}", self.lines);
        out
    }

    /// Prints the summary to stdout.
    pub fn print(&self) {
        print!("{}", self.render());
    }
}

/// Record accounting for the three verification inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputStats {
    /// Divisor records.
    pub illumination: LoadStats,
    /// Dividend records.
    pub observed: LoadStats,
    /// Hardware quotient records.
    pub hardware: LoadStats,
}

impl InputStats {
    /// Pairs each input with a display label.
    pub const fn labelled(&self) -> [(&'static str, &LoadStats); 3] {
        [
            ("illumination", &self.illumination),
            ("observed", &self.observed),
            ("hardware", &self.hardware),
        ]
    }
}

/// Outcome of a verification run.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    /// PSNR in dB between the clipped quotients (`+inf` when identical).
    pub psnr_db: f64,
    /// SSIM between the clipped quotients.
    pub ssim: f64,
    /// Frame shape `(height, width)`.
    pub shape: (usize, usize),
    /// Clip ceiling and metric data range.
    pub clip_max: f32,
    /// Record accounting per input file.
    pub inputs: InputStats,
    /// Number of input files that did not exist.
    pub missing: usize,
    /// Hardware quotient visualization.
    pub result_png: PathBuf,
    /// Golden quotient visualization.
    pub reference_png: PathBuf,
}

impl VerificationReport {
    /// Returns `true` if any input was missing, short, or held rejected records.
    pub fn degraded(&self) -> bool {
        self.missing > 0 || self.inputs.labelled().iter().any(|(_, s)| s.is_degraded())
    }

    /// Renders the results block.
    ///
    /// PSNR and SSIM are printed with four decimals; identical inputs print
    /// PSNR as `inf`.
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Verification Results:");
        let _ = writeln!(out, "PSNR: {:.4} dB", self.psnr_db);
        let _ = writeln!(out, "SSIM: {:.4}", self.ssim);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out);

        if self.degraded() {
            let _ = writeln!(out, "Input records replaced by zeros:");
            for (label, stats) in self.inputs.labelled() {
                if stats.is_degraded() {
                    let _ = writeln!(
                        out,
                        "  {label:<14} unknown {:>8}  malformed {:>8}  padded {:>8}",
                        stats.unknown, stats.malformed, stats.padded
                    );
                }
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "Saved images (range: 0 ~ {}):", self.clip_max);
        let _ = writeln!(out, "  {}", self.result_png.display());
        let _ = writeln!(out, "  {}", self.reference_png.display());
        out
    }

    /// Prints the results block to stdout.
    pub fn print(&self) {
        print!("{}", self.render());
    }
}
