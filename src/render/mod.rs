//! Output rendering for correlated samples.
//!
//! All modes display microseconds: samples are nanoseconds divided by 1000.

pub mod latex;

use crate::stats::Summary;

/// Output format, chosen once from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Aligned `count min max mean stdev label` columns.
    Plain,
    /// `label & min & max & mean & stdev \\` table rows.
    Latex { decimal_comma: bool },
    /// `index value` pairs, one per sample, for gnuplot.
    Plot,
}

/// Renders sample sets in one mode.
///
/// Plot indices run across every set rendered by the same renderer.
#[derive(Debug, Clone)]
pub struct Renderer {
    mode: RenderMode,
    next_index: u64,
}

impl Renderer {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            next_index: 1,
        }
    }

    /// Lines printed before a batch of benchmarks.
    pub fn header(&self) -> Option<String> {
        match self.mode {
            RenderMode::Plain => Some(format!(
                "{:>8} {:>10} {:>10} {:>10} {:>10}   {}",
                "# Values", "Min", "Max", "Mean", "Stdev", "Benchmark"
            )),
            RenderMode::Latex { .. } => Some(latex::HEADER.to_string()),
            RenderMode::Plot => None,
        }
    }

    /// Lines printed after a batch of benchmarks.
    pub fn footer(&self) -> Option<String> {
        match self.mode {
            RenderMode::Latex { .. } => Some(latex::FOOTER.to_string()),
            RenderMode::Plain | RenderMode::Plot => None,
        }
    }

    /// Render one benchmark, or `None` if it has no samples.
    pub fn render(&mut self, label: &str, samples: &[i64]) -> Option<String> {
        let summary = Summary::from_samples(samples)?;

        let out = match self.mode {
            RenderMode::Plain => plain_row(label, &summary),
            RenderMode::Latex { decimal_comma } => latex::row(label, &summary, decimal_comma),
            RenderMode::Plot => {
                let lines: Vec<String> = samples
                    .iter()
                    .map(|&ns| {
                        let line = format!("{} {}", self.next_index, ns as f64 / 1000.0);
                        self.next_index += 1;
                        line
                    })
                    .collect();
                lines.join("\n")
            }
        };
        Some(out)
    }
}

fn plain_row(label: &str, summary: &Summary) -> String {
    let us = |ns: f64| ns / 1000.0;
    format!(
        "{:>8} {:>10.3} {:>10.3} {:>10.3} {:>10.3}   {}",
        summary.count,
        us(summary.min as f64),
        us(summary.max as f64),
        us(summary.mean),
        us(summary.stdev),
        label
    )
}
