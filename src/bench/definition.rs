//! Benchmark definitions and the points file (points.json).
//!
//! JSON shape:
//! {
//!   "benchmarks": [
//!     { "start": 3, "stop": 4, "label": "Mapping" },
//!     { "start": 3, "stop": 14 }          // label defaults to "#3-#14"
//!   ]
//! }
//!
//! Definitions may share measuring point ids; each one is correlated on its
//! own pending state.

use crate::Result;
use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;

/// A named (start point, stop point) pair whose elapsed times are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkDefinition {
    pub start: u32,
    pub stop: u32,
    pub label: String,
}

impl BenchmarkDefinition {
    pub fn new(start: u32, stop: u32, label: impl Into<String>) -> Self {
        Self {
            start,
            stop,
            label: label.into(),
        }
    }

    /// Label used when none is given on the command line or in points.json.
    pub fn default_label(start: u32, stop: u32) -> String {
        format!("#{}-#{}", start, stop)
    }
}

/// Built-in processing stages of the NSLP daemons' measuring points.
pub fn default_definitions() -> Vec<BenchmarkDefinition> {
    vec![
        BenchmarkDefinition::new(3, 4, "Mapping"),
        BenchmarkDefinition::new(9, 10, "Deserialisierung"),
        BenchmarkDefinition::new(5, 6, "Session-Manager"),
        BenchmarkDefinition::new(13, 14, "Protokoll-Automat"),
        BenchmarkDefinition::new(7, 8, "Serialisierung"),
        BenchmarkDefinition::new(3, 14, "Gesamt"),
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointsSpec {
    #[serde(default)]
    pub benchmarks: Vec<RawBenchmark>,
}

/// Raw benchmark shape as it appears in points.json.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBenchmark {
    pub start: u32,
    pub stop: u32,

    #[serde(default)]
    pub label: Option<String>,
}

impl PointsSpec {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate and turn raw entries into definitions, keeping file order.
    ///
    /// Labels key the correlation result, so they must be non-empty and
    /// unique.
    pub fn validate_and_build(&self) -> Result<Vec<BenchmarkDefinition>> {
        if self.benchmarks.is_empty() {
            bail!("points.json contained no benchmarks");
        }

        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut out = Vec::with_capacity(self.benchmarks.len());
        for raw in &self.benchmarks {
            let label = match raw.label.as_deref().map(str::trim) {
                Some("") => bail!(
                    "benchmark {}->{} has an empty label",
                    raw.start,
                    raw.stop
                ),
                Some(l) => l.to_string(),
                None => BenchmarkDefinition::default_label(raw.start, raw.stop),
            };

            if raw.start == raw.stop {
                bail!(
                    "benchmark '{}' uses measuring point {} as both start and stop",
                    label,
                    raw.start
                );
            }

            if !seen.insert(label.clone()) {
                bail!("duplicate benchmark label in points.json: {}", label);
            }

            out.push(BenchmarkDefinition::new(raw.start, raw.stop, label));
        }

        Ok(out)
    }
}

/// Load definitions from a points file, or the built-in table when `path`
/// is `None`.
pub fn load_definitions(path: Option<&str>) -> Result<Vec<BenchmarkDefinition>> {
    let Some(path) = path else {
        return Ok(default_definitions());
    };

    let text = fs::read_to_string(path).with_context(|| format!("read points file {}", path))?;
    PointsSpec::from_json(&text)
        .and_then(|spec| spec.validate_and_build())
        .with_context(|| format!("invalid points file {}", path))
}
