//! # Drawer Demo
//!
//! An accessible bar chart drawn with `drawer-core`.
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `DemoConfig` - Canvas size, chart data, event script and outputs
//! - `ChartDemo` - Draws the chart and replays the event script
//! - `Step` - One scripted host event (`click:x,y`, `tab`, `focus:id`, ...)
//!
//! The two persistent buttons switch between datasets; the bars are
//! transient and are rebuilt on every redraw.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod chart;
mod script;

pub use chart::ChartDemo;
pub use script::Step;

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line arguments for drawer-demo.
#[derive(Debug, Clone, Parser)]
#[command(name = "drawer-demo")]
#[command(about = "Render an accessible bar chart and replay host events against it")]
#[command(version)]
pub struct CliArgs {
    /// Canvas width in pixels
    #[arg(long, default_value = "600")]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value = "400")]
    pub height: u32,

    /// JSON chart description with `datasets` and `labels`
    #[arg(long, env = "DRAWER_CHART")]
    pub chart: Option<PathBuf>,

    /// Host events to replay, in order (e.g. `click:190,25`, `tab`, `focus:bar-2`)
    #[arg(long = "step", value_name = "STEP")]
    pub steps: Vec<String>,

    /// Where to write the final frame
    #[arg(long, env = "DRAWER_OUTPUT", default_value = "chart.png")]
    pub output: PathBuf,

    /// Where to write the accessible tree as JSON
    #[arg(long)]
    pub tree: Option<PathBuf>,
}

/// Chart data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// One series of bar values per dataset.
    pub datasets: Vec<Vec<f32>>,
    /// One label per bar.
    pub labels: Vec<String>,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            datasets: vec![
                vec![12.0, 45.0, 30.0, 11.0, 50.0, 78.0],
                vec![80.0, 30.0, 20.0, 50.0, 10.0, 13.0],
            ],
            labels: ["Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ChartSpec {
    /// Read a chart description from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds no
    /// dataset.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let spec: Self = serde_json::from_str(&raw)?;
        if spec.datasets.is_empty() {
            anyhow::bail!("chart {} has no datasets", path.display());
        }
        Ok(spec)
    }

    /// Largest value across all datasets.
    #[must_use]
    pub fn max_value(&self) -> f32 {
        self.datasets
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f32::max)
    }
}

/// Demo configuration.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Chart data.
    pub chart: ChartSpec,
    /// Host events to replay.
    pub steps: Vec<Step>,
    /// PNG output path.
    pub output: PathBuf,
    /// Accessible tree output path.
    pub tree: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoConfig {
    /// Create a configuration with the built-in chart and no steps.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 600,
            height: 400,
            chart: ChartSpec::default(),
            steps: Vec::new(),
            output: PathBuf::from("chart.png"),
            tree: None,
        }
    }
}

impl TryFrom<CliArgs> for DemoConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> anyhow::Result<Self> {
        let chart = match args.chart {
            Some(ref path) => ChartSpec::load(path)?,
            None => ChartSpec::default(),
        };
        let steps = args
            .steps
            .iter()
            .map(|s| s.parse())
            .collect::<anyhow::Result<Vec<Step>>>()?;
        Ok(Self {
            width: args.width,
            height: args.height,
            chart,
            steps,
            output: args.output,
            tree: args.tree,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_chart() {
        let spec = ChartSpec::default();
        assert_eq!(spec.datasets.len(), 2);
        assert_eq!(spec.labels.len(), 6);
        assert!((spec.max_value() - 80.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_load_chart_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        std::fs::write(&path, r#"{"datasets": [[1, 2, 3]], "labels": ["a", "b", "c"]}"#).unwrap();

        let spec = ChartSpec::load(&path).unwrap();
        assert_eq!(spec.datasets, vec![vec![1.0, 2.0, 3.0]]);
        assert_eq!(spec.labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_load_rejects_empty_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        std::fs::write(&path, r#"{"datasets": [], "labels": []}"#).unwrap();
        assert!(ChartSpec::load(&path).is_err());
    }

    #[test]
    fn test_config_from_args() {
        let args = CliArgs::parse_from([
            "drawer-demo",
            "--width",
            "300",
            "--step",
            "tab",
            "--step",
            "click:190,25",
        ]);
        let config = DemoConfig::try_from(args).unwrap();
        assert_eq!(config.width, 300);
        assert_eq!(config.height, 400);
        assert_eq!(
            config.steps,
            vec![Step::Tab { backward: false }, Step::Click { x: 190.0, y: 25.0 }]
        );
    }
}
