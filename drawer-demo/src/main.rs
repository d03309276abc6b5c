//! # Drawer Demo
//!
//! Renders the accessible bar chart, replays scripted host events and
//! writes the final frame.

use clap::Parser;
use drawer_demo::{ChartDemo, CliArgs, DemoConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drawer_demo=info,drawer_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Drawer demo v{}", drawer_core::VERSION);

    let args = CliArgs::parse();
    let config = DemoConfig::try_from(args)?;

    tracing::info!(
        "Canvas {}x{}, {} datasets, {} steps",
        config.width,
        config.height,
        config.chart.datasets.len(),
        config.steps.len()
    );

    let mut demo = ChartDemo::new(&config)?;
    for step in &config.steps {
        if let Err(e) = demo.run(step) {
            tracing::warn!("Step {:?} failed: {}", step, e);
        }
    }

    demo.export(&config)?;
    tracing::info!("Drawer demo finished on dataset {}", demo.current_dataset());
    Ok(())
}
