//! The bar chart and its event loop.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::anyhow;
use drawer_core::{
    CanvasSession, DrawerResult, HostEvent, NodeId, Path2D, Rgb, Shape, ShapeConfig,
    TextAlign, TextBaseline, TextContent,
};

use crate::{ChartSpec, DemoConfig, Step};

const BAR_COLOR: &str = "#4CAF50";
const BUTTON_COLOR: &str = "#2196F3";
const BAR_WIDTH: f32 = 50.0;
const BAR_SPACING: f32 = 70.0;
const MARGIN: f32 = 50.0;

/// Bar chart with dataset navigation buttons.
pub struct ChartDemo {
    session: CanvasSession,
    chart: ChartSpec,
    current: usize,
    shift: Rc<Cell<i32>>,
    bar_clicks: Rc<Cell<u32>>,
}

impl std::fmt::Debug for ChartDemo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartDemo")
            .field("session", &self.session)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl ChartDemo {
    /// Create the canvas and draw the first dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart has no dataset or drawing fails.
    pub fn new(config: &DemoConfig) -> anyhow::Result<Self> {
        if config.chart.datasets.is_empty() {
            anyhow::bail!("chart has no datasets");
        }
        let session = CanvasSession::raster(config.width, config.height, Rgb::WHITE)?;
        let mut demo = Self {
            session,
            chart: config.chart.clone(),
            current: 0,
            shift: Rc::new(Cell::new(0)),
            bar_clicks: Rc::new(Cell::new(0)),
        };
        demo.draw_chart()?;
        Ok(demo)
    }

    /// The canvas session.
    #[must_use]
    pub fn session(&self) -> &CanvasSession {
        &self.session
    }

    /// Index of the dataset on screen.
    #[must_use]
    pub fn current_dataset(&self) -> usize {
        self.current
    }

    /// How many times a bar was activated.
    #[must_use]
    pub fn bar_clicks(&self) -> u32 {
        self.bar_clicks.get()
    }

    /// Redraw the whole chart for the current dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if a shape cannot be built or drawn.
    #[allow(clippy::cast_precision_loss)]
    pub fn draw_chart(&mut self) -> DrawerResult<()> {
        let width = self.session.context().width() as f32;
        let height = self.session.context().height() as f32;
        let baseline_y = height - MARGIN;

        let max_value = self.chart.max_value() + 10.0;
        let scale = (height - 2.0 * MARGIN - 20.0) / max_value;

        let context = self.session.context_mut();
        context.clear_rect(0.0, 0.0, width, height);
        context.set_fill_style(Rgb::WHITE);
        context.fill_rect(0.0, 0.0, width, height);
        let mut axes = Path2D::new();
        axes.rect(MARGIN, baseline_y - 1.0, width - 2.0 * MARGIN, 2.0)
            .rect(MARGIN - 1.0, MARGIN, 2.0, height - 2.0 * MARGIN);
        context.set_fill_style(Rgb::BLACK);
        context.fill_path(&axes);

        let values = self.chart.datasets.get(self.current).cloned().unwrap_or_default();
        for (index, value) in values.into_iter().enumerate() {
            let x = MARGIN + index as f32 * BAR_SPACING;
            let y = baseline_y - value * scale;
            self.draw_bar(index, x, y, baseline_y - y)?;
        }

        let context = self.session.context_mut();
        context.set_fill_style(Rgb::BLACK);
        context.set_text_align(TextAlign::Left);
        context.set_text_baseline(TextBaseline::Alphabetic);
        for (index, label) in self.chart.labels.iter().enumerate() {
            let x = MARGIN + index as f32 * BAR_SPACING + BAR_WIDTH / 2.0
                - context.measure_text(label) / 2.0;
            context.fill_text(label, x, height - 20.0);
        }

        context.set_text_align(TextAlign::Right);
        let mut tick = 0.0;
        while tick <= max_value {
            let y = baseline_y - tick * scale;
            context.fill_text(&tick.to_string(), MARGIN - 5.0, y + 5.0);
            tick += 10.0;
        }

        self.draw_button(50.0, 10.0, "Anterior", -1)?;
        self.draw_button(150.0, 10.0, "Próximo", 1)?;
        tracing::debug!("Drew dataset {}", self.current);
        Ok(())
    }

    fn draw_bar(&mut self, index: usize, x: f32, y: f32, bar_height: f32) -> DrawerResult<()> {
        let config = ShapeConfig::button()
            .with_aria_label(format!("Barra {index}"))
            .with_focusable(true)
            .with_fill_color(BAR_COLOR)
            .with_persistent(false);
        let mut bar = self.session.create_shape(&format!("bar-{index}"), config)?;
        bar.path_mut()?.rect(x, y, BAR_WIDTH, bar_height);
        bar.draw()?;
        bar.on_focus(move || tracing::info!("Focused bar {index}"))?;
        let clicks = Rc::clone(&self.bar_clicks);
        bar.on_click(move || {
            clicks.set(clicks.get() + 1);
            tracing::info!("Clicked bar {index}");
        })
    }

    fn draw_button(&mut self, x: f32, y: f32, text: &str, direction: i32) -> DrawerResult<()> {
        let content = TextContent::new(text, x + 40.0, y + 15.0).with_align(TextAlign::Center);
        let config = ShapeConfig::button()
            .with_focusable(true)
            .with_fill_color(BUTTON_COLOR)
            .with_text_content(content);
        let mut button = self.session.create_shape(&format!("button={text}"), config)?;
        button.path_mut()?.rect(x, y, 80.0, 30.0);
        button.draw()?;
        button.on_focus(|| {})?;
        let shift = Rc::clone(&self.shift);
        button.on_click(move || shift.set(shift.get() + direction))
    }

    fn element_of(&self, id: &str) -> anyhow::Result<NodeId> {
        self.session
            .shape(id)
            .and_then(Shape::element)
            .ok_or_else(|| anyhow!("shape {id:?} has no element"))
    }

    /// Replay one step, then redraw if a button changed the dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the step names an unknown shape or handling the
    /// event fails.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub fn run(&mut self, step: &Step) -> anyhow::Result<()> {
        let event = match step {
            Step::Click { x, y } => HostEvent::PointerClick {
                client_x: *x,
                client_y: *y,
            },
            Step::Move { x, y } => HostEvent::PointerMove {
                client_x: *x,
                client_y: *y,
            },
            Step::Tab { backward } => HostEvent::Tab {
                backward: *backward,
            },
            Step::Focus(id) => HostEvent::Focus {
                node: self.element_of(id)?,
            },
            Step::Blur(id) => HostEvent::Blur {
                node: self.element_of(id)?,
            },
            Step::Activate(id) => HostEvent::ElementClick {
                node: self.element_of(id)?,
            },
        };
        tracing::info!("Step {step:?}");
        self.session.dispatch(event)?;

        if matches!(step, Step::Move { .. }) {
            tracing::info!("Cursor: {:?}", self.session.cursor());
        }

        let shift = self.shift.replace(0);
        if shift != 0 {
            let count = self.chart.datasets.len() as i32;
            let forward = shift.rem_euclid(count) as usize;
            self.current = (self.current + forward) % self.chart.datasets.len();
            tracing::info!("Switched to dataset {}", self.current);
            self.draw_chart()?;
        }
        Ok(())
    }

    /// Write the frame and, if configured, the accessible tree.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written.
    pub fn export(&self, config: &DemoConfig) -> anyhow::Result<()> {
        self.session.save_png(&config.output)?;
        tracing::info!("Wrote frame to {}", config.output.display());
        if let Some(ref tree) = config.tree {
            std::fs::write(tree, self.session.document().to_json()?)?;
            tracing::info!("Wrote accessible tree to {}", tree.display());
        }
        Ok(())
    }
}
