//! # Drawer Core
//!
//! Accessible, interactive shapes for pixel canvases.
//!
//! Shapes are rasterized into a drawing context and mirrored as shadow
//! elements in a document tree, so keyboard and screen-reader users reach
//! the same regions a pointer does.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                CanvasSession                │
//! ├─────────────────────────────────────────────┤
//! │  Shapes          │  Input                   │
//! │  - Filled paths  │  - Pointer dispatcher    │
//! │  - Text          │  - Focus / blur / Tab    │
//! │  - Shadow nodes  │  - Command queue         │
//! ├─────────────────────────────────────────────┤
//! │  Registry        │  Pixels                  │
//! │  - Ordered ids   │  - Drawing context       │
//! │  - Hit paths     │  - Focus ring            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use drawer_core::{CanvasSession, HostEvent, Rgb, ShapeConfig};
//!
//! let mut session = CanvasSession::raster(200, 100, Rgb::WHITE)?;
//! let mut bar = session.create_shape(
//!     "bar-0",
//!     ShapeConfig::button().with_fill_color("#4CAF50").with_aria_label("Bar 0"),
//! )?;
//! bar.path_mut()?.rect(10.0, 10.0, 50.0, 30.0);
//! bar.draw()?;
//! bar.on_click(|| println!("clicked"))?;
//!
//! session.dispatch(HostEvent::PointerClick { client_x: 30.0, client_y: 25.0 })?;
//! assert_eq!(session.pixel(30, 25), Some([76, 175, 80, 255]));
//! # Ok::<(), drawer_core::DrawerError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod context;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod event;
pub mod focus_ring;
pub mod path;
pub mod queue;
pub mod registry;
pub mod session;
pub mod shape;

pub use color::{contrast_ratio, find_contrasting_gray, luminance, to_hex, to_rgb, Rgb};
pub use context::raster::RasterContext;
pub use context::{DrawingContext, ImageData, TextAlign, TextBaseline};
pub use dispatcher::{ClickOutcome, PointerDispatcher};
pub use document::{Document, Node, NodeId, NodeSnapshot};
pub use error::{DrawerError, DrawerResult};
pub use event::{ClientRect, Cursor, HostEvent};
pub use focus_ring::draw_focus_ring;
pub use path::{Bounds, Path2D, PathCommand};
pub use queue::{Command, CommandQueue};
pub use registry::{RegistryEntry, ShapeRegistry};
pub use session::{CanvasSession, ShapeMut};
pub use shape::{
    Callback, FocusState, Shape, ShapeConfig, ShapeKind, TextContent, TextShapeSpec, TextStyle,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
