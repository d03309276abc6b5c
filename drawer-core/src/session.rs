//! # Canvas Session
//!
//! Owns everything that is shared between the shapes drawn on one canvas:
//! the document holding the shadow elements, the drawing context, the
//! shape registry, the pointer dispatcher and the command queue.
//!
//! ```text
//! ┌──────────────────────────── CanvasSession ────────────────────────────┐
//! │ Host                                              │ shapes: id → Shape │
//! │  document ── canvas node ── shadow elements       │ queue: Command FIFO│
//! │  context (pixels)   registry   dispatcher   cursor│                    │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Host events go through [`CanvasSession::dispatch`], which queues the
//! resulting commands and drains them in order.

use std::collections::HashMap;
use std::rc::Rc;

use crate::context::raster::RasterContext;
use crate::context::{DrawingContext, ImageData};
use crate::dispatcher::{ClickOutcome, PointerDispatcher};
use crate::document::{Document, Node, NodeHandlers, NodeId, DRAWER_ID_ATTR};
use crate::event::{ClientRect, Cursor, HostEvent};
use crate::queue::{Command, CommandQueue};
use crate::registry::ShapeRegistry;
use crate::shape::{Callback, Shape, ShapeConfig, TextContent, TextShapeSpec};
use crate::{DrawerError, DrawerResult, Path2D, Rgb};

/// Tag the rendering surface must carry.
pub const CANVAS_TAG: &str = "canvas";

/// State shared by every shape on one surface.
pub(crate) struct Host {
    pub(crate) document: Document,
    pub(crate) canvas: NodeId,
    pub(crate) context: Box<dyn DrawingContext>,
    pub(crate) registry: ShapeRegistry,
    pub(crate) dispatcher: PointerDispatcher,
    pub(crate) rect: ClientRect,
    pub(crate) cursor: Cursor,
}

impl Host {
    pub(crate) fn ensure_dispatcher_installed(&mut self) {
        self.dispatcher.ensure_installed(self.canvas);
    }
}

/// A canvas surface with its shapes and accessible shadow tree.
pub struct CanvasSession {
    host: Host,
    shapes: HashMap<String, Shape>,
    queue: CommandQueue,
}

impl std::fmt::Debug for CanvasSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasSession")
            .field("canvas", &self.host.canvas)
            .field("shapes", &self.shapes.len())
            .field("registry", &self.host.registry.len())
            .field("pending", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl CanvasSession {
    /// Attach to the canvas node `canvas` of `document`.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::InvalidSurface`] if the node is missing or is
    /// not a canvas, and [`DrawerError::MissingContext`] if no context is
    /// given.
    #[allow(clippy::cast_precision_loss)]
    pub fn attach(
        document: Document,
        canvas: NodeId,
        context: Option<Box<dyn DrawingContext>>,
    ) -> DrawerResult<Self> {
        match document.node(canvas) {
            None => {
                return Err(DrawerError::InvalidSurface(format!(
                    "node {canvas} is not in the document"
                )))
            }
            Some(node) if node.tag() != CANVAS_TAG => {
                return Err(DrawerError::InvalidSurface(format!(
                    "<{}> is not a canvas",
                    node.tag()
                )))
            }
            Some(_) => {}
        }
        let context = context.ok_or(DrawerError::MissingContext)?;
        let rect = ClientRect::at_origin(context.width() as f32, context.height() as f32);

        tracing::debug!(
            "Attached session to canvas {canvas} ({}x{})",
            context.width(),
            context.height()
        );
        Ok(Self {
            host: Host {
                document,
                canvas,
                context,
                registry: ShapeRegistry::new(),
                dispatcher: PointerDispatcher::new(),
                rect,
                cursor: Cursor::Auto,
            },
            shapes: HashMap::new(),
            queue: CommandQueue::new(),
        })
    }

    /// Fresh document with a `<canvas>` under the root, backed by a
    /// [`RasterContext`] filled with `background`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be assembled.
    pub fn raster(width: u32, height: u32, background: Rgb) -> DrawerResult<Self> {
        let mut document = Document::new();
        let canvas = document.create_element(CANVAS_TAG);
        document.set_attribute(canvas, "width", &width.to_string())?;
        document.set_attribute(canvas, "height", &height.to_string())?;
        document.append_child(document.root(), canvas)?;
        let context = RasterContext::with_background(width, height, background)?;
        Self::attach(document, canvas, Some(Box::new(context)))
    }

    /// Position of the canvas in client coordinates.
    #[must_use]
    pub fn client_rect(&self) -> ClientRect {
        self.host.rect
    }

    /// Move the canvas in client coordinates.
    pub fn set_client_rect(&mut self, rect: ClientRect) {
        self.host.rect = rect;
    }

    // ========================================================================
    // Shapes
    // ========================================================================

    /// Construct a filled-region shape.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::MissingIdentifier`] for a persistent shape
    /// without an identifier, or [`DrawerError::InvalidColorFormat`] for a
    /// bad fill color.
    pub fn create_shape(&mut self, id: &str, config: ShapeConfig) -> DrawerResult<ShapeMut<'_>> {
        let shape = Shape::construct(&mut self.host, id, config, None)?;
        Ok(self.insert(shape))
    }

    /// Construct a text shape.
    ///
    /// # Errors
    ///
    /// As [`CanvasSession::create_shape`], plus
    /// [`DrawerError::InvalidColorFormat`] for a bad text color.
    pub fn create_text_shape(
        &mut self,
        id: &str,
        config: ShapeConfig,
        text: TextShapeSpec,
    ) -> DrawerResult<ShapeMut<'_>> {
        let shape = Shape::construct(&mut self.host, id, config, Some(text))?;
        Ok(self.insert(shape))
    }

    fn insert(&mut self, shape: Shape) -> ShapeMut<'_> {
        let id = shape.id().to_string();
        if self.shapes.insert(id.clone(), shape).is_some() {
            tracing::trace!("Replaced shape object for {id:?}");
        }
        ShapeMut { session: self, id }
    }

    /// Look up a shape.
    #[must_use]
    pub fn shape(&self, id: &str) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Handle for operating on an existing shape.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::ShapeNotFound`] if no such shape exists.
    pub fn shape_mut(&mut self, id: &str) -> DrawerResult<ShapeMut<'_>> {
        if !self.shapes.contains_key(id) {
            return Err(DrawerError::ShapeNotFound(id.to_string()));
        }
        Ok(ShapeMut {
            session: self,
            id: id.to_string(),
        })
    }

    /// Number of live shape objects.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    fn with_shape<R>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut Shape, &mut Host) -> DrawerResult<R>,
    ) -> DrawerResult<R> {
        let shape = self
            .shapes
            .get_mut(id)
            .ok_or_else(|| DrawerError::ShapeNotFound(id.to_string()))?;
        f(shape, &mut self.host)
    }

    /// Place `child` under `parent` in the accessible tree and hand it the
    /// parent's click and focus callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::ShapeNotFound`] for unknown identifiers and
    /// [`DrawerError::InvalidParent`] if the child has an element but the
    /// parent does not.
    pub fn add_child(&mut self, parent: &str, child: &str) -> DrawerResult<()> {
        let (parent_element, click, focus) = {
            let shape = self
                .shapes
                .get(parent)
                .ok_or_else(|| DrawerError::ShapeNotFound(parent.to_string()))?;
            (shape.element(), shape.click_callback(), shape.focus_callback())
        };

        self.with_shape(child, |shape, host| {
            let Some(element) = shape.element() else {
                return Ok(());
            };
            let Some(parent_element) = parent_element else {
                return Err(DrawerError::InvalidParent(format!(
                    "shape {parent:?} has no element to hold {child:?}"
                )));
            };
            host.document.append_child(parent_element, element)?;
            if let Some(callback) = click {
                shape.on_click(host, callback)?;
            }
            if let Some(callback) = focus {
                shape.on_focus(host, callback)?;
            }
            Ok(())
        })?;

        if let Some(shape) = self.shapes.get_mut(parent) {
            shape.push_child(child);
        }
        Ok(())
    }

    /// Forget a shape: drop its registry entry, its shadow element and the
    /// shape object.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::ShapeNotFound`] if nothing was known under `id`.
    pub fn evict(&mut self, id: &str) -> DrawerResult<()> {
        let entry = self.host.registry.evict(id);
        let shape = self.shapes.remove(id);
        if entry.is_none() && shape.is_none() {
            return Err(DrawerError::ShapeNotFound(id.to_string()));
        }

        self.remove_element(id, shape.as_ref())?;
        tracing::debug!("Evicted shape {id:?}");
        Ok(())
    }

    /// Evict every registered shape at once.
    ///
    /// Mirrored elements go with their entries, so a shape re-created under
    /// the same id mirrors a single fresh element. Transient shapes are not
    /// registered and stay.
    ///
    /// # Errors
    ///
    /// Returns an error if a shadow element cannot be detached.
    pub fn clear_registry(&mut self) -> DrawerResult<()> {
        let entries = self.host.registry.clear();
        tracing::debug!("Clearing {} registry entries", entries.len());
        for entry in entries {
            let shape = self.shapes.remove(entry.id());
            self.remove_element(entry.id(), shape.as_ref())?;
        }
        Ok(())
    }

    fn remove_element(&mut self, id: &str, shape: Option<&Shape>) -> DrawerResult<()> {
        let element = shape.and_then(Shape::element).or_else(|| {
            self.host
                .document
                .find_descendant(self.host.canvas, DRAWER_ID_ATTR, id)
        });
        if let Some(element) = element.filter(|e| self.host.document.contains(*e)) {
            self.host.document.remove(element)?;
        }
        Ok(())
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Queue the commands for a host event and drain the queue.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while draining.
    pub fn dispatch(&mut self, event: HostEvent) -> DrawerResult<()> {
        let command = match event {
            HostEvent::PointerClick { client_x, client_y } => {
                let (x, y) = self.host.rect.to_local(client_x, client_y);
                Command::PointerClick { x, y }
            }
            HostEvent::PointerMove { client_x, client_y } => {
                let (x, y) = self.host.rect.to_local(client_x, client_y);
                Command::PointerMove { x, y }
            }
            HostEvent::ElementClick { node } => Command::Activate { node },
            HostEvent::Focus { node } => Command::Focus { node },
            HostEvent::Blur { node } => Command::Blur { node },
            HostEvent::Tab { backward } => Command::FocusNext { backward },
        };
        self.enqueue(command);
        self.process_pending()?;
        Ok(())
    }

    /// Append a command without running it.
    pub fn enqueue(&mut self, command: Command) {
        tracing::trace!("Queued {command:?}");
        self.queue.enqueue(command);
    }

    /// Number of queued commands.
    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    /// Run queued commands in order until the queue is empty.
    ///
    /// A failing command discards the rest of the batch.
    ///
    /// # Errors
    ///
    /// Returns the error of the failing command.
    pub fn process_pending(&mut self) -> DrawerResult<usize> {
        let mut processed = 0;
        while let Some(command) = self.queue.pop() {
            if let Err(e) = self.execute(command) {
                let dropped = self.queue.len();
                self.queue.clear();
                if dropped > 0 {
                    tracing::debug!("Dropped {dropped} queued commands after error");
                }
                return Err(e);
            }
            processed += 1;
        }
        Ok(processed)
    }

    fn execute(&mut self, command: Command) -> DrawerResult<()> {
        match command {
            Command::Draw { id, suppress_close } => {
                self.with_shape(&id, |shape, host| shape.draw(host, suppress_close))
            }
            Command::Focus { node } => self.focus_node(node),
            Command::Blur { node } => self.blur_node(node),
            Command::Activate { node } => {
                self.focus_node(node)?;
                let callback = self.handlers_of(node)?.on_click.clone();
                if let Some(callback) = callback {
                    self.enqueue(Command::Invoke(callback));
                }
                Ok(())
            }
            Command::FocusNext { backward } => {
                if let Some(node) = self.next_in_tab_order(backward) {
                    self.focus_node(node)?;
                }
                Ok(())
            }
            Command::PointerClick { x, y } => {
                let host = &self.host;
                let outcome = host
                    .dispatcher
                    .click(&host.registry, host.context.as_ref(), x, y);
                if let ClickOutcome::Hit {
                    id,
                    callback: Some(callback),
                } = outcome
                {
                    tracing::debug!("Pointer click at ({x}, {y}) hit {id:?}");
                    self.enqueue(Command::Invoke(callback));
                }
                Ok(())
            }
            Command::PointerMove { x, y } => {
                let host = &mut self.host;
                host.cursor = host
                    .dispatcher
                    .pointer_move(&host.registry, host.context.as_ref(), x, y);
                Ok(())
            }
            Command::Invoke(callback) => {
                callback();
                Ok(())
            }
        }
    }

    fn handlers_of(&self, node: NodeId) -> DrawerResult<&NodeHandlers> {
        self.host
            .document
            .node(node)
            .map(Node::handlers)
            .ok_or_else(|| DrawerError::NodeNotFound(node.to_string()))
    }

    fn focus_node(&mut self, node: NodeId) -> DrawerResult<()> {
        let focus_shape = self.handlers_of(node)?.focus_shape.clone();
        if let Some(previous) = self.host.document.focused().filter(|p| *p != node) {
            self.blur_node(previous)?;
        }
        self.host.document.set_focused(Some(node));

        if let Some(id) = focus_shape {
            if let Some(callback) = self.with_shape(&id, |shape, host| shape.focus(host))? {
                self.enqueue(Command::Invoke(callback));
            }
        }
        Ok(())
    }

    fn blur_node(&mut self, node: NodeId) -> DrawerResult<()> {
        if self.host.document.focused() == Some(node) {
            self.host.document.set_focused(None);
        }
        let blur_shape = self
            .host
            .document
            .node(node)
            .and_then(|n| n.handlers().blur_shape.clone());
        if let Some(id) = blur_shape {
            self.with_shape(&id, |shape, host| shape.blur(host))?;
        }
        Ok(())
    }

    fn next_in_tab_order(&self, backward: bool) -> Option<NodeId> {
        let order = self.host.document.keyboard_order();
        let len = order.len();
        if len == 0 {
            return None;
        }
        let current = self
            .host
            .document
            .focused()
            .and_then(|f| order.iter().position(|n| *n == f));
        let next = match (current, backward) {
            (None, false) => 0,
            (None, true) => len - 1,
            (Some(i), false) => (i + 1) % len,
            (Some(i), true) => (i + len - 1) % len,
        };
        Some(order[next])
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The shape registry.
    #[must_use]
    pub fn registry(&self) -> &ShapeRegistry {
        &self.host.registry
    }

    /// The document holding the shadow elements.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.host.document
    }

    /// Mutable document, for adding nodes to bind shapes to.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.host.document
    }

    /// The canvas node.
    #[must_use]
    pub fn canvas(&self) -> NodeId {
        self.host.canvas
    }

    /// The drawing context.
    #[must_use]
    pub fn context(&self) -> &dyn DrawingContext {
        self.host.context.as_ref()
    }

    /// Mutable drawing context, for painting outside any shape.
    pub fn context_mut(&mut self) -> &mut dyn DrawingContext {
        self.host.context.as_mut()
    }

    /// Cursor requested by the last pointer move.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.host.cursor
    }

    /// The pointer dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &PointerDispatcher {
        &self.host.dispatcher
    }

    /// RGBA value of one pixel.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        self.host.context.get_image_data(x, y, 1, 1).pixel(0, 0)
    }

    /// Copy of the whole pixel buffer.
    #[must_use]
    pub fn image_data(&self) -> ImageData {
        let context = self.host.context.as_ref();
        context.get_image_data(0, 0, context.width(), context.height())
    }

    /// Write the pixel buffer as a PNG file.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::Export`] if encoding or writing fails.
    #[cfg(feature = "png")]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> DrawerResult<()> {
        self.image_data().save_png(path)
    }
}

/// Mutable handle to one shape of a session.
pub struct ShapeMut<'s> {
    session: &'s mut CanvasSession,
    id: String,
}

impl std::fmt::Debug for ShapeMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeMut").field("id", &self.id).finish()
    }
}

impl ShapeMut<'_> {
    /// Shape identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The shape.
    #[must_use]
    pub fn shape(&self) -> Option<&Shape> {
        self.session.shapes.get(&self.id)
    }

    /// The shadow element, once mirrored.
    #[must_use]
    pub fn element(&self) -> Option<NodeId> {
        self.shape().and_then(Shape::element)
    }

    /// Path to build before drawing.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::ShapeNotFound`] if the shape was evicted.
    pub fn path_mut(&mut self) -> DrawerResult<&mut Path2D> {
        self.session
            .shapes
            .get_mut(&self.id)
            .map(Shape::path_mut)
            .ok_or_else(|| DrawerError::ShapeNotFound(self.id.clone()))
    }

    /// Close the path, mirror the shape and rasterize it.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::EmptyPath`] if no path was built, or an error
    /// from drawing its text.
    pub fn draw(&mut self) -> DrawerResult<()> {
        self.draw_with(false)
    }

    /// Draw, optionally leaving the path open.
    ///
    /// # Errors
    ///
    /// As [`ShapeMut::draw`].
    pub fn draw_with(&mut self, suppress_path_close: bool) -> DrawerResult<()> {
        self.session.enqueue(Command::Draw {
            id: self.id.clone(),
            suppress_close: suppress_path_close,
        });
        self.session.process_pending().map(|_| ())
    }

    /// Create the shadow element if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the document rejects the element.
    pub fn mirror(&mut self) -> DrawerResult<()> {
        self.session
            .with_shape(&self.id, |shape, host| shape.mirror(host, None))
    }

    /// Use `node`, a descendant of the canvas, as the shadow element.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::InvalidParent`] if `node` is not inside the
    /// canvas.
    pub fn bind_element(&mut self, node: NodeId) -> DrawerResult<()> {
        self.session
            .with_shape(&self.id, |shape, host| shape.bind_element(host, node))
    }

    /// Draw text and copy it onto the shadow element.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::MissingTextContent`] or
    /// [`DrawerError::MissingTextPosition`] for incomplete text.
    pub fn add_text_content(&mut self, text: &TextContent) -> DrawerResult<()> {
        self.session
            .with_shape(&self.id, |shape, host| shape.add_text_content(host, text))
    }

    /// Run `callback` when the shape is clicked or activated.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape or its element disappeared.
    pub fn on_click(&mut self, callback: impl Fn() + 'static) -> DrawerResult<()> {
        let callback: Callback = Rc::new(callback);
        self.session
            .with_shape(&self.id, |shape, host| shape.on_click(host, callback))
    }

    /// Run `callback` when the shadow element gains focus. Only wires
    /// anything for focusable, mirrored shapes; returns whether it did.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape or its element disappeared.
    pub fn on_focus(&mut self, callback: impl Fn() + 'static) -> DrawerResult<bool> {
        let callback: Callback = Rc::new(callback);
        self.session
            .with_shape(&self.id, |shape, host| shape.on_focus(host, callback))
    }

    /// Remove the focus indicator when the shadow element loses focus.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape or its element disappeared.
    pub fn on_blur(&mut self) -> DrawerResult<bool> {
        self.session
            .with_shape(&self.id, |shape, host| shape.on_blur(host))
    }

    /// Make `child` a child of this shape.
    ///
    /// # Errors
    ///
    /// As [`CanvasSession::add_child`].
    pub fn add_child(&mut self, child: &str) -> DrawerResult<()> {
        let parent = self.id.clone();
        self.session.add_child(&parent, child)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::shape::FocusState;

    fn session() -> CanvasSession {
        CanvasSession::raster(100, 60, Rgb::WHITE).unwrap()
    }

    fn bar(session: &mut CanvasSession, id: &str) -> NodeId {
        let mut shape = session
            .create_shape(
                id,
                ShapeConfig::button()
                    .with_fill_color("#4CAF50")
                    .with_focusable(true),
            )
            .unwrap();
        shape.path_mut().unwrap().rect(10.0, 10.0, 50.0, 30.0);
        shape.draw().unwrap();
        shape.element().unwrap()
    }

    #[test]
    fn attach_rejects_non_canvas_nodes() {
        let mut document = Document::new();
        let div = document.create_element("div");
        let context: Box<dyn DrawingContext> = Box::new(RasterContext::new(10, 10).unwrap());
        let err = CanvasSession::attach(document, div, Some(context)).unwrap_err();
        assert!(matches!(err, DrawerError::InvalidSurface(_)));
    }

    #[test]
    fn attach_requires_context() {
        let mut document = Document::new();
        let canvas = document.create_element("canvas");
        let err = CanvasSession::attach(document, canvas, None).unwrap_err();
        assert!(matches!(err, DrawerError::MissingContext));
    }

    #[test]
    fn draw_mirrors_and_paints() {
        let mut session = session();
        let element = bar(&mut session, "bar-0");

        assert_eq!(session.pixel(30, 25), Some([76, 175, 80, 255]));
        assert_eq!(session.pixel(0, 0), Some([255, 255, 255, 255]));
        let node = session.document().node(element).unwrap();
        assert_eq!(node.tag(), "button");
        assert_eq!(node.parent(), Some(session.canvas()));
        assert!(session.dispatcher().is_installed());
    }

    #[test]
    fn pointer_click_fires_once() {
        let mut session = session();
        bar(&mut session, "bar-0");
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        session
            .shape_mut("bar-0")
            .unwrap()
            .on_click(move || counter.set(counter.get() + 1))
            .unwrap();

        session
            .dispatch(HostEvent::PointerClick {
                client_x: 30.0,
                client_y: 25.0,
            })
            .unwrap();
        session
            .dispatch(HostEvent::PointerClick {
                client_x: 5.0,
                client_y: 5.0,
            })
            .unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn client_rect_offsets_pointer() {
        let mut session = session();
        bar(&mut session, "bar-0");
        session.set_client_rect(ClientRect {
            left: 100.0,
            top: 50.0,
            width: 100.0,
            height: 60.0,
        });
        session
            .dispatch(HostEvent::PointerMove {
                client_x: 130.0,
                client_y: 75.0,
            })
            .unwrap();
        assert_eq!(session.cursor(), Cursor::Pointer);
        session
            .dispatch(HostEvent::PointerMove {
                client_x: 30.0,
                client_y: 25.0,
            })
            .unwrap();
        assert_eq!(session.cursor(), Cursor::Auto);
    }

    #[test]
    fn focus_moves_between_nodes() {
        let mut session = session();
        let first = bar(&mut session, "bar-0");
        session.shape_mut("bar-0").unwrap().on_focus(|| {}).unwrap();
        let second = session.document_mut().create_element("a");
        let canvas = session.canvas();
        session.document_mut().append_child(canvas, second).unwrap();

        session.dispatch(HostEvent::Focus { node: first }).unwrap();
        assert_eq!(
            session.shape("bar-0").unwrap().focus_state(),
            FocusState::Focused
        );
        session.dispatch(HostEvent::Focus { node: second }).unwrap();
        assert_eq!(session.document().focused(), Some(second));
        assert_eq!(
            session.shape("bar-0").unwrap().focus_state(),
            FocusState::Unfocused
        );
    }

    #[test]
    fn evict_drops_entry_and_element() {
        let mut session = session();
        let element = bar(&mut session, "bar-0");

        session.evict("bar-0").unwrap();
        assert!(!session.registry().contains("bar-0"));
        assert!(!session.document().contains(element));
        assert!(session.shape("bar-0").is_none());
        assert!(matches!(
            session.evict("bar-0"),
            Err(DrawerError::ShapeNotFound(_))
        ));
    }

    #[test]
    fn failed_command_discards_batch() {
        let mut session = session();
        session.enqueue(Command::Draw {
            id: "missing".to_string(),
            suppress_close: false,
        });
        session.enqueue(Command::PointerMove { x: 0.0, y: 0.0 });
        assert!(session.process_pending().is_err());
        assert_eq!(session.pending_commands(), 0);
    }
}
