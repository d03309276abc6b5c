//! Shapes: drawable regions mirrored into the accessible tree.
//!
//! A shape owns a vector path and a fill color. Drawing it rasterizes the
//! path into the pixel buffer and creates (once) a shadow element in the
//! document so keyboard and screen-reader users can reach it.
//!
//! Two variants share the lifecycle and differ in how focus is shown:
//!
//! ```text
//! ┌──────────────────┬───────────────────────┬──────────────────────┐
//! │ kind             │ focus                 │ blur                 │
//! ├──────────────────┼───────────────────────┼──────────────────────┤
//! │ FilledRegion     │ pixel ring on border  │ refill path          │
//! │ Text             │ redraw in alert color │ redraw in own color  │
//! └──────────────────┴───────────────────────┴──────────────────────┘
//! ```

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::color::{find_contrasting_gray, to_rgb};
use crate::context::{DrawingContext, TextAlign, TextBaseline};
use crate::document::{NodeId, DRAWER_ID_ATTR, TAB_INDEX_ATTR};
use crate::focus_ring::{draw_focus_ring, PathMask};
use crate::registry::RegistryEntry;
use crate::session::Host;
use crate::{DrawerError, DrawerResult, Path2D, Rgb};

/// Shared, single-threaded event callback.
pub type Callback = Rc<dyn Fn()>;

/// Tag used when none is configured.
pub const DEFAULT_TAG: &str = "div";

/// Tag that makes a shape clickable through the pointer dispatcher.
pub const BUTTON_TAG: &str = "button";

fn default_tag() -> String {
    DEFAULT_TAG.to_string()
}

fn default_fill_color() -> String {
    "#000".to_string()
}

fn default_text_color() -> String {
    "#FFF".to_string()
}

const fn default_persistent() -> bool {
    true
}

/// Options recognised when constructing a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    /// Semantic element kind of the shadow element.
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Accessible name.
    pub aria_label: String,
    /// Whether focus and blur handlers may be wired.
    pub focusable: bool,
    /// Fill color as hex.
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    /// Text drawn on top of the filled path.
    pub text_content: Option<TextContent>,
    /// Whether the identifier is tracked in the registry across redraws.
    #[serde(default = "default_persistent")]
    pub persistent: bool,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            tag: default_tag(),
            aria_label: String::new(),
            focusable: false,
            fill_color: default_fill_color(),
            text_content: None,
            persistent: default_persistent(),
        }
    }
}

impl ShapeConfig {
    /// Default configuration with a `button` tag.
    #[must_use]
    pub fn button() -> Self {
        Self::default().with_tag(BUTTON_TAG)
    }

    /// Set the element tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the accessible name.
    #[must_use]
    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = label.into();
        self
    }

    /// Set whether focus handlers may be wired.
    #[must_use]
    pub fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Set the fill color.
    #[must_use]
    pub fn with_fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = color.into();
        self
    }

    /// Draw text on top of the path.
    #[must_use]
    pub fn with_text_content(mut self, text: TextContent) -> Self {
        self.text_content = Some(text);
        self
    }

    /// Set persistence.
    #[must_use]
    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Whether the tag denotes a button.
    #[must_use]
    pub fn is_button(&self) -> bool {
        self.tag.eq_ignore_ascii_case(BUTTON_TAG)
    }
}

/// Text drawn over a filled shape.
///
/// `content`, `x` and `y` are required when drawing; they are optional here
/// so a configuration missing them can still be deserialized and rejected
/// with a precise error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// Text to draw.
    #[serde(default)]
    pub content: String,
    /// Anchor X.
    #[serde(default)]
    pub x: Option<f32>,
    /// Anchor Y.
    #[serde(default)]
    pub y: Option<f32>,
    /// Text color as hex.
    #[serde(default = "default_text_color")]
    pub color: String,
    /// Horizontal alignment.
    #[serde(default)]
    pub text_align: TextAlign,
    /// Vertical alignment.
    #[serde(default)]
    pub text_baseline: TextBaseline,
}

impl TextContent {
    /// White, left aligned, middle baseline text at a point.
    #[must_use]
    pub fn new(content: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            content: content.into(),
            x: Some(x),
            y: Some(y),
            color: default_text_color(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
        }
    }

    /// Set the color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set horizontal alignment.
    #[must_use]
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    /// Set vertical alignment.
    #[must_use]
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.text_baseline = baseline;
        self
    }
}

/// Description of a text-only shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShapeSpec {
    /// Text to draw.
    pub content: String,
    /// Text color as hex.
    #[serde(default = "default_fill_color")]
    pub color: String,
    /// Anchor X.
    pub x: f32,
    /// Anchor Y.
    pub y: f32,
    /// Horizontal alignment.
    #[serde(default)]
    pub align: TextAlign,
    /// Vertical alignment; the context's current baseline is kept when unset.
    #[serde(default)]
    pub baseline: Option<TextBaseline>,
}

impl TextShapeSpec {
    /// Black, left aligned text at a point.
    #[must_use]
    pub fn new(content: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            content: content.into(),
            color: default_fill_color(),
            x,
            y,
            align: TextAlign::default(),
            baseline: None,
        }
    }

    /// Set the color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set horizontal alignment.
    #[must_use]
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Set vertical alignment.
    #[must_use]
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = Some(baseline);
        self
    }
}

/// Resolved text style of a text shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Text to draw.
    pub content: String,
    /// Resting color.
    pub color: Rgb,
    /// Anchor X.
    pub x: f32,
    /// Anchor Y.
    pub y: f32,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical alignment.
    pub baseline: Option<TextBaseline>,
}

/// Draw and focus strategy of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Path filled pixel by pixel; focus draws a pixel ring.
    FilledRegion,
    /// Single line of text; focus recolors it.
    Text(TextStyle),
}

/// Focus state of a focusable shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusState {
    /// No focus indicator drawn.
    #[default]
    Unfocused,
    /// Focus indicator drawn and callback fired.
    Focused,
}

/// A drawable, interactive region.
pub struct Shape {
    id: String,
    kind: ShapeKind,
    tag: String,
    aria_label: String,
    focusable: bool,
    persistent: bool,
    fill_color: Rgb,
    text_content: Option<TextContent>,
    path: Path2D,
    element: Option<NodeId>,
    auto_semantic: bool,
    children: Vec<String>,
    on_click: Option<Callback>,
    on_focus: Option<Callback>,
    focus_state: FocusState,
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shape")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("tag", &self.tag)
            .field("persistent", &self.persistent)
            .field("element", &self.element)
            .field("focus_state", &self.focus_state)
            .finish_non_exhaustive()
    }
}

impl Shape {
    /// Validate the configuration and register the shape with the host.
    pub(crate) fn construct(
        host: &mut Host,
        id: &str,
        config: ShapeConfig,
        text: Option<TextShapeSpec>,
    ) -> DrawerResult<Self> {
        if config.persistent && id.is_empty() {
            return Err(DrawerError::MissingIdentifier);
        }
        let fill_color = to_rgb(&config.fill_color)?;
        let kind = match text {
            None => ShapeKind::FilledRegion,
            Some(spec) => ShapeKind::Text(TextStyle {
                color: to_rgb(&spec.color)?,
                content: spec.content,
                x: spec.x,
                y: spec.y,
                align: spec.align,
                baseline: spec.baseline,
            }),
        };

        let mut shape = Self {
            id: id.to_string(),
            kind,
            tag: config.tag.to_ascii_lowercase(),
            aria_label: config.aria_label,
            focusable: config.focusable,
            persistent: config.persistent,
            fill_color,
            text_content: config.text_content,
            path: Path2D::new(),
            element: None,
            auto_semantic: true,
            children: Vec::new(),
            on_click: None,
            on_focus: None,
            focus_state: FocusState::Unfocused,
        };

        if shape.persistent {
            match host.registry.find(id).map(RegistryEntry::is_mirrored) {
                None => {
                    host.registry.register(id, shape.tag == BUTTON_TAG);
                    host.ensure_dispatcher_installed();
                    host.context.begin_path();
                }
                Some(true) => shape.adopt_existing_element(host),
                Some(false) => {}
            }
        } else {
            shape.remove_stale_elements(host)?;
        }

        Ok(shape)
    }

    fn adopt_existing_element(&mut self, host: &Host) {
        self.element = host
            .document
            .find_descendant(host.canvas, DRAWER_ID_ATTR, &self.id);
    }

    fn remove_stale_elements(&self, host: &mut Host) -> DrawerResult<()> {
        for stale in host
            .document
            .children_with_attribute(host.canvas, DRAWER_ID_ATTR, &self.id)
        {
            tracing::debug!("Removing stale element for transient shape {:?}", self.id);
            host.document.remove(stale)?;
        }
        Ok(())
    }

    /// Shape identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Draw and focus strategy.
    #[must_use]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Element tag of the shadow element.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Accessible name.
    #[must_use]
    pub fn aria_label(&self) -> &str {
        &self.aria_label
    }

    /// Whether focus handlers may be wired.
    #[must_use]
    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    /// Whether the identifier is tracked in the registry.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Fill color of the path.
    #[must_use]
    pub fn fill_color(&self) -> Rgb {
        self.fill_color
    }

    /// Text drawn on top of the path.
    #[must_use]
    pub fn text_content(&self) -> Option<&TextContent> {
        self.text_content.as_ref()
    }

    /// The vector path.
    #[must_use]
    pub fn path(&self) -> &Path2D {
        &self.path
    }

    /// Mutable access for building the path before drawing.
    pub fn path_mut(&mut self) -> &mut Path2D {
        &mut self.path
    }

    /// Shadow element, once mirrored.
    #[must_use]
    pub fn element(&self) -> Option<NodeId> {
        self.element
    }

    /// Identifiers of child shapes.
    #[must_use]
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Current focus state.
    #[must_use]
    pub fn focus_state(&self) -> FocusState {
        self.focus_state
    }

    pub(crate) fn click_callback(&self) -> Option<Callback> {
        self.on_click.clone()
    }

    pub(crate) fn focus_callback(&self) -> Option<Callback> {
        self.on_focus.clone()
    }

    pub(crate) fn push_child(&mut self, id: &str) {
        self.children.push(id.to_string());
    }

    /// Create the shadow element unless it already exists.
    pub(crate) fn mirror(&mut self, host: &mut Host, text_override: Option<&str>) -> DrawerResult<()> {
        if self.persistent {
            let mirrored = host
                .registry
                .find(&self.id)
                .is_some_and(RegistryEntry::is_mirrored);
            if mirrored {
                if self.element.is_none() {
                    self.adopt_existing_element(host);
                }
                return Ok(());
            }
        } else if self.element.is_some_and(|e| host.document.contains(e)) {
            return Ok(());
        }

        let document = &mut host.document;
        let element = document.create_element(&self.tag);
        document.set_attribute(element, DRAWER_ID_ATTR, &self.id)?;
        document.set_attribute(element, TAB_INDEX_ATTR, "0")?;
        if self.tag == BUTTON_TAG {
            document.set_attribute(element, "type", "button")?;
        }
        if let Some(text) = text_override {
            document.set_text(element, text)?;
        }
        if !self.aria_label.is_empty() {
            document.set_attribute(element, "alt", &self.aria_label)?;
            document.set_attribute(element, "aria-label", &self.aria_label)?;
            if self.text_content.is_none() && text_override.is_none() {
                document.set_text(element, &self.aria_label)?;
            }
        }
        document.append_child(host.canvas, element)?;

        if self.persistent {
            host.registry.mark_mirrored(&self.id)?;
        }
        self.element = Some(element);
        tracing::debug!("Mirrored shape {:?} as <{}> {element}", self.id, self.tag);
        Ok(())
    }

    /// Use an existing node under the canvas as the shadow element.
    pub(crate) fn bind_element(&mut self, host: &mut Host, node: NodeId) -> DrawerResult<()> {
        if !host.document.is_descendant_of(node, host.canvas) {
            return Err(DrawerError::InvalidParent(format!(
                "node {node} is not inside the canvas"
            )));
        }
        self.element = Some(node);

        if self.persistent
            && host
                .registry
                .find(&self.id)
                .is_some_and(RegistryEntry::is_mirrored)
        {
            return Ok(());
        }

        host.document.set_attribute(node, DRAWER_ID_ATTR, &self.id)?;
        host.document.set_attribute(node, "alt", &self.aria_label)?;
        self.auto_semantic = false;
        if self.persistent {
            host.registry.mark_mirrored(&self.id)?;
        }
        Ok(())
    }

    /// Commit the shape: close the path, mirror it and rasterize it.
    pub(crate) fn draw(&mut self, host: &mut Host, suppress_path_close: bool) -> DrawerResult<()> {
        if matches!(self.kind, ShapeKind::Text(_)) {
            return self.draw_text(host, None, true);
        }

        if self.path.is_empty() {
            return Err(DrawerError::EmptyPath(self.id.clone()));
        }
        if !suppress_path_close {
            self.path.close_path();
        }
        if self.persistent {
            host.registry.set_path(&self.id, self.path.clone())?;
        }

        let blur_redraw = !self.persistent && suppress_path_close;
        if self.auto_semantic && !blur_redraw {
            self.mirror(host, None)?;
        }

        fill_path(host.context.as_mut(), &self.path, self.fill_color);
        tracing::trace!("Drew shape {:?}", self.id);

        if let Some(text) = self.text_content.clone() {
            self.add_text_content(host, &text)?;
        }
        Ok(())
    }

    /// Draw `text` and copy it onto the shadow element.
    pub(crate) fn add_text_content(&mut self, host: &mut Host, text: &TextContent) -> DrawerResult<()> {
        if text.content.is_empty() {
            return Err(DrawerError::MissingTextContent);
        }
        let (Some(x), Some(y)) = (text.x, text.y) else {
            return Err(DrawerError::MissingTextPosition);
        };
        let color = to_rgb(&text.color)?;

        let context = host.context.as_mut();
        context.set_fill_style(color);
        context.set_text_align(text.text_align);
        context.set_text_baseline(text.text_baseline);
        context.fill_text(&text.content, x, y);

        if let Some(element) = self.element {
            host.document.set_text(element, &text.content)?;
        }
        Ok(())
    }

    fn draw_text(&mut self, host: &mut Host, color: Option<Rgb>, mirror: bool) -> DrawerResult<()> {
        let ShapeKind::Text(style) = &self.kind else {
            return Ok(());
        };
        let style = style.clone();
        if style.content.is_empty() {
            return Err(DrawerError::MissingTextContent);
        }

        let context = host.context.as_mut();
        context.set_fill_style(color.unwrap_or(style.color));
        context.set_text_align(style.align);
        if let Some(baseline) = style.baseline {
            context.set_text_baseline(baseline);
        }
        context.fill_text(&style.content, style.x, style.y);

        if mirror && self.auto_semantic {
            self.mirror(host, Some(&style.content))?;
        }
        Ok(())
    }

    /// Store the click callback on the element and in the registry.
    pub(crate) fn on_click(&mut self, host: &mut Host, callback: Callback) -> DrawerResult<()> {
        self.on_click = Some(Rc::clone(&callback));

        if let Some(element) = self.element {
            host.document.node_mut(element)?.handlers.on_click = Some(Rc::clone(&callback));
        }

        if self.persistent {
            host.registry.set_on_click(&self.id, callback)?;
        } else if let Some(element) = self.element {
            host.document.node_mut(element)?.handlers.pointer_click = Some(callback);
        }
        Ok(())
    }

    /// Wire focus (and blur) for a focusable, mirrored shape.
    ///
    /// Returns `false` without wiring anything otherwise.
    pub(crate) fn on_focus(&mut self, host: &mut Host, callback: Callback) -> DrawerResult<bool> {
        let Some(element) = self.element.filter(|_| self.focusable) else {
            tracing::debug!("Shape {:?} is not focusable or not mirrored", self.id);
            return Ok(false);
        };
        self.on_focus = Some(callback);
        host.document.node_mut(element)?.handlers.focus_shape = Some(self.id.clone());
        self.on_blur(host)
    }

    /// Wire blur so the focus indicator is removed.
    pub(crate) fn on_blur(&mut self, host: &mut Host) -> DrawerResult<bool> {
        let Some(element) = self.element.filter(|_| self.focusable) else {
            return Ok(false);
        };
        host.document.node_mut(element)?.handlers.blur_shape = Some(self.id.clone());
        Ok(true)
    }

    /// Show the focus indicator. Returns the callback to fire, or `None`
    /// when the shape was already focused.
    pub(crate) fn focus(&mut self, host: &mut Host) -> DrawerResult<Option<Callback>> {
        if self.focus_state == FocusState::Focused {
            tracing::warn!("Ignoring focus on already focused shape {:?}", self.id);
            return Ok(None);
        }

        match &self.kind {
            ShapeKind::FilledRegion => {
                draw_focus_ring(host.context.as_mut(), &self.path);
            }
            ShapeKind::Text(style) => {
                let gray = find_contrasting_gray(&style.color.to_hex())?;
                tracing::trace!("Contrasting gray for {:?} is {gray}", self.id);
                self.draw_text(host, Some(Rgb::ALERT), false)?;
            }
        }

        self.focus_state = FocusState::Focused;
        Ok(self.on_focus.clone())
    }

    /// Remove the focus indicator by redrawing the shape. Does nothing when
    /// the shape is not focused.
    pub(crate) fn blur(&mut self, host: &mut Host) -> DrawerResult<()> {
        if self.focus_state == FocusState::Unfocused {
            tracing::warn!("Ignoring blur on unfocused shape {:?}", self.id);
            return Ok(());
        }

        if matches!(self.kind, ShapeKind::Text(_)) {
            self.draw_text(host, None, false)?;
        } else {
            self.draw(host, true)?;
        }
        self.focus_state = FocusState::Unfocused;
        Ok(())
    }
}

/// Overwrite every pixel inside `path` with `color` at full opacity.
pub(crate) fn fill_path(context: &mut dyn DrawingContext, path: &Path2D, color: Rgb) {
    let existing = context.get_image_data(0, 0, context.width(), context.height());
    let mut working = existing.clone();
    let mask = PathMask::build(context, path);
    for (x, y) in mask.inside_pixels() {
        working.set_pixel(x, y, color.to_rgba());
    }
    context.put_image_data(&working, 0, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_documented_values() {
        let config = ShapeConfig::default();
        assert_eq!(config.tag, "div");
        assert_eq!(config.fill_color, "#000");
        assert!(config.persistent);
        assert!(!config.focusable);
        assert!(config.text_content.is_none());
        assert!(!config.is_button());
        assert!(ShapeConfig::button().with_tag("BUTTON").is_button());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: ShapeConfig =
            serde_json::from_str(r#"{"tag": "button", "aria_label": "Barra 0"}"#).unwrap();
        assert!(config.is_button());
        assert_eq!(config.fill_color, "#000");
        assert!(config.persistent);

        let text: TextContent = serde_json::from_str(r#"{"content": "Hi", "x": 4}"#).unwrap();
        assert_eq!(text.color, "#FFF");
        assert_eq!(text.y, None);
        assert_eq!(text.text_align, TextAlign::Left);
        assert_eq!(text.text_baseline, TextBaseline::Middle);
    }

    #[test]
    fn fill_path_overwrites_inside_pixels_only() {
        use crate::context::raster::RasterContext;

        let mut context = RasterContext::with_background(10, 10, Rgb::WHITE).unwrap();
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0).line_to(8.0, 0.0).line_to(0.0, 8.0).close_path();
        fill_path(&mut context, &path, Rgb::new(1, 2, 3));

        assert_eq!(context.pixel(1, 1), Some([1, 2, 3, 255]));
        assert_eq!(context.pixel(4, 4), Some([1, 2, 3, 255]));
        assert_eq!(context.pixel(6, 6), Some([255, 255, 255, 255]));
    }
}
