//! Pointer dispatch for the canvas surface.
//!
//! A single listener per surface resolves pointer positions to registered
//! clickable shapes. Overlaps are settled by registration order: entries
//! are tested newest first and the first hit wins, so exactly one callback
//! fires per click.

use crate::context::DrawingContext;
use crate::document::NodeId;
use crate::event::Cursor;
use crate::registry::{RegistryEntry, ShapeRegistry};
use crate::shape::Callback;

/// Result of routing a pointer click.
#[derive(Clone)]
pub enum ClickOutcome {
    /// No listener is installed on the surface yet.
    NotInstalled,
    /// The click hit no clickable shape.
    Miss,
    /// The topmost clickable shape under the pointer.
    Hit {
        /// Identifier of the hit shape.
        id: String,
        /// Its click callback, if one was wired.
        callback: Option<Callback>,
    },
}

impl ClickOutcome {
    /// Identifier of the hit shape.
    #[must_use]
    pub fn hit_id(&self) -> Option<&str> {
        match self {
            Self::Hit { id, .. } => Some(id),
            Self::NotInstalled | Self::Miss => None,
        }
    }
}

impl std::fmt::Debug for ClickOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInstalled => write!(f, "NotInstalled"),
            Self::Miss => write!(f, "Miss"),
            Self::Hit { id, callback } => f
                .debug_struct("Hit")
                .field("id", id)
                .field("has_callback", &callback.is_some())
                .finish(),
        }
    }
}

/// Shared pointer listener for one canvas surface.
#[derive(Debug, Clone, Default)]
pub struct PointerDispatcher {
    surface: Option<NodeId>,
}

impl PointerDispatcher {
    /// Create a dispatcher with no listener installed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the listener on `surface` unless it already is.
    ///
    /// Returns `true` only on the call that installed it.
    pub fn ensure_installed(&mut self, surface: NodeId) -> bool {
        if self.surface.is_some() {
            return false;
        }
        tracing::debug!("Installing pointer dispatcher on surface {surface}");
        self.surface = Some(surface);
        true
    }

    /// Whether the listener is installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.surface.is_some()
    }

    /// Topmost clickable entry containing the canvas-local point.
    #[must_use]
    pub fn hit_test<'r>(
        registry: &'r ShapeRegistry,
        context: &dyn DrawingContext,
        x: f32,
        y: f32,
    ) -> Option<&'r RegistryEntry> {
        registry
            .clickable_entries()
            .rev()
            .find(|entry| context.is_point_in_path(entry.path(), x, y))
    }

    /// Route a click at canvas-local coordinates.
    #[must_use]
    pub fn click(
        &self,
        registry: &ShapeRegistry,
        context: &dyn DrawingContext,
        x: f32,
        y: f32,
    ) -> ClickOutcome {
        if !self.is_installed() {
            return ClickOutcome::NotInstalled;
        }
        match Self::hit_test(registry, context, x, y) {
            Some(entry) => {
                if entry.on_click().is_none() {
                    tracing::warn!("Click hit {:?} which has no callback", entry.id());
                }
                ClickOutcome::Hit {
                    id: entry.id().to_string(),
                    callback: entry.on_click().cloned(),
                }
            }
            None => {
                tracing::trace!("Click at ({x}, {y}) hit nothing");
                ClickOutcome::Miss
            }
        }
    }

    /// Cursor for a pointer at canvas-local coordinates.
    #[must_use]
    pub fn pointer_move(
        &self,
        registry: &ShapeRegistry,
        context: &dyn DrawingContext,
        x: f32,
        y: f32,
    ) -> Cursor {
        let over_clickable = self.is_installed()
            && registry
                .clickable_entries()
                .any(|entry| context.is_point_in_path(entry.path(), x, y));
        if over_clickable {
            Cursor::Pointer
        } else {
            Cursor::Auto
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::context::raster::RasterContext;
    use crate::Path2D;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Path2D {
        let mut path = Path2D::new();
        path.rect(x, y, w, h);
        path
    }

    fn registry_with_overlap() -> ShapeRegistry {
        let mut registry = ShapeRegistry::new();
        registry.register("a", true);
        registry.register("b", true);
        registry.register("label", false);
        registry.set_path("a", rect(0.0, 0.0, 20.0, 20.0)).unwrap();
        registry.set_path("b", rect(10.0, 10.0, 20.0, 20.0)).unwrap();
        registry.set_path("label", rect(0.0, 0.0, 40.0, 40.0)).unwrap();
        registry
    }

    #[test]
    fn install_happens_once() {
        let mut dispatcher = PointerDispatcher::new();
        let surface = NodeId::new();
        assert!(dispatcher.ensure_installed(surface));
        assert!(!dispatcher.ensure_installed(surface));
        assert!(dispatcher.is_installed());
    }

    #[test]
    fn clicks_are_ignored_before_install() {
        let dispatcher = PointerDispatcher::new();
        let context = RasterContext::new(40, 40).unwrap();
        let outcome = dispatcher.click(&registry_with_overlap(), &context, 5.0, 5.0);
        assert!(matches!(outcome, ClickOutcome::NotInstalled));
        assert_eq!(outcome.hit_id(), None);
    }

    #[test]
    fn last_registered_wins_on_overlap() {
        let mut dispatcher = PointerDispatcher::new();
        dispatcher.ensure_installed(NodeId::new());
        let context = RasterContext::new(40, 40).unwrap();
        let registry = registry_with_overlap();

        assert_eq!(dispatcher.click(&registry, &context, 15.0, 15.0).hit_id(), Some("b"));
        assert_eq!(dispatcher.click(&registry, &context, 5.0, 5.0).hit_id(), Some("a"));
        // Non-clickable entries never take the click.
        let miss = dispatcher.click(&registry, &context, 35.0, 5.0);
        assert!(matches!(miss, ClickOutcome::Miss));
    }

    #[test]
    fn hit_carries_the_callback() {
        let mut dispatcher = PointerDispatcher::new();
        dispatcher.ensure_installed(NodeId::new());
        let context = RasterContext::new(40, 40).unwrap();
        let mut registry = registry_with_overlap();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        registry
            .set_on_click("b", Rc::new(move || counter.set(counter.get() + 1)))
            .unwrap();

        if let ClickOutcome::Hit {
            callback: Some(callback),
            ..
        } = dispatcher.click(&registry, &context, 25.0, 25.0)
        {
            callback();
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn cursor_tracks_clickable_paths() {
        let mut dispatcher = PointerDispatcher::new();
        dispatcher.ensure_installed(NodeId::new());
        let context = RasterContext::new(40, 40).unwrap();
        let registry = registry_with_overlap();

        assert_eq!(dispatcher.pointer_move(&registry, &context, 15.0, 15.0), Cursor::Pointer);
        assert_eq!(dispatcher.pointer_move(&registry, &context, 35.0, 35.0), Cursor::Auto);
    }
}
