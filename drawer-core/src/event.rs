//! Host input events delivered to a canvas session.

use serde::{Deserialize, Serialize};

use crate::document::NodeId;

/// Bounding rectangle of the canvas in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width in CSS pixels.
    pub width: f32,
    /// Height in CSS pixels.
    pub height: f32,
}

impl ClientRect {
    /// Rectangle at the origin with the given size.
    #[must_use]
    pub const fn at_origin(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Convert client coordinates to canvas-local coordinates.
    #[must_use]
    pub fn to_local(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        (client_x - self.left, client_y - self.top)
    }
}

/// Cursor style requested for the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    /// Platform default.
    #[default]
    Auto,
    /// Hand cursor over clickable shapes.
    Pointer,
}

/// An input event from the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Pointer click on the canvas, in client coordinates.
    PointerClick {
        /// Client X.
        client_x: f32,
        /// Client Y.
        client_y: f32,
    },
    /// Pointer moved over the canvas, in client coordinates.
    PointerMove {
        /// Client X.
        client_x: f32,
        /// Client Y.
        client_y: f32,
    },
    /// An element was activated (click or Enter on a shadow element).
    ElementClick {
        /// Activated node.
        node: NodeId,
    },
    /// An element received keyboard focus.
    Focus {
        /// Focused node.
        node: NodeId,
    },
    /// An element lost keyboard focus.
    Blur {
        /// Blurred node.
        node: NodeId,
    },
    /// Tab key: move focus to the next (or previous) reachable element.
    Tab {
        /// Shift held.
        backward: bool,
    },
}
