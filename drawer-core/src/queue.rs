//! # Command Queue
//!
//! Host events and draw requests are turned into commands and drained one
//! at a time, so every pixel read-modify-write finishes before the next
//! command observes the buffer.
//!
//! ```text
//! HostEvent ──► dispatch ──► CommandQueue ──► process_pending
//!                             (FIFO)           one command at a time
//! ```

use std::collections::VecDeque;
use std::fmt;

use crate::document::NodeId;
use crate::shape::Callback;

/// A unit of work for the session.
#[derive(Clone)]
pub enum Command {
    /// Commit a shape.
    Draw {
        /// Shape identifier.
        id: String,
        /// Leave the path open.
        suppress_close: bool,
    },
    /// Move keyboard focus to a node, blurring the previous one.
    Focus {
        /// Node gaining focus.
        node: NodeId,
    },
    /// Remove keyboard focus from a node.
    Blur {
        /// Node losing focus.
        node: NodeId,
    },
    /// Focus a node and run its activation handler.
    Activate {
        /// Activated node.
        node: NodeId,
    },
    /// Move focus to the next (or previous) keyboard-reachable node.
    FocusNext {
        /// Walk the tab order backwards.
        backward: bool,
    },
    /// Route a pointer click in canvas-local coordinates.
    PointerClick {
        /// Local X.
        x: f32,
        /// Local Y.
        y: f32,
    },
    /// Update the cursor for a pointer in canvas-local coordinates.
    PointerMove {
        /// Local X.
        x: f32,
        /// Local Y.
        y: f32,
    },
    /// Run a caller callback.
    Invoke(Callback),
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draw { id, suppress_close } => f
                .debug_struct("Draw")
                .field("id", id)
                .field("suppress_close", suppress_close)
                .finish(),
            Self::Focus { node } => f.debug_struct("Focus").field("node", node).finish(),
            Self::Blur { node } => f.debug_struct("Blur").field("node", node).finish(),
            Self::Activate { node } => f.debug_struct("Activate").field("node", node).finish(),
            Self::FocusNext { backward } => f
                .debug_struct("FocusNext")
                .field("backward", backward)
                .finish(),
            Self::PointerClick { x, y } => f
                .debug_struct("PointerClick")
                .field("x", x)
                .field("y", y)
                .finish(),
            Self::PointerMove { x, y } => f
                .debug_struct("PointerMove")
                .field("x", x)
                .field("y", y)
                .finish(),
            Self::Invoke(_) => write!(f, "Invoke(..)"),
        }
    }
}

/// FIFO of pending commands.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    pub fn enqueue(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Take the oldest command.
    pub fn pop(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }

    /// Peek at pending commands without removing them.
    pub fn pending(&self) -> impl Iterator<Item = &Command> {
        self.pending.iter()
    }

    /// Number of pending commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending command.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
