//! Error types for drawer operations.

use thiserror::Error;

/// Result type for drawer operations.
pub type DrawerResult<T> = Result<T, DrawerError>;

/// Errors that can occur while building, drawing or wiring shapes.
///
/// Every variant is a caller defect. Nothing is retried and no partial
/// shape is left registered when construction fails.
#[derive(Debug, Error)]
pub enum DrawerError {
    /// The rendering surface is not a canvas element.
    #[error("Invalid surface: {0}")]
    InvalidSurface(String),

    /// A persistent shape was constructed without an identifier.
    #[error("Shape must have an identifier")]
    MissingIdentifier,

    /// No drawing context was supplied.
    #[error("Drawing context is required")]
    MissingContext,

    /// Text drawing was requested without content.
    #[error("Text content is required")]
    MissingTextContent,

    /// Text drawing was requested without an `x`/`y` position.
    #[error("Text position (x and y) is required")]
    MissingTextPosition,

    /// An accessible element was attached outside the owning surface.
    #[error("Element must be a descendant of the canvas: {0}")]
    InvalidParent(String),

    /// A color string could not be parsed as 3 or 6 digit hex.
    #[error("Invalid color format: {0:?}")]
    InvalidColorFormat(String),

    /// A filled shape was drawn before any path was built.
    #[error("Shape {0:?} has an empty path")]
    EmptyPath(String),

    /// No shape with this identifier exists in the session.
    #[error("Shape not found: {0}")]
    ShapeNotFound(String),

    /// No node with this ID exists in the document.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Snapshot serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the pixel buffer to disk failed.
    #[cfg(feature = "png")]
    #[error("Export failed: {0}")]
    Export(String),
}
