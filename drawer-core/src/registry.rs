//! Registry of persistent shapes.
//!
//! Entries are kept in registration order: when clickable paths overlap,
//! the most recently registered entry is treated as the topmost one.

use std::fmt;

use indexmap::IndexMap;

use crate::shape::Callback;
use crate::{DrawerError, DrawerResult, Path2D};

/// Per-identifier record of a persistent shape.
#[derive(Clone)]
pub struct RegistryEntry {
    id: String,
    mirrored: bool,
    path: Path2D,
    clickable: bool,
    on_click: Option<Callback>,
}

impl RegistryEntry {
    fn new(id: &str, clickable: bool) -> Self {
        Self {
            id: id.to_string(),
            mirrored: false,
            path: Path2D::new(),
            clickable,
            on_click: None,
        }
    }

    /// Shape identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether an accessible element was created for this identifier.
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Path as of the last draw.
    #[must_use]
    pub fn path(&self) -> &Path2D {
        &self.path
    }

    /// Whether pointer clicks are routed to this entry.
    #[must_use]
    pub fn is_clickable(&self) -> bool {
        self.clickable
    }

    /// Click callback, if one was wired.
    #[must_use]
    pub fn on_click(&self) -> Option<&Callback> {
        self.on_click.as_ref()
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("id", &self.id)
            .field("mirrored", &self.mirrored)
            .field("clickable", &self.clickable)
            .field("has_on_click", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

/// Insertion-ordered table of persistent shapes keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl ShapeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identifier, or return the existing entry unchanged.
    pub fn register(&mut self, id: &str, clickable: bool) -> &RegistryEntry {
        if !self.entries.contains_key(id) {
            tracing::debug!("Registering shape {id:?} (clickable: {clickable})");
        }
        self.entries
            .entry(id.to_string())
            .or_insert_with(|| RegistryEntry::new(id, clickable))
    }

    /// Look up an entry.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    /// Whether an identifier is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Clickable entries, oldest first.
    pub fn clickable_entries(&self) -> impl DoubleEndedIterator<Item = &RegistryEntry> {
        self.entries.values().filter(|e| e.clickable)
    }

    fn entry_mut(&mut self, id: &str) -> DrawerResult<&mut RegistryEntry> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| DrawerError::ShapeNotFound(id.to_string()))
    }

    /// Store the path used for hit-testing.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::ShapeNotFound`] for an unregistered identifier.
    pub fn set_path(&mut self, id: &str, path: Path2D) -> DrawerResult<()> {
        self.entry_mut(id)?.path = path;
        Ok(())
    }

    /// Store the click callback invoked by the pointer dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::ShapeNotFound`] for an unregistered identifier.
    pub fn set_on_click(&mut self, id: &str, callback: Callback) -> DrawerResult<()> {
        self.entry_mut(id)?.on_click = Some(callback);
        Ok(())
    }

    /// Record that the accessible element exists.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::ShapeNotFound`] for an unregistered identifier.
    pub fn mark_mirrored(&mut self, id: &str) -> DrawerResult<()> {
        self.entry_mut(id)?.mirrored = true;
        Ok(())
    }

    /// Remove an entry, keeping the order of the rest.
    pub fn evict(&mut self, id: &str) -> Option<RegistryEntry> {
        let removed = self.entries.shift_remove(id);
        if removed.is_some() {
            tracing::debug!("Evicted shape {id:?}");
        }
        removed
    }

    /// Remove every entry, returning them in registration order.
    pub fn clear(&mut self) -> Vec<RegistryEntry> {
        self.entries.drain(..).map(|(_, entry)| entry).collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
