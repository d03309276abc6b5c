//! Host UI tree that carries the accessible shadow elements.
//!
//! The canvas element is an ordinary node of this tree; shapes mirror
//! themselves as its descendants so assistive technology and keyboard
//! navigation can reach them.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shape::Callback;
use crate::{DrawerError, DrawerResult};

/// Attribute carrying the identifier of the shape a node mirrors.
pub const DRAWER_ID_ATTR: &str = "drawer-id";

/// Attribute that makes a node keyboard reachable.
pub const TAB_INDEX_ATTR: &str = "tabindex";

/// Unique identifier for a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Create a new unique node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event handlers attached to a node.
#[derive(Clone, Default)]
pub struct NodeHandlers {
    /// Activation handler: focuses the node, then runs the callback.
    pub on_click: Option<Callback>,
    /// Click callback kept on the element of a transient shape. Pointer
    /// dispatch only consults the registry and never calls it; element
    /// activation goes through `on_click`.
    pub pointer_click: Option<Callback>,
    /// Shape whose focus indicator is drawn when the node gains focus.
    pub focus_shape: Option<String>,
    /// Shape whose focus indicator is removed when the node loses focus.
    pub blur_shape: Option<String>,
}

impl fmt::Debug for NodeHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeHandlers")
            .field("on_click", &self.on_click.is_some())
            .field("pointer_click", &self.pointer_click.is_some())
            .field("focus_shape", &self.focus_shape)
            .field("blur_shape", &self.blur_shape)
            .finish()
    }
}

/// A node in the document.
#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub(crate) handlers: NodeHandlers,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            handlers: NodeHandlers::default(),
        }
    }

    /// Lowercase element tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text content.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Parent node, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Registered handlers.
    #[must_use]
    pub fn handlers(&self) -> &NodeHandlers {
        &self.handlers
    }

    /// Whether the node takes part in keyboard navigation.
    #[must_use]
    pub fn is_keyboard_reachable(&self) -> bool {
        self.attribute(TAB_INDEX_ATTR)
            .and_then(|v| v.parse::<i32>().ok())
            .is_some_and(|v| v >= 0)
    }
}

/// Serializable view of a subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Element tag.
    pub tag: String,
    /// Attributes, sorted by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Whether the node currently holds focus.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub focused: bool,
    /// Child snapshots.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// An arena-backed element tree with a single focus slot.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    focused: Option<NodeId>,
}

impl Document {
    /// Create a document with an empty `body` root.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new("body"));
        Self {
            nodes,
            root,
            focused: None,
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId::new();
        self.nodes.insert(id, Node::new(tag));
        id
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> DrawerResult<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| DrawerError::NodeNotFound(id.to_string()))
    }

    /// Whether the node exists.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes, including the root and detached nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Set an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::NodeNotFound`] for an unknown node.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DrawerResult<()> {
        self.node_mut(id)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Read an attribute.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attribute(name))
    }

    /// Replace the text content.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::NodeNotFound`] for an unknown node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> DrawerResult<()> {
        self.node_mut(id)?.text = Some(text.to_string());
        Ok(())
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    #[must_use]
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.node(id).and_then(Node::parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.node(parent).and_then(Node::parent);
        }
        false
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::NodeNotFound`] for unknown nodes and
    /// [`DrawerError::InvalidParent`] if the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DrawerResult<()> {
        if !self.contains(parent) {
            return Err(DrawerError::NodeNotFound(parent.to_string()));
        }
        if !self.contains(child) {
            return Err(DrawerError::NodeNotFound(child.to_string()));
        }
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(DrawerError::InvalidParent(format!(
                "{child} cannot be placed under its own descendant {parent}"
            )));
        }

        self.detach(child);
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.nodes.get_mut(&id).and_then(|n| n.parent.take());
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
    }

    /// Detach a node and drop it together with its subtree.
    ///
    /// Focus is cleared if it was inside the removed subtree.
    ///
    /// # Errors
    ///
    /// Returns [`DrawerError::NodeNotFound`] for an unknown node and
    /// [`DrawerError::InvalidParent`] when asked to remove the root.
    pub fn remove(&mut self, id: NodeId) -> DrawerResult<()> {
        if id == self.root {
            return Err(DrawerError::InvalidParent("the root cannot be removed".to_string()));
        }
        if !self.contains(id) {
            return Err(DrawerError::NodeNotFound(id.to_string()));
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
            }
            if self.focused == Some(next) {
                self.focused = None;
            }
        }
        Ok(())
    }

    /// Direct children of `parent` whose attribute `name` equals `value`.
    #[must_use]
    pub fn children_with_attribute(&self, parent: NodeId, name: &str, value: &str) -> Vec<NodeId> {
        self.node(parent)
            .map(|p| {
                p.children
                    .iter()
                    .copied()
                    .filter(|c| self.attribute(*c, name) == Some(value))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First node below `ancestor`, depth first, whose attribute `name` equals `value`.
    #[must_use]
    pub fn find_descendant(&self, ancestor: NodeId, name: &str, value: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self
            .node(ancestor)?
            .children
            .iter()
            .rev()
            .copied()
            .collect();
        while let Some(id) = stack.pop() {
            if self.attribute(id, name) == Some(value) {
                return Some(id);
            }
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev());
            }
        }
        None
    }

    /// Currently focused node.
    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, id: Option<NodeId>) {
        self.focused = id;
    }

    /// Keyboard-reachable nodes in document order.
    #[must_use]
    pub fn keyboard_order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if node.is_keyboard_reachable() {
                order.push(id);
            }
            stack.extend(node.children.iter().rev());
        }
        order
    }

    /// Snapshot of the subtree rooted at `id`.
    #[must_use]
    pub fn snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.node(id)?;
        Some(NodeSnapshot {
            tag: node.tag.clone(),
            attributes: node.attributes.clone(),
            text: node.text.clone(),
            focused: self.focused == Some(id),
            children: node
                .children
                .iter()
                .filter_map(|c| self.snapshot(*c))
                .collect(),
        })
    }

    /// Serialize the whole tree to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DrawerResult<String> {
        serde_json::to_string_pretty(&self.snapshot(self.root)).map_err(DrawerError::Serialization)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
