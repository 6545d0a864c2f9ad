//! The page document the engine drives.
//!
//! A mutable element tree with the handful of operations the injection
//! engine needs: structural queries, attribute markers, child insertion
//! and removal, and a broadcast of every mutation so observers can react
//! to the page changing under them. Host events fired at elements
//! (`input`, `change`, ...) land in an event log observers can read back.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::trace;

use replymesh_protocols::error::InjectError;

use crate::locator::Locator;

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;

/// Identifier of a node within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

impl NodeId {
    /// Parse the form produced by `Display`.
    pub fn parse(s: &str) -> Option<NodeId> {
        s.strip_prefix("node-")?.parse().ok().map(NodeId)
    }
}

/// One observed document change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    AttributeChanged(NodeId),
    TextChanged(NodeId),
    /// The document is shutting down; observers should stop.
    Closed,
}

struct Node {
    tag: String,
    attributes: HashMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct Inner {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
    events: Vec<(NodeId, String)>,
}

/// A live page document.
pub struct PageDocument {
    inner: Mutex<Inner>,
    mutations: broadcast::Sender<Mutation>,
}

impl Default for PageDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PageDocument {
    /// An empty document holding just a `body` root.
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                tag: "body".to_string(),
                attributes: HashMap::new(),
                text: String::new(),
                parent: None,
                children: Vec::new(),
            },
        );
        let (mutations, _) = broadcast::channel(256);
        Self {
            inner: Mutex::new(Inner {
                nodes,
                root,
                next_id: 1,
                events: Vec::new(),
            }),
            mutations,
        }
    }

    pub fn root(&self) -> NodeId {
        self.inner.lock().root
    }

    /// Watch every mutation from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Mutation> {
        self.mutations.subscribe()
    }

    /// Announce shutdown to observers.
    pub fn close(&self) {
        self.emit(Mutation::Closed);
    }

    /// Create an element and attach it under `parent`.
    pub fn create_under(&self, parent: NodeId, tag: &str) -> Result<NodeId, InjectError> {
        let id = {
            let mut inner = self.inner.lock();
            if !inner.nodes.contains_key(&parent) {
                return Err(InjectError::NodeGone(parent.to_string()));
            }
            let id = NodeId(inner.next_id);
            inner.next_id += 1;
            inner.nodes.insert(
                id,
                Node {
                    tag: tag.to_string(),
                    attributes: HashMap::new(),
                    text: String::new(),
                    parent: Some(parent),
                    children: Vec::new(),
                },
            );
            if let Some(parent_node) = inner.nodes.get_mut(&parent) {
                parent_node.children.push(id);
            }
            id
        };
        trace!(%id, tag, "Node added");
        self.emit(Mutation::NodeAdded(id));
        Ok(id)
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&self, node: NodeId) -> Result<(), InjectError> {
        {
            let mut inner = self.inner.lock();
            if !inner.nodes.contains_key(&node) {
                return Err(InjectError::NodeGone(node.to_string()));
            }
            if node == inner.root {
                return Err(InjectError::NodeGone(node.to_string()));
            }
            let parent = inner.nodes.get(&node).and_then(|n| n.parent);
            if let Some(parent) = parent {
                if let Some(parent_node) = inner.nodes.get_mut(&parent) {
                    parent_node.children.retain(|&c| c != node);
                }
            }
            let mut stack = vec![node];
            while let Some(current) = stack.pop() {
                if let Some(removed) = inner.nodes.remove(&current) {
                    stack.extend(removed.children);
                }
            }
        }
        self.emit(Mutation::NodeRemoved(node));
        Ok(())
    }

    /// Whether the node is still part of the document.
    pub fn contains(&self, node: NodeId) -> bool {
        self.inner.lock().nodes.contains_key(&node)
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.inner.lock().nodes.get(&node).map(|n| n.tag.clone())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.lock().nodes.get(&node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .lock()
            .nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn set_attribute(
        &self,
        node: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), InjectError> {
        {
            let mut inner = self.inner.lock();
            let entry = inner
                .nodes
                .get_mut(&node)
                .ok_or_else(|| InjectError::NodeGone(node.to_string()))?;
            entry.attributes.insert(name.to_string(), value.to_string());
        }
        self.emit(Mutation::AttributeChanged(node));
        Ok(())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .lock()
            .nodes
            .get(&node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    /// Replace a node's direct text.
    pub fn set_text(&self, node: NodeId, text: &str) -> Result<(), InjectError> {
        {
            let mut inner = self.inner.lock();
            let entry = inner
                .nodes
                .get_mut(&node)
                .ok_or_else(|| InjectError::NodeGone(node.to_string()))?;
            entry.text = text.to_string();
        }
        self.emit(Mutation::TextChanged(node));
        Ok(())
    }

    /// A node's direct text.
    pub fn text(&self, node: NodeId) -> Option<String> {
        self.inner.lock().nodes.get(&node).map(|n| n.text.clone())
    }

    /// A node's text plus all descendant text, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let inner = self.inner.lock();
        let mut pieces = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(n) = inner.nodes.get(&current) {
                if !n.text.is_empty() {
                    pieces.push(n.text.clone());
                }
                // Reverse so children pop in document order.
                stack.extend(n.children.iter().rev().copied());
            }
        }
        pieces.join(" ")
    }

    /// All nodes matching the locator, in document order.
    pub fn query_all(&self, locator: &Locator) -> Vec<NodeId> {
        let inner = self.inner.lock();
        let mut found = Vec::new();
        let mut stack = vec![inner.root];
        while let Some(current) = stack.pop() {
            if let Some(node) = inner.nodes.get(&current) {
                if locator.matches(&node.tag, &node.attributes) {
                    found.push(current);
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
        found
    }

    /// Nearest of the node itself or its ancestors matching the locator.
    pub fn closest(&self, node: NodeId, locator: &Locator) -> Option<NodeId> {
        let inner = self.inner.lock();
        let mut current = Some(node);
        while let Some(id) = current {
            let n = inner.nodes.get(&id)?;
            if locator.matches(&n.tag, &n.attributes) {
                return Some(id);
            }
            current = n.parent;
        }
        None
    }

    /// First descendant (document order) matching the locator, excluding
    /// the node itself.
    pub fn find_descendant(&self, node: NodeId, locator: &Locator) -> Option<NodeId> {
        let inner = self.inner.lock();
        let mut stack: Vec<NodeId> = inner
            .nodes
            .get(&node)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(current) = stack.pop() {
            if let Some(n) = inner.nodes.get(&current) {
                if locator.matches(&n.tag, &n.attributes) {
                    return Some(current);
                }
                stack.extend(n.children.iter().rev().copied());
            }
        }
        None
    }

    /// Fire a host event at a node. Recorded in the event log; does not
    /// count as a mutation.
    pub fn fire_event(&self, node: NodeId, name: &str) -> Result<(), InjectError> {
        let mut inner = self.inner.lock();
        if !inner.nodes.contains_key(&node) {
            return Err(InjectError::NodeGone(node.to_string()));
        }
        inner.events.push((node, name.to_string()));
        Ok(())
    }

    /// Events fired at a node, oldest first.
    pub fn events_for(&self, node: NodeId) -> Vec<String> {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|(target, _)| *target == node)
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn emit(&self, mutation: Mutation) {
        // No receivers is fine; nobody is watching yet.
        let _ = self.mutations.send(mutation);
    }
}
