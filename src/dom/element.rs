// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Element wrapper over a DOM node

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::node::{Node, NodeData, NodeId, NodeType};

/// An element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Underlying node
    pub node: Node,
}

impl Element {
    /// Create an element reference from a node ID, if the node is an element
    pub(crate) fn from_id(
        id: NodeId,
        nodes: Arc<RwLock<HashMap<NodeId, NodeData>>>,
    ) -> Option<Self> {
        let node = Node::new(id, nodes);
        if node.node_type() == NodeType::Element {
            Some(Self { node })
        } else {
            None
        }
    }

    /// Get the tag name in lowercase
    pub fn tag_name(&self) -> String {
        self.node.local_name().unwrap_or_default()
    }

    /// Get an attribute value
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.node.get_attribute(name)
    }

    /// Check if an attribute is present
    pub fn has_attribute(&self, name: &str) -> bool {
        self.node.has_attribute(name)
    }

    /// Get the `src` attribute
    pub fn src(&self) -> Option<String> {
        self.get_attribute("src")
    }

    /// Get the `href` attribute
    pub fn href(&self) -> Option<String> {
        self.get_attribute("href")
    }

    /// Get the `rel` attribute
    pub fn rel(&self) -> Option<String> {
        self.get_attribute("rel")
    }

    /// Get all text inside this element
    pub fn text_content(&self) -> String {
        self.node.text_content()
    }
}
