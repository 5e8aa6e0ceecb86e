//! Path queries over a built tree
//!
//! All walks are pure functions of the links, so every iterator here is
//! restartable. Walks are capped at the node count; a well-formed tree
//! never reaches the cap.

use super::node::{Edge, Node};

/// Parents of a node, nearest first, ending with the root
#[derive(Debug, Clone)]
pub struct Ancestors<'t> {
    nodes: &'t [Node],
    current: Option<usize>,
    remaining: usize,
}

impl<'t> Ancestors<'t> {
    pub(crate) fn new(nodes: &'t [Node], start: usize) -> Self {
        Self {
            nodes,
            current: nodes.get(start).and_then(Node::parent),
            remaining: nodes.len(),
        }
    }
}

impl<'t> Iterator for Ancestors<'t> {
    type Item = &'t Node;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.current?)?;
        self.remaining -= 1;
        self.current = node.parent();
        Some(node)
    }
}

/// `start`, then its Z child, then that node's Z child, and so on
#[derive(Debug, Clone)]
pub struct ZChain<'t> {
    nodes: &'t [Node],
    current: Option<usize>,
    remaining: usize,
}

impl<'t> ZChain<'t> {
    pub(crate) fn new(nodes: &'t [Node], start: Option<usize>) -> Self {
        Self {
            nodes,
            current: start,
            remaining: nodes.len(),
        }
    }
}

impl<'t> Iterator for ZChain<'t> {
    type Item = &'t Node;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.current?)?;
        self.remaining -= 1;
        self.current = node.z_child();
        Some(node)
    }
}

/// One level of an ascent: the parent reached and the slot we came up through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AscentStep {
    /// Index of the parent node
    pub parent: usize,
    /// Slot of the parent holding the node we left, `None` if the
    /// parent does not list it (malformed description)
    pub edge: Option<Edge>,
}

/// Walk from a node to the root, classifying every edge on the way
#[derive(Debug, Clone)]
pub struct Ascent<'t> {
    nodes: &'t [Node],
    current: Option<usize>,
    remaining: usize,
}

impl<'t> Ascent<'t> {
    pub(crate) fn new(nodes: &'t [Node], start: usize) -> Self {
        Self {
            nodes,
            current: nodes.get(start).map(|_| start),
            remaining: nodes.len(),
        }
    }
}

impl<'t> Iterator for Ascent<'t> {
    type Item = AscentStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let child = self.current?;
        let parent_index = self.nodes.get(child)?.parent()?;
        let parent = self.nodes.get(parent_index)?;
        self.remaining -= 1;
        self.current = Some(parent_index);
        Some(AscentStep {
            parent: parent_index,
            edge: parent.edge_to(child),
        })
    }
}
