//! Arena-backed element tree.
//!
//! A snapshot arrives as a flat, pre-ordered list of [`ScrapedElement`]s with
//! parent links. [`ElementTree::build`] reconstructs the hierarchy in two
//! passes: one to index element ids, one to link children and parents.
//!
//! Nodes live in a single `Vec` and refer to each other through [`NodeId`]
//! indices. Children are owned by position; the parent link is a plain index
//! used for upward lookups only, so the structure has no reference cycles and
//! can be copied cheaply (see [`crate::pruner`]).

use std::collections::HashMap;

use crate::types::ScrapedElement;

/// Handle to a node inside one [`ElementTree`].
///
/// Handles are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in discovery order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the tree: the element plus its links.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub element: ScrapedElement,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Immutable hierarchy reconstructed from one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl ElementTree {
    /// Build a tree from elements in discovery (pre-order) sequence.
    ///
    /// An element whose `parent_id` is missing, or does not name an element
    /// that appeared earlier in the list, becomes an additional root. The
    /// "earlier" requirement keeps self-references and parent cycles from
    /// producing unreachable nodes. When ids repeat, the first element with
    /// that id is the one children attach to.
    ///
    /// # Example
    ///
    /// ```
    /// use semantic_components::tree::ElementTree;
    /// use semantic_components::types::ScrapedElement;
    ///
    /// let elements = vec![
    ///     ScrapedElement::new("0", "Window").with_name("Docs"),
    ///     ScrapedElement::new("1", "TitleBar").with_parent("0"),
    ///     ScrapedElement::new("2", "ToolBar").with_parent("0"),
    /// ];
    ///
    /// let tree = ElementTree::build(&elements);
    /// let root = tree.root().unwrap();
    /// assert_eq!(tree.children(root).len(), 2);
    /// ```
    pub fn build(elements: &[ScrapedElement]) -> Self {
        let mut index_by_id: HashMap<&str, usize> = HashMap::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            if index_by_id.contains_key(element.id.as_str()) {
                log::warn!(
                    "[TREE] Duplicate element id '{}' at position {}, keeping the first",
                    element.id,
                    index
                );
                continue;
            }
            index_by_id.insert(element.id.as_str(), index);
        }

        let mut tree = ElementTree {
            nodes: Vec::with_capacity(elements.len()),
            roots: Vec::new(),
        };

        for (index, element) in elements.iter().enumerate() {
            let parent = element
                .parent_id
                .as_deref()
                .and_then(|parent_id| index_by_id.get(parent_id).copied())
                .filter(|&parent_index| parent_index < index)
                .map(NodeId);

            if parent.is_none() && element.parent_id.is_some() {
                log::debug!(
                    "[TREE] Element '{}' has unresolved parent {:?}, treating it as a root",
                    element.id,
                    element.parent_id
                );
            }

            tree.push(element.clone(), parent);
        }

        tree
    }

    /// Append a node under `parent` (or as a root) and return its handle.
    ///
    /// The parent must already be part of this tree.
    pub(crate) fn push(&mut self, element: ScrapedElement, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            element,
            parent,
            children: Vec::new(),
        });

        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }

        id
    }

    /// All root nodes, the window first.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// The primary root (normally the window).
    pub fn root(&self) -> Option<NodeId> {
        self.roots.first().copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn element(&self, id: NodeId) -> &ScrapedElement {
        &self.nodes[id.0].element
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Every node handle in discovery order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Find the node built from the element with the given snapshot id.
    pub fn find(&self, element_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.element.id == element_id)
            .map(NodeId)
    }

    /// Nodes strictly below `id`, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// `id` followed by all of its descendants, in pre-order.
    pub fn subtree(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Number of edges between `id` and its root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }
}

/// Pre-order iterator over part of an [`ElementTree`].
pub struct Descendants<'a> {
    tree: &'a ElementTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
