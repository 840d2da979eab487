use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::entities::{Branch, DEFAULT_NO_LABEL, DEFAULT_QUESTION, DEFAULT_YES_LABEL};
use crate::domain::error::{DomainError, DomainResult};

/// Handle to a node of one specific [`DecisionTree`].
///
/// Carries the owning tree's id next to the generational arena index, so a
/// handle taken from another tree, or from before a reset, is detected
/// instead of silently addressing an unrelated node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    tree: Uuid,
    index: Index,
}

impl NodeRef {
    pub fn tree_id(&self) -> Uuid {
        self.tree
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "{}#{}.{}", self.tree.simple(), slot, generation)
    }
}

/// Payload of a tree node: either a question with two answers or a guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Question { text: String, yes: Index, no: Index },
    Leaf { label: String },
}

/// Tree node in the arena-based decision tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub kind: NodeKind,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
}

impl TreeNode {
    fn leaf(label: impl Into<String>, parent: Option<Index>) -> Self {
        Self {
            kind: NodeKind::Leaf {
                label: label.into(),
            },
            parent,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Animal name, `None` for question nodes.
    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf { label } => Some(label),
            NodeKind::Question { .. } => None,
        }
    }

    /// Question text, `None` for leaves.
    pub fn question(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Question { text, .. } => Some(text),
            NodeKind::Leaf { .. } => None,
        }
    }

    fn child(&self, branch: Branch) -> Option<Index> {
        match (&self.kind, branch) {
            (NodeKind::Question { yes, .. }, Branch::Yes) => Some(*yes),
            (NodeKind::Question { no, .. }, Branch::No) => Some(*no),
            (NodeKind::Leaf { .. }, _) => None,
        }
    }
}

/// Self-extending yes/no classifier.
///
/// Nodes live in a generational arena and are owned exclusively through the
/// `yes`/`no` indices of their parent. The tree is never empty: it starts in
/// the default shape and only grows through [`DecisionTree::learn`] until it
/// is reset.
#[derive(Debug)]
pub struct DecisionTree {
    id: Uuid,
    arena: Arena<TreeNode>,
    root: Index,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = plant_default(&mut arena);
        let tree = Self {
            id: Uuid::new_v4(),
            arena,
            root,
        };
        debug!("created decision tree {}", tree.id);
        tree
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Discards every node and replants the default tree.
    ///
    /// Nodes are removed one by one so their arena generations advance and
    /// every handle into the old graph goes stale.
    #[instrument(level = "debug", skip(self), fields(tree = %self.id))]
    pub fn reset_to_default(&mut self) {
        let stale: Vec<Index> = self.arena.iter().map(|(idx, _)| idx).collect();
        for idx in &stale {
            self.arena.remove(*idx);
        }
        self.root = plant_default(&mut self.arena);
        debug!("discarded {} nodes", stale.len());
    }

    pub fn root(&self) -> NodeRef {
        self.handle(self.root)
    }

    pub fn root_node(&self) -> &TreeNode {
        // root always addresses a live node
        &self.arena[self.root]
    }

    /// Replaces a leaf with a question node distinguishing `label` from the
    /// animal the leaf used to guess.
    ///
    /// `branch` is the answer to `question` for `label`; the old animal takes
    /// the other branch. The node keeps its handle. Fails with
    /// [`DomainError::InvalidReference`] without touching the tree when
    /// `leaf` is not a live leaf of this tree.
    #[instrument(level = "debug", skip(self), fields(tree = %self.id))]
    pub fn learn(
        &mut self,
        leaf: NodeRef,
        label: &str,
        question: &str,
        branch: Branch,
    ) -> DomainResult<()> {
        let index = self.resolve(leaf)?;
        let old_label = match self.arena.get_mut(index).map(|node| &mut node.kind) {
            Some(NodeKind::Leaf { label: old }) => std::mem::take(old),
            _ => return Err(invalid(leaf, "node is a question, not a leaf")),
        };
        debug!("learning {:?} apart from {:?}", label, old_label);

        let (yes_label, no_label) = match branch {
            Branch::Yes => (label.to_string(), old_label),
            Branch::No => (old_label, label.to_string()),
        };
        grow(&mut self.arena, index, question.to_string(), yes_label, no_label);
        Ok(())
    }

    /// Labels of all leaves, depth-first with `yes` before `no`.
    #[instrument(level = "debug", skip(self))]
    pub fn collect_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        self.collect_leaves(self.root, &mut labels);
        labels
    }

    fn collect_leaves(&self, idx: Index, labels: &mut Vec<String>) {
        if let Some(node) = self.arena.get(idx) {
            match &node.kind {
                NodeKind::Leaf { label } => labels.push(label.clone()),
                NodeKind::Question { yes, no, .. } => {
                    self.collect_leaves(*yes, labels);
                    self.collect_leaves(*no, labels);
                }
            }
        }
    }

    pub fn node(&self, node: NodeRef) -> DomainResult<&TreeNode> {
        let index = self.resolve(node)?;
        self.arena
            .get(index)
            .ok_or_else(|| invalid(node, "node no longer exists"))
    }

    pub fn is_leaf(&self, node: NodeRef) -> DomainResult<bool> {
        Ok(self.node(node)?.is_leaf())
    }

    /// Follows one answer from a question node.
    pub fn child(&self, node: NodeRef, branch: Branch) -> DomainResult<NodeRef> {
        self.node(node)?
            .child(branch)
            .map(|idx| self.handle(idx))
            .ok_or_else(|| invalid(node, "leaf has no children"))
    }

    pub fn parent(&self, node: NodeRef) -> DomainResult<Option<NodeRef>> {
        Ok(self.node(node)?.parent.map(|idx| self.handle(idx)))
    }

    /// Number of answers needed to reach `node` from the root (root = 0).
    pub fn depth_of(&self, node: NodeRef) -> DomainResult<usize> {
        let mut depth = 0;
        let mut current = self.node(node)?.parent;
        while let Some(idx) = current {
            depth += 1;
            current = self.arena.get(idx).and_then(|n| n.parent);
        }
        Ok(depth)
    }

    /// Number of levels; the default tree has depth 2.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        match self.arena.get(idx).map(|node| &node.kind) {
            Some(NodeKind::Question { yes, no, .. }) => {
                1 + self.calculate_depth(*yes).max(self.calculate_depth(*no))
            }
            Some(NodeKind::Leaf { .. }) => 1,
            None => 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.iter().filter(|(_, node)| node.is_leaf()).count()
    }

    pub fn question_count(&self) -> usize {
        self.iter().filter(|(_, node)| !node.is_leaf()).count()
    }

    /// Pre-order walk, `yes` subtree before `no` subtree.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    fn handle(&self, index: Index) -> NodeRef {
        NodeRef {
            tree: self.id,
            index,
        }
    }

    fn resolve(&self, node: NodeRef) -> DomainResult<Index> {
        if node.tree != self.id {
            return Err(invalid(node, "handle belongs to another tree"));
        }
        if !self.arena.contains(node.index) {
            return Err(invalid(node, "node no longer exists"));
        }
        Ok(node.index)
    }
}

/// Inserts the default question with its two leaves and returns the root.
fn plant_default(arena: &mut Arena<TreeNode>) -> Index {
    let root = arena.insert(TreeNode::leaf(String::new(), None));
    grow(
        arena,
        root,
        DEFAULT_QUESTION.to_string(),
        DEFAULT_YES_LABEL.to_string(),
        DEFAULT_NO_LABEL.to_string(),
    );
    root
}

/// Turns the node at `at` into a question over two fresh leaves.
fn grow(
    arena: &mut Arena<TreeNode>,
    at: Index,
    question: String,
    yes_label: String,
    no_label: String,
) {
    let yes = arena.insert(TreeNode::leaf(yes_label, Some(at)));
    let no = arena.insert(TreeNode::leaf(no_label, Some(at)));
    if let Some(node) = arena.get_mut(at) {
        node.kind = NodeKind::Question {
            text: question,
            yes,
            no,
        };
    }
}

fn invalid(node: NodeRef, reason: &'static str) -> DomainError {
    DomainError::InvalidReference { node, reason }
}

pub struct TreeIterator<'a> {
    tree: &'a DecisionTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a DecisionTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeRef, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.tree.arena.get(current)?;
        if let NodeKind::Question { yes, no, .. } = &node.kind {
            // no first so yes is popped first
            self.stack.push(*no);
            self.stack.push(*yes);
        }
        Some((self.tree.handle(current), node))
    }
}
