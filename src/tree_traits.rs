use termtree::Tree;
use tracing::instrument;

use crate::domain::{Branch, DecisionTree, NodeRef};

/// Renders a tree structure for terminal display.
pub trait TreeRender {
    fn to_tree_string(&self) -> Tree<String>;
}

// Questions become inner nodes, each child prefixed with the answer leading to it.
impl TreeRender for DecisionTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build(tree: &DecisionTree, node_ref: NodeRef, edge: Option<Branch>) -> Option<Tree<String>> {
            let node = tree.node(node_ref).ok()?;
            let text = node.question().or(node.label()).unwrap_or_default();
            let text = match edge {
                Some(edge) => format!("[{edge}] {text}"),
                None => text.to_string(),
            };
            let mut rendered = Tree::new(text);
            if !node.is_leaf() {
                for branch in [Branch::Yes, Branch::No] {
                    if let Some(child) = tree
                        .child(node_ref, branch)
                        .ok()
                        .and_then(|child| build(tree, child, Some(branch)))
                    {
                        rendered.push(child);
                    }
                }
            }
            Some(rendered)
        }

        build(self, self.root(), None).unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_tree_when_rendering_then_shows_both_answers() {
        let tree = DecisionTree::new();
        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Is your animal warm or cold blooded?");
        assert!(lines[1].ends_with("[yes] Dog"));
        assert!(lines[2].ends_with("[no] Snake"));
    }

    #[test]
    fn given_learned_tree_when_rendering_then_nests_new_question() {
        let mut tree = DecisionTree::new();
        let dog = tree.child(tree.root(), Branch::Yes).unwrap();
        tree.learn(dog, "Cat", "Does it bark?", Branch::No).unwrap();

        let rendered = tree.to_tree_string().to_string();

        assert!(rendered.contains("[yes] Does it bark?"));
        assert!(rendered.contains("[no] Cat"));
        assert_eq!(rendered.lines().count(), 5);
    }
}
