/*
Rendering of navigation nodes as a terminal tree.

Deferred children that have not been loaded are shown with their fragment id
so the output makes clear where the tree continues.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::node::NavigationNode;

pub trait TreeNodeConvert {
    fn to_tree_string(&self, max_depth: Option<usize>) -> Tree<String>;
}

impl TreeNodeConvert for NavigationNode {
    #[instrument(level = "trace", skip(self), fields(label = %self.label()))]
    fn to_tree_string(&self, max_depth: Option<usize>) -> Tree<String> {
        fn build(node: &NavigationNode, depth: usize, max_depth: Option<usize>) -> Tree<String> {
            let mut tree = Tree::new(node_line(node));
            if max_depth.is_some_and(|max| depth >= max) {
                return tree;
            }
            if let Some(children) = node.materialized_children() {
                for child in children {
                    tree.push(build(child, depth + 1, max_depth));
                }
            }
            tree
        }

        build(self, 0, max_depth)
    }
}

fn node_line(node: &NavigationNode) -> String {
    match node.fragment() {
        Some(fragment) if node.materialized_children().is_none() => {
            format!("{} [{}]", node, fragment)
        }
        _ => node.to_string(),
    }
}
