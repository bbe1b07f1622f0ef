//! Depth-first traversal over the materialized part of a tree.

use crate::domain::node::NavigationNode;

/// Pre-order iterator: parents before children, children in listed order.
///
/// Descends into inline children and into deferred children that are already
/// loaded; it never loads anything itself.
#[derive(Debug, Clone)]
pub struct DepthFirst<'a> {
    stack: Vec<&'a NavigationNode>,
}

impl<'a> DepthFirst<'a> {
    pub fn new(root: &'a NavigationNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a NavigationNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(children) = current.materialized_children() {
            // Push children in reverse order for left-to-right traversal
            self.stack.extend(children.iter().rev());
        }
        Some(current)
    }
}

/// Nodes whose target equals a locator, in depth-first order.
#[derive(Debug, Clone)]
pub struct FindByTarget<'a> {
    inner: DepthFirst<'a>,
    locator: String,
}

impl<'a> FindByTarget<'a> {
    pub fn new(root: &'a NavigationNode, locator: &str) -> Self {
        Self {
            inner: DepthFirst::new(root),
            locator: locator.to_string(),
        }
    }
}

impl<'a> Iterator for FindByTarget<'a> {
    type Item = &'a NavigationNode;

    fn next(&mut self) -> Option<Self::Item> {
        let locator = self.locator.as_str();
        self.inner.find(|node| node.target().as_str() == locator)
    }
}

/// Nodes whose target page equals `page`, in depth-first order.
pub fn find_by_page<'a>(
    root: &'a NavigationNode,
    page: &'a str,
) -> impl Iterator<Item = &'a NavigationNode> + 'a {
    DepthFirst::new(root).filter(move |node| node.target().page() == page)
}

/// Breadcrumb from `root` to the first node accepted by `pred`.
pub fn path_to<'a>(
    root: &'a NavigationNode,
    pred: impl Fn(&NavigationNode) -> bool,
) -> Option<Vec<&'a NavigationNode>> {
    fn walk<'a>(
        node: &'a NavigationNode,
        pred: &dyn Fn(&NavigationNode) -> bool,
        trail: &mut Vec<&'a NavigationNode>,
    ) -> bool {
        trail.push(node);
        if pred(node) {
            return true;
        }
        if let Some(children) = node.materialized_children() {
            for child in children {
                if walk(child, pred, trail) {
                    return true;
                }
            }
        }
        trail.pop();
        false
    }

    let mut trail = Vec::new();
    walk(root, &pred, &mut trail).then_some(trail)
}
