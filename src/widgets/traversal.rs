//! Depth-first widget tree traversal.
//!
//! The visit function returns whether to descend into the node's children;
//! `false` prunes the subtree. Traversal order is the sole source of wire
//! ordering guarantees for Create operations: a parent is always visited,
//! and therefore created, before its children.

use crate::widgets::tree::{Widget, WidgetTree};

/// Visit every reachable widget depth-first, starting at the root.
pub fn visit_depth_first<F>(tree: &WidgetTree, mut visit: F)
where
    F: FnMut(&Widget) -> bool,
{
    walk(tree, &tree.root_id().to_string(), &mut visit);
}

fn walk<F>(tree: &WidgetTree, id: &str, visit: &mut F)
where
    F: FnMut(&Widget) -> bool,
{
    let Some(widget) = tree.widget(id) else {
        return;
    };
    if !visit(widget) {
        return;
    }
    let children = widget.children().to_vec();
    for child in children {
        walk(tree, &child, visit);
    }
}

/// Collect ids of live widgets in traversal order, skipping disposed
/// subtrees.
pub fn live_widgets_in_order(tree: &WidgetTree) -> Vec<String> {
    let mut order = Vec::with_capacity(tree.len());
    visit_depth_first(tree, |widget| {
        if widget.is_disposed() {
            return false;
        }
        order.push(widget.id().to_string());
        true
    });
    order
}
