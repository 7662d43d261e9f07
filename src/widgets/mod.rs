//! Minimal server-side widget model: kinds, the arena tree, and the
//! depth-first traversal the render phase is ordered by.

mod kind;
mod traversal;
mod tree;

pub use kind::WidgetKind;
pub use traversal::{live_widgets_in_order, visit_depth_first};
pub use tree::{Widget, WidgetError, WidgetTree};
