//! The live widget tree: a flat arena keyed by id with ordered children.
//!
//! The tree is the collaborator the engine diffs against. It exposes exactly
//! what the protocol needs: stable ids, ordered child enumeration, a
//! disposed flag, property storage and per-event listener counts.

use std::collections::HashMap;

use thiserror::Error;

use crate::protocol::{PropertyMap, PropertyValue};
use crate::remote::allocate_id;
use crate::widgets::kind::WidgetKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
    #[error("unknown widget '{0}'")]
    UnknownWidget(String),

    #[error("widget '{0}' is disposed")]
    DisposedWidget(String),
}

/// One server-side widget.
#[derive(Debug)]
pub struct Widget {
    id: String,
    kind: WidgetKind,
    styles: Vec<String>,
    properties: PropertyMap,
    listener_counts: HashMap<String, usize>,
    parent: Option<String>,
    children: Vec<String>,
    disposed: bool,
}

impl Widget {
    fn new(id: String, kind: WidgetKind, styles: Vec<String>, parent: Option<String>) -> Self {
        Self {
            id,
            kind,
            styles,
            properties: PropertyMap::new(),
            listener_counts: HashMap::new(),
            parent,
            children: Vec::new(),
            disposed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Style flags fixed at construction, in declaration order.
    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Children in attachment order.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Current value of a property: the explicitly set value, else the
    /// kind's documented default.
    pub fn property(&self, name: &str) -> PropertyValue {
        self.properties
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.kind.default_property(name))
    }

    pub fn set_property(&mut self, name: &str, value: impl Into<PropertyValue>) {
        self.properties.insert(name.to_string(), value.into());
    }

    /// Whether at least one listener of this event kind is attached.
    pub fn has_listener(&self, event: &str) -> bool {
        self.listener_counts.get(event).copied().unwrap_or(0) > 0
    }

    pub(crate) fn increment_listeners(&mut self, event: &str) {
        *self.listener_counts.entry(event.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn decrement_listeners(&mut self, event: &str) {
        if let Some(count) = self.listener_counts.get_mut(event) {
            *count = count.saturating_sub(1);
        }
    }
}

/// Arena of widgets rooted at a shell.
#[derive(Debug)]
pub struct WidgetTree {
    widgets: HashMap<String, Widget>,
    root: String,
}

impl WidgetTree {
    /// Create a tree with a fresh root shell.
    pub fn new() -> Self {
        let root_id = allocate_id("w");
        let root = Widget::new(root_id.clone(), WidgetKind::Shell, Vec::new(), None);
        let mut widgets = HashMap::new();
        widgets.insert(root_id.clone(), root);
        Self { widgets, root: root_id }
    }

    pub fn root_id(&self) -> &str {
        &self.root
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.get(id)
    }

    pub fn widget_mut(&mut self, id: &str) -> Option<&mut Widget> {
        self.widgets.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.widgets.contains_key(id)
    }

    /// Create a widget under `parent` and return its id.
    pub fn create_widget(
        &mut self,
        parent: &str,
        kind: WidgetKind,
        styles: Vec<String>,
    ) -> Result<String, WidgetError> {
        let parent_widget = self
            .widgets
            .get_mut(parent)
            .ok_or_else(|| WidgetError::UnknownWidget(parent.to_string()))?;
        if parent_widget.disposed {
            return Err(WidgetError::DisposedWidget(parent.to_string()));
        }
        let id = allocate_id("w");
        parent_widget.children.push(id.clone());
        let widget = Widget::new(id.clone(), kind, styles, Some(parent.to_string()));
        self.widgets.insert(id.clone(), widget);
        Ok(id)
    }

    /// Mark a widget and its whole subtree disposed. Returns the disposed
    /// ids, children before parents, so destroy operations release leaves
    /// first. Disposing an already-disposed widget returns an empty list.
    pub fn dispose(&mut self, id: &str) -> Result<Vec<String>, WidgetError> {
        if !self.widgets.contains_key(id) {
            return Err(WidgetError::UnknownWidget(id.to_string()));
        }
        let mut disposed = Vec::new();
        self.dispose_subtree(id, &mut disposed);
        if let Some(parent_id) = self.widgets.get(id).and_then(|w| w.parent.clone()) {
            if let Some(parent) = self.widgets.get_mut(&parent_id) {
                parent.children.retain(|child| child != id);
            }
        }
        Ok(disposed)
    }

    fn dispose_subtree(&mut self, id: &str, disposed: &mut Vec<String>) {
        let children = match self.widgets.get(id) {
            Some(widget) if !widget.disposed => widget.children.clone(),
            _ => return,
        };
        for child in &children {
            self.dispose_subtree(child, disposed);
        }
        if let Some(widget) = self.widgets.get_mut(id) {
            widget.disposed = true;
        }
        disposed.push(id.to_string());
    }

    /// Drop disposed widgets from the arena; called after their destroy
    /// operations have been rendered.
    pub fn prune_disposed(&mut self) {
        self.widgets.retain(|_, widget| !widget.disposed);
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}
