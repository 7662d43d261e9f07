//! Life-cycle adapters: per-kind diff logic.
//!
//! An adapter declares which properties and listen events it tracks for a
//! widget kind; the trait's default methods implement the generic diff
//! plumbing. `render_initialization` runs once per widget and emits the
//! Create operation with only non-default properties; `render_changes` runs
//! on every later cycle and emits Set/Listen operations only for actual
//! transitions against the preserved snapshot.

use std::collections::HashMap;

use thiserror::Error;

use crate::lifecycle::preserved::PreservedState;
use crate::protocol::{PropertyValue, STYLE_PROPERTY};
use crate::remote::{RemoteObject, RequestContext, SyncError};
use crate::widgets::{Widget, WidgetKind};

/// Failure inside one widget's adapter. It aborts that widget's output, not
/// the render phase.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("adapter failure for widget '{widget}': {message}")]
    Failed { widget: String, message: String },
}

/// Per-widget-kind render logic.
pub trait LifeCycleAdapter: Send + Sync {
    /// The widget kind this adapter handles.
    fn kind(&self) -> WidgetKind;

    /// Property names diffed for this kind.
    fn tracked_properties(&self) -> &[&str];

    /// Event names whose listener presence is mirrored to the client.
    fn listen_events(&self) -> &[&str] {
        &[]
    }

    /// Capture the diff baseline for one widget.
    fn preserve(&self, widget: &Widget) -> PreservedState {
        PreservedState::capture(widget, self.tracked_properties(), self.listen_events())
    }

    /// First render of a widget: Create with styles, parent reference, and
    /// every property that differs from the kind's documented default.
    fn render_initialization(
        &self,
        widget: &Widget,
        remote: &mut RemoteObject,
        ctx: &RequestContext,
    ) -> Result<(), AdapterError> {
        remote.create(ctx)?;
        if let Some(parent) = widget.parent() {
            remote.set(ctx, "parent", PropertyValue::Reference(parent.to_string()))?;
        }
        if !widget.styles().is_empty() {
            remote.set(
                ctx,
                STYLE_PROPERTY,
                PropertyValue::StrList(widget.styles().to_vec()),
            )?;
        }
        for name in self.tracked_properties() {
            let current = widget.property(name);
            if current != widget.kind().default_property(name) {
                remote.set(ctx, name, current)?;
            }
        }
        for event in self.listen_events() {
            if widget.has_listener(event) {
                remote.listen(ctx, event, true)?;
            }
        }
        Ok(())
    }

    /// Subsequent renders: Set for each property whose current value differs
    /// from the snapshot, Listen for each has-listener transition.
    fn render_changes(
        &self,
        widget: &Widget,
        preserved: &PreservedState,
        remote: &mut RemoteObject,
        ctx: &RequestContext,
    ) -> Result<(), AdapterError> {
        for name in self.tracked_properties() {
            let current = widget.property(name);
            if preserved.property(name) != Some(&current) {
                remote.set(ctx, name, current)?;
            }
        }
        for event in self.listen_events() {
            let has = widget.has_listener(event);
            if has != preserved.had_listener(event) {
                remote.listen(ctx, event, has)?;
            }
        }
        Ok(())
    }
}

/// Registry mapping widget kinds to their adapters.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<WidgetKind, Box<dyn LifeCycleAdapter>>,
}

impl AdapterRegistry {
    /// An empty registry; embedders register their own adapters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with all built-in widget adapters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for adapter in crate::lifecycle::adapters::builtin_adapters() {
            registry.register(adapter);
        }
        registry
    }

    /// Register an adapter, replacing any existing one for the same kind.
    pub fn register(&mut self, adapter: Box<dyn LifeCycleAdapter>) {
        self.adapters.insert(adapter.kind(), adapter);
    }

    pub fn adapter_for(&self, kind: WidgetKind) -> Option<&dyn LifeCycleAdapter> {
        self.adapters.get(&kind).map(Box::as_ref)
    }
}
