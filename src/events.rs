//! Application-level event dispatch.
//!
//! Inbound notify records become [`EventNotification`]s delivered to
//! listeners registered on the session; inbound call records are routed to
//! per-widget method handlers. Listener failures are reported, never
//! swallowed, and never abort the cycle: the render phase still runs so the
//! client converges.

use std::collections::HashMap;

use thiserror::Error;

use crate::protocol::PropertyMap;
use crate::widgets::WidgetTree;

/// One client-originated event, as delivered to application listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct EventNotification {
    pub widget_id: String,
    pub event: String,
    pub properties: PropertyMap,
}

/// A failure raised by an application listener or method handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EventError(pub String);

/// Callback invoked for a matching event notification. May mutate the tree;
/// the diff engine picks the changes up in the same cycle's render phase.
pub type ListenerFn = Box<dyn FnMut(&mut WidgetTree, &EventNotification) -> Result<(), EventError> + Send>;

/// Callback invoked for an inbound method call on a widget.
pub type MethodHandlerFn =
    Box<dyn FnMut(&mut WidgetTree, &str, &PropertyMap) -> Result<(), EventError> + Send>;

/// Listener and method-handler storage for one session.
#[derive(Default)]
pub(crate) struct ListenerTable {
    listeners: HashMap<(String, String), Vec<ListenerFn>>,
    method_handlers: HashMap<String, MethodHandlerFn>,
}

impl ListenerTable {
    pub(crate) fn add(&mut self, widget_id: &str, event: &str, listener: ListenerFn) {
        self.listeners
            .entry((widget_id.to_string(), event.to_string()))
            .or_default()
            .push(listener);
    }

    /// Remove all listeners for a widget/event pair; returns how many were
    /// removed.
    pub(crate) fn remove(&mut self, widget_id: &str, event: &str) -> usize {
        self.listeners
            .remove(&(widget_id.to_string(), event.to_string()))
            .map(|listeners| listeners.len())
            .unwrap_or(0)
    }

    pub(crate) fn set_method_handler(&mut self, widget_id: &str, handler: MethodHandlerFn) {
        self.method_handlers.insert(widget_id.to_string(), handler);
    }

    /// Deliver one notification to every matching listener. Returns the
    /// first failure, after invoking all listeners.
    pub(crate) fn dispatch(
        &mut self,
        tree: &mut WidgetTree,
        notification: &EventNotification,
    ) -> Option<EventError> {
        let key = (notification.widget_id.clone(), notification.event.clone());
        let Some(listeners) = self.listeners.get_mut(&key) else {
            tracing::debug!(
                widget = %notification.widget_id,
                event = %notification.event,
                "notify without registered listener, dropped"
            );
            return None;
        };
        let mut first_error = None;
        for listener in listeners {
            if let Err(error) = listener(tree, notification) {
                tracing::warn!(
                    widget = %notification.widget_id,
                    event = %notification.event,
                    %error,
                    "listener failed"
                );
                first_error.get_or_insert(error);
            }
        }
        first_error
    }

    /// Route one inbound call to the widget's method handler, if any.
    pub(crate) fn dispatch_call(
        &mut self,
        tree: &mut WidgetTree,
        widget_id: &str,
        method: &str,
        arguments: &PropertyMap,
    ) -> Option<EventError> {
        let Some(handler) = self.method_handlers.get_mut(widget_id) else {
            tracing::debug!(widget = %widget_id, %method, "call without handler, dropped");
            return None;
        };
        match handler(tree, method, arguments) {
            Ok(()) => None,
            Err(error) => {
                tracing::warn!(widget = %widget_id, %method, %error, "method handler failed");
                Some(error)
            }
        }
    }

    /// Drop registrations for widgets that no longer exist.
    pub(crate) fn retain_widgets(&mut self, tree: &WidgetTree) {
        self.listeners.retain(|(widget_id, _), _| tree.contains(widget_id));
        self.method_handlers.retain(|widget_id, _| tree.contains(widget_id));
    }
}
