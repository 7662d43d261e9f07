//! Sessions: exclusive per-client ownership of the widget tree, remote
//! objects and diff state.
//!
//! One session is processed by one request at a time; concurrency exists
//! only across sessions. The registry hands out each session behind its own
//! lock so two clients never share mutable state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::events::{EventError, EventNotification, ListenerFn, ListenerTable, MethodHandlerFn};
use crate::lifecycle::{PreservedStore, RequestController};
use crate::protocol::{Message, PropertyMap};
use crate::remote::RemoteObject;
use crate::widgets::{WidgetError, WidgetKind, WidgetTree};

/// State owned by exactly one client session.
pub struct UiSession {
    id: String,
    pub(crate) tree: WidgetTree,
    pub(crate) remotes: HashMap<String, RemoteObject>,
    pub(crate) preserved: PreservedStore,
    /// Widgets whose Create has been rendered in an earlier cycle.
    pub(crate) initialized: HashSet<String>,
    pub(crate) listeners: ListenerTable,
    /// Widgets disposed since the last render, awaiting their Destroy.
    pub(crate) pending_disposals: Vec<String>,
    request_counter: u64,
}

impl UiSession {
    /// Create a session with a fresh widget tree rooted at a shell.
    pub fn new(id: impl Into<String>) -> Self {
        let session = Self {
            id: id.into(),
            tree: WidgetTree::new(),
            remotes: HashMap::new(),
            preserved: PreservedStore::new(),
            initialized: HashSet::new(),
            listeners: ListenerTable::default(),
            pending_disposals: Vec::new(),
            request_counter: 0,
        };
        tracing::info!(session = %session.id, root = %session.tree.root_id(), "session created");
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    pub fn root_id(&self) -> &str {
        self.tree.root_id()
    }

    /// Create a widget under `parent`.
    pub fn create_widget(
        &mut self,
        parent: &str,
        kind: WidgetKind,
        styles: Vec<String>,
    ) -> Result<String, WidgetError> {
        self.tree.create_widget(parent, kind, styles)
    }

    /// Dispose a widget and its subtree. The matching Destroy operations
    /// render in the next cycle; remotes never sent to the client are
    /// dropped silently.
    pub fn dispose_widget(&mut self, id: &str) -> Result<(), WidgetError> {
        let disposed = self.tree.dispose(id)?;
        self.pending_disposals.extend(disposed);
        Ok(())
    }

    /// Register an application listener; the listener-presence transition is
    /// mirrored to the client in the next render.
    pub fn add_listener(
        &mut self,
        widget_id: &str,
        event: &str,
        listener: ListenerFn,
    ) -> Result<(), WidgetError> {
        let widget = self
            .tree
            .widget_mut(widget_id)
            .ok_or_else(|| WidgetError::UnknownWidget(widget_id.to_string()))?;
        widget.increment_listeners(event);
        self.listeners.add(widget_id, event, listener);
        Ok(())
    }

    /// Remove every listener for a widget/event pair.
    pub fn remove_listeners(&mut self, widget_id: &str, event: &str) -> Result<(), WidgetError> {
        let removed = self.listeners.remove(widget_id, event);
        let widget = self
            .tree
            .widget_mut(widget_id)
            .ok_or_else(|| WidgetError::UnknownWidget(widget_id.to_string()))?;
        for _ in 0..removed {
            widget.decrement_listeners(event);
        }
        Ok(())
    }

    /// Install the handler for inbound method calls on a widget.
    pub fn set_method_handler(
        &mut self,
        widget_id: &str,
        handler: MethodHandlerFn,
    ) -> Result<(), WidgetError> {
        if !self.tree.contains(widget_id) {
            return Err(WidgetError::UnknownWidget(widget_id.to_string()));
        }
        self.listeners.set_method_handler(widget_id, handler);
        Ok(())
    }

    pub fn request_counter(&self) -> u64 {
        self.request_counter
    }

    pub(crate) fn next_request_counter(&mut self) -> u64 {
        self.request_counter += 1;
        self.request_counter
    }

    /// Deliver one notification through the listener table. Used by the
    /// controller during PROCESS_ACTION.
    pub(crate) fn dispatch_event(&mut self, notification: &EventNotification) -> Option<EventError> {
        self.listeners.dispatch(&mut self.tree, notification)
    }

    pub(crate) fn dispatch_call(
        &mut self,
        widget_id: &str,
        method: &str,
        arguments: &PropertyMap,
    ) -> Option<EventError> {
        self.listeners
            .dispatch_call(&mut self.tree, widget_id, method, arguments)
    }

    /// Drop disposed widgets and their bookkeeping after their Destroy
    /// operations have been rendered.
    pub(crate) fn prune_disposed(&mut self) {
        for id in self.pending_disposals.drain(..) {
            self.remotes.remove(&id);
            self.initialized.remove(&id);
            self.preserved.remove(&id);
        }
        self.tree.prune_disposed();
        self.listeners.retain_widgets(&self.tree);
    }
}

/// Shared registry of sessions, locked per session.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<Mutex<UiSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a session, returning its handle.
    pub fn create_session(&self, id: &str) -> Arc<Mutex<UiSession>> {
        let session = Arc::new(Mutex::new(UiSession::new(id)));
        self.sessions.write().insert(id.to_string(), Arc::clone(&session));
        session
    }

    pub fn session(&self, id: &str) -> Option<Arc<Mutex<UiSession>>> {
        self.sessions.read().get(id).cloned()
    }

    pub fn remove_session(&self, id: &str) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Process one request for the given session with the given controller.
    /// Locks the session for the whole cycle, so requests for the same
    /// session serialize while different sessions proceed concurrently.
    pub fn process_request(
        &self,
        controller: &RequestController,
        session_id: &str,
        raw: &str,
    ) -> Option<Result<Message, crate::lifecycle::RequestError>> {
        let session = self.session(session_id)?;
        let mut session = session.lock();
        Some(controller.process_request(&mut session, raw))
    }
}
