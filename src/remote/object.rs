//! The remote object: one server-side handle per client-visible entity.
//!
//! A remote object accumulates pending operations during a request cycle and
//! drains them into the message writer exactly once per cycle. Merging
//! happens at enqueue time: property writes collapse last-write-wins, writes
//! fold into the Create record while it is still the open trailing
//! operation, and calls are always kept distinct and ordered.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::protocol::{MessageWriter, Operation, PropertyMap, PropertyValue, STYLE_PROPERTY};
use crate::remote::context::RequestContext;

/// State violations on a remote object. These are programmer errors and are
/// surfaced loudly rather than ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("Remote object is destroyed")]
    Destroyed,

    #[error("Remote object called from wrong thread")]
    WrongThread,

    #[error("Remote object '{0}' already created")]
    AlreadyCreated(String),
}

/// Server-side handle mirroring one client entity.
#[derive(Debug)]
pub struct RemoteObject {
    id: String,
    object_type: String,
    created: bool,
    destroyed: bool,
    pending: Vec<Operation>,
}

impl RemoteObject {
    pub fn new(id: impl Into<String>, object_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object_type: object_type.into(),
            created: false,
            destroyed: false,
            pending: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether a Create has been enqueued or rendered for this object.
    pub fn is_created(&self) -> bool {
        self.created
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Discard operations enqueued after `len`; used to roll back a widget's
    /// partial output when its adapter fails mid-render.
    pub(crate) fn truncate_pending(&mut self, len: usize) {
        self.pending.truncate(len);
    }

    fn check_state(&self, ctx: &RequestContext) -> Result<(), SyncError> {
        ctx.check_thread()?;
        if self.destroyed {
            return Err(SyncError::Destroyed);
        }
        Ok(())
    }

    /// Enqueue the Create operation. Fails on a second create for the same
    /// object; the protocol requires exactly one Create per id.
    pub fn create(&mut self, ctx: &RequestContext) -> Result<(), SyncError> {
        self.check_state(ctx)?;
        if self.created {
            return Err(SyncError::AlreadyCreated(self.id.clone()));
        }
        self.created = true;
        self.pending.push(Operation::Create {
            target: self.id.clone(),
            object_type: self.object_type.clone(),
            properties: PropertyMap::new(),
            styles: Vec::new(),
            listeners: BTreeMap::new(),
        });
        Ok(())
    }

    /// Enqueue or merge a property write.
    ///
    /// Merges into the open trailing record: an unsent Create absorbs the
    /// write, a trailing Set takes it last-write-wins. Anything else in the
    /// tail position (a Call, an already-drained queue) starts a fresh Set
    /// record, so call ordering is preserved.
    pub fn set(
        &mut self,
        ctx: &RequestContext,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), SyncError> {
        self.check_state(ctx)?;
        let value = value.into();
        match self.pending.last_mut() {
            Some(Operation::Create { properties, styles, .. }) => {
                if name == STYLE_PROPERTY {
                    if let PropertyValue::StrList(flags) = value {
                        *styles = flags;
                        return Ok(());
                    }
                }
                properties.insert(name.to_string(), value);
            }
            Some(Operation::Set { properties, .. }) => {
                properties.insert(name.to_string(), value);
            }
            _ => {
                let mut properties = PropertyMap::new();
                properties.insert(name.to_string(), value);
                self.pending.push(Operation::Set {
                    target: self.id.clone(),
                    properties,
                });
            }
        }
        Ok(())
    }

    /// Enqueue or merge a listener toggle; last value per event name wins
    /// within a cycle. Merges only into the open trailing Create or Listen
    /// record, like [`Self::set`].
    pub fn listen(&mut self, ctx: &RequestContext, event: &str, enabled: bool) -> Result<(), SyncError> {
        self.check_state(ctx)?;
        match self.pending.last_mut() {
            Some(Operation::Create { listeners, .. }) => {
                listeners.insert(event.to_string(), enabled);
            }
            Some(Operation::Listen { events, .. }) => {
                events.insert(event.to_string(), enabled);
            }
            _ => {
                let mut events = BTreeMap::new();
                events.insert(event.to_string(), enabled);
                self.pending.push(Operation::Listen {
                    target: self.id.clone(),
                    events,
                });
            }
        }
        Ok(())
    }

    /// Enqueue a method call. Every call renders as its own record, in
    /// invocation order.
    pub fn call(
        &mut self,
        ctx: &RequestContext,
        method: &str,
        arguments: Option<PropertyMap>,
    ) -> Result<(), SyncError> {
        self.check_state(ctx)?;
        self.pending.push(Operation::Call {
            target: self.id.clone(),
            method: method.to_string(),
            arguments: arguments.unwrap_or_default(),
        });
        Ok(())
    }

    /// Enqueue a script execution.
    pub fn execute_script(
        &mut self,
        ctx: &RequestContext,
        script_type: &str,
        script: &str,
    ) -> Result<(), SyncError> {
        self.check_state(ctx)?;
        self.pending.push(Operation::ExecuteScript {
            target: self.id.clone(),
            script_type: script_type.to_string(),
            script: script.to_string(),
        });
        Ok(())
    }

    /// Enqueue the Destroy operation and seal the object. A second destroy
    /// is a no-op; any other mutation afterwards fails.
    pub fn destroy(&mut self, ctx: &RequestContext) -> Result<(), SyncError> {
        ctx.check_thread()?;
        if self.destroyed {
            return Ok(());
        }
        self.destroyed = true;
        self.pending.push(Operation::Destroy {
            target: self.id.clone(),
        });
        Ok(())
    }

    /// Drain every pending operation into the writer, in enqueue order.
    /// A second render without intervening mutation emits nothing.
    pub fn render(&mut self, writer: &mut MessageWriter) {
        for operation in self.pending.drain(..) {
            writer.append(operation);
        }
    }

    /// Whether this object has anything to flush.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
