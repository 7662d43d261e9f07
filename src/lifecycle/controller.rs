//! Request lifecycle orchestration.
//!
//! One call to [`RequestController::process_request`] runs a full cycle:
//! parse the inbound message, apply client writes to widget state and to the
//! carried diff baseline, run application listeners, render the minimal diff
//! in traversal order, and finalize the outbound message. Phases are
//! strictly sequential and each runs exactly once. Baseline refreshes and
//! first-render bookkeeping are staged during RENDER and committed at
//! RESPONSE; a fatal failure discards the in-progress message and rolls the
//! staged state back, so the next cycle re-renders everything the client
//! never received.

use thiserror::Error;

use crate::config::ToolkitConfig;
use crate::events::{EventError, EventNotification};
use crate::lifecycle::adapter::{AdapterError, AdapterRegistry};
use crate::lifecycle::phase::{LifecycleError, Phase, PhaseTracker};
use crate::lifecycle::preserved::PreservedState;
use crate::protocol::{
    ClientMessage, ClientOperation, Message, MessageWriter, PropertyMap, ProtocolParseError,
    HEAD_ERROR, HEAD_REQUEST_COUNTER,
};
use crate::remote::{RemoteObject, RequestContext, SyncError};
use crate::session::UiSession;
use crate::widgets::live_widgets_in_order;

/// A failed request cycle. The transport layer turns this into an error
/// response; no partial message is ever emitted.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Parse(#[from] ProtocolParseError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("adapter failed for widget '{widget}'")]
    Adapter {
        widget: String,
        #[source]
        source: AdapterError,
    },

    #[error("unknown widget '{0}' referenced by client message")]
    UnknownTarget(String),
}

/// Drives the request lifecycle for sessions.
pub struct RequestController {
    registry: AdapterRegistry,
    config: ToolkitConfig,
}

impl RequestController {
    /// Controller with the built-in adapters and default configuration.
    pub fn new() -> Self {
        Self::with_registry(AdapterRegistry::with_defaults(), ToolkitConfig::default())
    }

    pub fn with_config(config: ToolkitConfig) -> Self {
        Self::with_registry(AdapterRegistry::with_defaults(), config)
    }

    pub fn with_registry(registry: AdapterRegistry, config: ToolkitConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// Serialize a finalized message for the transport layer.
    pub fn write_response(&self, message: &Message) -> String {
        message.to_wire_string(self.config.pretty_messages)
    }

    /// Run one full request cycle for a session.
    pub fn process_request(
        &self,
        session: &mut UiSession,
        raw: &str,
    ) -> Result<Message, RequestError> {
        let ctx = RequestContext::begin(session.next_request_counter());
        let mut phases = PhaseTracker::new();

        phases.enter(Phase::ReadData)?;
        let inbound = ClientMessage::parse(raw, self.config.max_inbound_operations)?;
        let (events, calls) = self.read_data(session, inbound)?;

        phases.enter(Phase::ProcessAction)?;
        let action_error = self.process_action(session, events, calls);

        phases.enter(Phase::Render)?;
        let mut writer = MessageWriter::new();
        writer.set_head(HEAD_REQUEST_COUNTER, ctx.request_counter() as i64);
        if let Some(error) = &action_error {
            writer.set_head(HEAD_ERROR, error.to_string());
        }
        let rendered = self
            .render_widgets(session, &ctx, &mut writer)
            .and_then(|rendered| {
                self.render_disposals(session, &ctx, &mut writer)?;
                Ok(rendered)
            });
        let rendered = match rendered {
            Ok(rendered) => rendered,
            Err(error) => {
                self.discard_failed_render(session);
                return Err(error);
            }
        };

        phases.enter(Phase::Response)?;
        for (id, state) in rendered.baselines {
            session.preserved.preserve(&id, state);
        }
        session.initialized.extend(rendered.initialized);
        session.prune_disposed();
        let message = writer.finish();
        tracing::debug!(
            session = %session.id(),
            request = ctx.request_counter(),
            operations = message.operation_count(),
            "request cycle complete"
        );
        Ok(message)
    }

    /// Apply inbound client writes to widget state and collect the pending
    /// events and calls. Validates every target up front so a bad record
    /// fails the request before any state is touched. Applied writes are
    /// folded into the carried baseline: the client already sees those
    /// values, so they must never diff back out.
    fn read_data(
        &self,
        session: &mut UiSession,
        inbound: ClientMessage,
    ) -> Result<ReadDataOutcome, RequestError> {
        for operation in &inbound.operations {
            let target = operation.target();
            if !session.tree.contains(target) {
                return Err(RequestError::UnknownTarget(target.to_string()));
            }
        }

        let mut events = Vec::new();
        let mut calls = Vec::new();
        for operation in inbound.operations {
            match operation {
                ClientOperation::Set { target, properties } => {
                    let Some(widget) = session.tree.widget_mut(&target) else {
                        continue;
                    };
                    let mut baseline = session.preserved.state_mut(&target);
                    for (name, value) in properties {
                        widget.set_property(&name, value.clone());
                        if let Some(baseline) = baseline.as_mut() {
                            baseline.record_property(&name, value);
                        }
                    }
                }
                ClientOperation::Notify { target, event, properties } => {
                    events.push(EventNotification {
                        widget_id: target,
                        event,
                        properties,
                    });
                }
                ClientOperation::Call { target, method, arguments } => {
                    calls.push((target, method, arguments));
                }
            }
        }
        Ok((events, calls))
    }

    /// Dispatch collected events and calls to application listeners. A
    /// listener failure is flagged but never aborts the cycle; the render
    /// phase must still run so the client converges.
    fn process_action(
        &self,
        session: &mut UiSession,
        events: Vec<EventNotification>,
        calls: Vec<(String, String, PropertyMap)>,
    ) -> Option<EventError> {
        let mut first_error = None;
        for event in &events {
            if let Some(error) = session.dispatch_event(event) {
                first_error.get_or_insert(error);
            }
        }
        for (target, method, arguments) in &calls {
            if let Some(error) = session.dispatch_call(target, method, arguments) {
                first_error.get_or_insert(error);
            }
        }
        first_error
    }

    /// Depth-first render pass: initialization for widgets on their first
    /// render, change diffs against the carried baseline for the rest,
    /// flushed in traversal order. Baseline refreshes and first-render marks
    /// are staged in the returned outcome, not applied to the session.
    fn render_widgets(
        &self,
        session: &mut UiSession,
        ctx: &RequestContext,
        writer: &mut MessageWriter,
    ) -> Result<RenderOutcome, RequestError> {
        let empty_state = PreservedState::default();
        let mut outcome = RenderOutcome::default();
        for id in live_widgets_in_order(&session.tree) {
            let Some(widget) = session.tree.widget(&id) else {
                continue;
            };
            let kind = widget.kind();
            let Some(adapter) = self.registry.adapter_for(kind) else {
                tracing::warn!(widget = %id, ?kind, "no adapter registered, widget skipped");
                continue;
            };

            let remote = session
                .remotes
                .entry(id.clone())
                .or_insert_with(|| RemoteObject::new(id.clone(), kind.remote_type()));
            let mark = remote.pending_len();
            let first_render = !session.initialized.contains(&id);
            let result = if first_render {
                adapter.render_initialization(widget, remote, ctx)
            } else {
                let preserved = session.preserved.state(&id).unwrap_or(&empty_state);
                adapter.render_changes(widget, preserved, remote, ctx)
            };

            match result {
                Ok(()) => {
                    if first_render {
                        outcome.initialized.push(id.clone());
                    }
                    // After this message the client holds the widget's
                    // current state; it becomes the next cycle's baseline.
                    outcome.baselines.push((id.clone(), adapter.preserve(widget)));
                }
                Err(error) => {
                    // Discard the widget's partial output; siblings still
                    // render. The stale baseline makes the next cycle retry.
                    remote.truncate_pending(mark);
                    tracing::warn!(widget = %id, %error, "adapter failed, widget skipped this cycle");
                    if !self.config.continue_on_adapter_error {
                        return Err(RequestError::Adapter { widget: id, source: error });
                    }
                }
            }
            remote.render(writer);
        }
        Ok(outcome)
    }

    /// Flush Destroy operations for disposed widgets, leaves first. Remotes
    /// the client has never seen are dropped without a Destroy record, so
    /// Create stays the first operation ever rendered for an id.
    fn render_disposals(
        &self,
        session: &mut UiSession,
        ctx: &RequestContext,
        writer: &mut MessageWriter,
    ) -> Result<(), RequestError> {
        for id in session.pending_disposals.clone() {
            let Some(remote) = session.remotes.get_mut(&id) else {
                continue;
            };
            if session.initialized.contains(&id) {
                remote.destroy(ctx)?;
                remote.render(writer);
            } else {
                tracing::debug!(widget = %id, "disposed before first render, remote dropped silently");
            }
        }
        Ok(())
    }

    /// Undo the remote-object side effects of a render pass whose message
    /// was discarded. Queues already drained went into the dead writer, so
    /// remaining pending operations are cleared, and remotes whose Create
    /// died with the writer are dropped entirely; the next cycle renders
    /// them from scratch.
    fn discard_failed_render(&self, session: &mut UiSession) {
        let initialized = &session.initialized;
        session.remotes.retain(|id, _| initialized.contains(id));
        for remote in session.remotes.values_mut() {
            remote.truncate_pending(0);
        }
    }
}

impl Default for RequestController {
    fn default() -> Self {
        Self::new()
    }
}

type ReadDataOutcome = (Vec<EventNotification>, Vec<(String, String, PropertyMap)>);

/// Widget bookkeeping staged during RENDER and committed at RESPONSE, so a
/// discarded message leaves no trace in session state.
#[derive(Default)]
struct RenderOutcome {
    initialized: Vec<String>,
    baselines: Vec<(String, PreservedState)>,
}
