//! widgetwire mirrors a server-side widget tree into a remote client
//! renderer over a request/response cycle.
//!
//! The core is a bidirectional incremental diff engine: each widget's
//! last-rendered state is carried across cycles as the diff baseline,
//! per-kind life-cycle adapters compute the minimal set of
//! create/set/listen/call/destroy operations, and the message writer batches
//! them into one ordered wire message. Client-originated writes and events
//! are applied back into widget state before application logic runs.
//!
//! # Example
//!
//! ```
//! use widgetwire::lifecycle::RequestController;
//! use widgetwire::session::UiSession;
//! use widgetwire::widgets::WidgetKind;
//!
//! let controller = RequestController::new();
//! let mut session = UiSession::new("s1");
//! let root = session.root_id().to_string();
//! let slider = session.create_widget(&root, WidgetKind::Slider, vec![]).unwrap();
//!
//! // First cycle renders Create operations for the whole tree.
//! let message = controller.process_request(&mut session, r#"{"operations":[]}"#).unwrap();
//! assert!(message.find_create(&slider).is_some());
//!
//! // Nothing changed: the next cycle is an empty diff.
//! let message = controller.process_request(&mut session, r#"{"operations":[]}"#).unwrap();
//! assert!(message.is_empty_diff());
//! ```
//!
//! Transport is out of scope: embedders receive the inbound message string
//! from their own channel and deliver the outbound [`protocol::Message`]
//! themselves.

pub mod config;
pub mod events;
pub mod lifecycle;
pub mod protocol;
pub mod remote;
pub mod session;
pub mod widgets;

pub use config::ToolkitConfig;
pub use lifecycle::{RequestController, RequestError};
pub use protocol::{Message, PropertyValue};
pub use session::{SessionRegistry, UiSession};
pub use widgets::WidgetKind;
