//! The request lifecycle: preserved state, per-kind diff adapters, the
//! phase machine, and the controller that orchestrates one request cycle.
//!
//! ```text
//! READ_DATA ──→ PROCESS_ACTION ──→ RENDER ──→ RESPONSE
//! ```
//!
//! - **READ_DATA**: parse the inbound message, apply client writes and fold
//!   them into the carried diff baseline.
//! - **PROCESS_ACTION**: run application listeners; they may mutate the tree.
//! - **RENDER**: depth-first traversal emitting the minimal diff per widget
//!   against the baseline carried from the previous cycle.
//! - **RESPONSE**: finalize the message, commit the refreshed baselines.

mod adapter;
mod adapters;
mod controller;
mod phase;
mod preserved;

pub use adapter::{AdapterError, AdapterRegistry, LifeCycleAdapter};
pub use adapters::{
    ButtonAdapter, CompositeAdapter, LabelAdapter, ShellAdapter, SliderAdapter, TabFolderAdapter,
    TabItemAdapter,
};
pub use controller::{RequestController, RequestError};
pub use phase::{LifecycleError, Phase, PhaseTracker};
pub use preserved::{PreservedState, PreservedStore};
