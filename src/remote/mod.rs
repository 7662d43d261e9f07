//! Remote objects: server-side handles mirrored to the client, with
//! process-unique ids and an explicit per-request owning-thread token.

mod context;
mod id;
mod object;

pub use context::RequestContext;
pub use id::allocate_id;
pub use object::{RemoteObject, SyncError};
