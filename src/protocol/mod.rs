//! Wire protocol: operations, values, the message writer and the inbound
//! message reader.
//!
//! Outbound, one request cycle produces exactly one [`Message`]: an ordered
//! list of create/set/listen/call/destroy/executeScript records. Inbound,
//! the client sends the symmetric set/notify/call records consumed at the
//! start of the next cycle.

mod message;
mod operation;
mod reader;
mod value;
mod writer;

pub use message::{Message, HEAD_ERROR, HEAD_REQUEST_COUNTER};
pub use operation::Operation;
pub use reader::{ClientMessage, ClientOperation, ProtocolParseError};
pub use value::{PropertyMap, PropertyValue, UnsupportedValue};
pub use writer::{MessageWriter, STYLE_PROPERTY};
