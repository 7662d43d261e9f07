//! Request context: the explicit owning-thread token.
//!
//! Every mutating remote-object call compares the calling thread against the
//! thread that began the request. A mismatch is a concurrency bug (e.g. a
//! background timer touching session state) and fails fast instead of
//! corrupting the pending queues.

use std::thread::{self, ThreadId};

use crate::remote::object::SyncError;

/// Context for one request cycle, created on the request's processing thread.
#[derive(Debug, Clone)]
pub struct RequestContext {
    owner: ThreadId,
    request_counter: u64,
}

impl RequestContext {
    /// Begin a request on the current thread.
    pub fn begin(request_counter: u64) -> Self {
        Self {
            owner: thread::current().id(),
            request_counter,
        }
    }

    /// Fail unless called from the thread that began the request.
    pub fn check_thread(&self) -> Result<(), SyncError> {
        if thread::current().id() == self.owner {
            Ok(())
        } else {
            Err(SyncError::WrongThread)
        }
    }

    pub fn request_counter(&self) -> u64 {
        self.request_counter
    }
}
