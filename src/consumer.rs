//! # Consumer Contract
//!
//! The caller-supplied capability invoked by the poll loop. Modeled as a
//! trait with two explicit methods (rather than loose callbacks) so the
//! loop's contract stays testable with a fake implementation.

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::messaging::MessageContent;

/// Processes messages and errors during a listener run.
#[async_trait]
pub trait Consumer: Send + Sync {
    /// Called for each message received from the queue. Not called when a
    /// poll cycle returns no messages.
    async fn on_message(&self, message: MessageContent);

    /// Called when receiving from the queue fails, or when deleting a
    /// received message fails for a reason other than cancellation.
    async fn on_error(&self, error: &ListenerError);
}
