//! # Service Capability Traits
//!
//! Narrow contracts over the three external services. The listener has no
//! opinion about which SDK (or region, or account) backs them. Anything
//! satisfying these traits works, which is also what makes the lifecycle
//! testable without network access.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::messaging::message::ReceivedMessage;

/// Error surface shared by all service clients.
///
/// `Cancelled` is how a client reports that an in-flight call was aborted by
/// the run's cancellation rather than by a service fault; the poll loop
/// treats it as a clean stop signal, never as a reportable error.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{message}")]
    Service { message: String },

    #[error("call cancelled")]
    Cancelled,
}

impl ClientError {
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Queue service operations used by the listener.
#[async_trait]
pub trait QueueClient: Send + Sync {
    /// Create a queue with the given attributes, returning its URL.
    async fn create_queue(
        &self,
        queue_name: &str,
        attributes: HashMap<String, String>,
    ) -> ClientResult<String>;

    /// Delete the queue behind the URL.
    async fn delete_queue(&self, queue_url: &str) -> ClientResult<()>;

    /// Fetch the queue's own ARN attribute.
    async fn queue_arn(&self, queue_url: &str) -> ClientResult<String>;

    /// Receive up to `max_messages` messages, hiding each received message
    /// from other receivers for `visibility_timeout`.
    async fn receive_messages(
        &self,
        queue_url: &str,
        max_messages: u32,
        visibility_timeout: Duration,
    ) -> ClientResult<Vec<ReceivedMessage>>;

    /// Delete a received message by its receipt handle.
    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> ClientResult<()>;
}

/// Topic service operations used by the listener.
#[async_trait]
pub trait TopicClient: Send + Sync {
    /// Register the queue (by ARN) as an endpoint of the topic using the
    /// queue protocol, returning the subscription ARN synchronously.
    async fn subscribe(&self, topic_arn: &str, queue_arn: &str) -> ClientResult<String>;

    /// Remove a subscription.
    async fn unsubscribe(&self, subscription_arn: &str) -> ClientResult<()>;
}

/// Parameter-store operations used by the listener.
#[async_trait]
pub trait ParameterClient: Send + Sync {
    /// Fetch a parameter value, decrypted when `decrypt` is set.
    async fn get_parameter(&self, path: &str, decrypt: bool) -> ClientResult<String>;
}
