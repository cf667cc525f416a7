//! # Queue Poll Loop
//!
//! Two states: polling and stopped. The loop sleeps for the configured
//! interval, receives at most one message, deletes it and hands it to the
//! consumer. The only terminal transition is cancellation, either the
//! shutdown token firing or an in-flight call reporting that it was
//! cancelled. A failed poll is reported to the consumer and the loop keeps
//! going; there is no backoff and no retry counter.
//!
//! Deletion policy: a delete that fails for a non-cancellation reason still
//! delivers the message afterwards. At-least-once semantics favor duplicate
//! delivery (the message reappears when its visibility timeout lapses) over
//! silently dropping a successfully received message.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::consumer::Consumer;
use crate::error::ListenerError;
use crate::messaging::clients::QueueClient;
use crate::messaging::MessageContent;
use crate::orchestration::shutdown::ShutdownToken;

/// How long a received message stays hidden from other receivers, giving
/// the consumer time to process before it would reappear on the queue.
pub const VISIBILITY_TIMEOUT: Duration = Duration::from_secs(60);

/// One message per cycle; this listener is a troubleshooting tool, not a
/// throughput machine.
pub const MAX_MESSAGES_PER_POLL: u32 = 1;

/// Polls one queue on a fixed interval and drives a [`Consumer`].
pub struct QueuePoller {
    client: Arc<dyn QueueClient>,
    queue_url: String,
    polling_interval: Duration,
}

impl QueuePoller {
    pub fn new(client: Arc<dyn QueueClient>, queue_url: String, polling_interval: Duration) -> Self {
        Self {
            client,
            queue_url,
            polling_interval,
        }
    }

    /// Run until the shutdown token fires.
    ///
    /// Every wait and every in-flight call races the token; when the token
    /// wins, the loop stops without one more receive and without treating
    /// the stop as an error.
    pub async fn run(&self, shutdown: &ShutdownToken, consumer: &dyn Consumer) {
        info!(
            queue_url = %self.queue_url,
            interval_ms = self.polling_interval.as_millis() as u64,
            "📥 Listening to queue"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Shutdown signal received, leaving poll loop");
                    return;
                }
                _ = tokio::time::sleep(self.polling_interval) => {}
            }

            let messages = tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Shutdown signal received during receive");
                    return;
                }
                result = self.client.receive_messages(
                    &self.queue_url,
                    MAX_MESSAGES_PER_POLL,
                    VISIBILITY_TIMEOUT,
                ) => match result {
                    Ok(messages) => messages,
                    Err(e) if e.is_cancelled() => {
                        debug!("Receive call cancelled, leaving poll loop");
                        return;
                    }
                    Err(e) => {
                        consumer
                            .on_error(&ListenerError::poll("receive_messages", e.to_string()))
                            .await;
                        continue;
                    }
                },
            };

            debug!(count = messages.len(), "Received messages");

            for message in &messages {
                let delete_result = tokio::select! {
                    _ = shutdown.cancelled() => {
                        debug!("Shutdown signal received during delete");
                        return;
                    }
                    result = self.client.delete_message(&self.queue_url, &message.receipt_handle) => result,
                };

                match delete_result {
                    Err(e) if e.is_cancelled() => {
                        debug!("Delete call cancelled, leaving poll loop");
                        return;
                    }
                    Err(e) => {
                        consumer
                            .on_error(&ListenerError::poll("delete_message", e.to_string()))
                            .await;
                        consumer.on_message(MessageContent::from(message)).await;
                    }
                    Ok(()) => {
                        consumer.on_message(MessageContent::from(message)).await;
                    }
                }
            }
        }
    }
}
