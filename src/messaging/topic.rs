//! # Subscription Manager
//!
//! Registers the provisioned queue as an endpoint of the topic and removes
//! the subscription on teardown. Queue endpoints are trusted through the
//! queue's access policy, so the subscription ARN comes back synchronously
//! with no pending-confirmation handshake.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{ListenerError, Result, TeardownFailure};
use crate::messaging::clients::TopicClient;

/// A topic subscription created for one listener run.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub arn: String,
}

/// Subscribes and unsubscribes the queue through a [`TopicClient`].
pub struct SubscriptionManager {
    client: Arc<dyn TopicClient>,
}

impl SubscriptionManager {
    pub fn new(client: Arc<dyn TopicClient>) -> Self {
        Self { client }
    }

    /// Subscribe the queue (by ARN) to the topic. No retry; an invalid or
    /// unauthorized topic fails the run.
    pub async fn subscribe(&self, topic_arn: &str, queue_arn: &str) -> Result<Subscription> {
        debug!(topic_arn = %topic_arn, queue_arn = %queue_arn, "Creating subscription");

        let arn = self
            .client
            .subscribe(topic_arn, queue_arn)
            .await
            .map_err(|e| ListenerError::subscription(topic_arn, e.to_string()))?;

        info!(subscription_arn = %arn, "✅ Subscription created");
        Ok(Subscription { arn })
    }

    /// Remove the subscription. Failures are reported as a
    /// [`TeardownFailure`] and never abort the remaining teardown steps.
    pub async fn unsubscribe(
        &self,
        subscription_arn: &str,
    ) -> std::result::Result<(), TeardownFailure> {
        debug!(subscription_arn = %subscription_arn, "Removing subscription");

        match self.client.unsubscribe(subscription_arn).await {
            Ok(()) => {
                info!(subscription_arn = %subscription_arn, "Subscription removed");
                Ok(())
            }
            Err(e) => {
                warn!(
                    subscription_arn = %subscription_arn,
                    error = %e,
                    "Unable to unsubscribe from topic"
                );
                Err(TeardownFailure {
                    step: "unsubscribe".to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::clients::{ClientError, ClientResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockTopicClient {
        subscriptions: Mutex<Vec<(String, String)>>,
        unsubscribed: Mutex<Vec<String>>,
        fail_subscribe: bool,
        fail_unsubscribe: bool,
    }

    #[async_trait]
    impl TopicClient for MockTopicClient {
        async fn subscribe(&self, topic_arn: &str, queue_arn: &str) -> ClientResult<String> {
            if self.fail_subscribe {
                return Err(ClientError::service("not authorized"));
            }
            self.subscriptions
                .lock()
                .unwrap()
                .push((topic_arn.to_string(), queue_arn.to_string()));
            Ok(format!("{topic_arn}:subscription-1"))
        }

        async fn unsubscribe(&self, subscription_arn: &str) -> ClientResult<()> {
            if self.fail_unsubscribe {
                return Err(ClientError::service("no such subscription"));
            }
            self.unsubscribed
                .lock()
                .unwrap()
                .push(subscription_arn.to_string());
            Ok(())
        }
    }

    const TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123456789012:orders";
    const QUEUE_ARN: &str = "arn:aws:sqs:us-east-1:123456789012:orders-listener";

    #[tokio::test]
    async fn test_subscribe_returns_subscription_arn() {
        let client = Arc::new(MockTopicClient::default());
        let manager = SubscriptionManager::new(client.clone());

        let subscription = manager
            .subscribe(TOPIC_ARN, QUEUE_ARN)
            .await
            .expect("subscribe failed");

        assert!(!subscription.arn.is_empty());
        assert_eq!(
            client.subscriptions.lock().unwrap().as_slice(),
            [(TOPIC_ARN.to_string(), QUEUE_ARN.to_string())]
        );
    }

    #[tokio::test]
    async fn test_subscribe_failure_is_subscription_error() {
        let client = Arc::new(MockTopicClient {
            fail_subscribe: true,
            ..Default::default()
        });
        let manager = SubscriptionManager::new(client);

        let err = manager.subscribe(TOPIC_ARN, QUEUE_ARN).await.unwrap_err();
        assert!(matches!(err, ListenerError::Subscription { .. }));
    }

    #[tokio::test]
    async fn test_unsubscribe_failure_reported_not_thrown() {
        let client = Arc::new(MockTopicClient {
            fail_unsubscribe: true,
            ..Default::default()
        });
        let manager = SubscriptionManager::new(client);

        let failure = manager
            .unsubscribe("arn:aws:sns:us-east-1:123456789012:orders:sub-1")
            .await
            .unwrap_err();

        assert_eq!(failure.step, "unsubscribe");
        assert!(failure.message.contains("no such subscription"));
    }
}
