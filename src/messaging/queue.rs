//! # Queue Provisioner
//!
//! Creates the temporary queue that the topic will push into, and deletes
//! it on teardown. FIFO topics get FIFO queues: FIFO-ness is decided by a
//! plain `.fifo` suffix check on the topic ARN, not by parsing the ARN.
//!
//! Every created queue carries an access policy allowing the topic service
//! principal to send messages into it, scoped to the topic's ARN. That
//! policy is the entire authorization story; no confirmation handshake is
//! needed for the subscription later.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::QUEUE_NAME_PREFIX;
use crate::error::{ListenerError, Result, TeardownFailure};
use crate::messaging::clients::QueueClient;
use crate::validation::validate_queue_name;

/// FIFO topics and queues are identified by this naming suffix.
pub const FIFO_SUFFIX: &str = ".fifo";

/// A queue created for one listener run.
///
/// Owned exclusively by the orchestrator: created during setup, deleted
/// during teardown, never shared across runs.
#[derive(Debug, Clone)]
pub struct ProvisionedQueue {
    pub url: String,
    /// The queue's own ARN, fetched after creation.
    pub arn: Option<String>,
    pub is_fifo: bool,
}

/// Creates and deletes the listener's queue through a [`QueueClient`].
pub struct QueueProvisioner {
    client: Arc<dyn QueueClient>,
}

impl QueueProvisioner {
    pub fn new(client: Arc<dyn QueueClient>) -> Self {
        Self { client }
    }

    /// Create a queue authorized to receive from `topic_arn`.
    ///
    /// An empty/absent name gets a generated `sns-listener-<uuid>` name.
    /// For FIFO topics the `.fifo` suffix is appended to the name and the
    /// FIFO + content-based-deduplication attributes are set. The name is
    /// validated before any service call.
    pub async fn provision(
        &self,
        queue_name: Option<&str>,
        topic_arn: &str,
    ) -> Result<ProvisionedQueue> {
        let is_fifo = topic_arn.ends_with(FIFO_SUFFIX);

        let mut queue_name = match queue_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{QUEUE_NAME_PREFIX}{}", Uuid::new_v4()),
        };

        let mut attributes = HashMap::new();
        attributes.insert("Policy".to_string(), queue_policy(topic_arn));

        if is_fifo {
            queue_name.push_str(FIFO_SUFFIX);
            attributes.insert("FifoQueue".to_string(), "true".to_string());
            attributes.insert("ContentBasedDeduplication".to_string(), "true".to_string());
        }

        validate_queue_name(&queue_name)?;

        debug!(
            queue_name = %queue_name,
            topic_arn = %topic_arn,
            is_fifo,
            "📋 Creating queue"
        );

        let url = self
            .client
            .create_queue(&queue_name, attributes)
            .await
            .map_err(|e| ListenerError::provisioning("create_queue", e.to_string()))?;

        info!(queue_url = %url, "✅ Queue created");

        Ok(ProvisionedQueue {
            url,
            arn: None,
            is_fifo,
        })
    }

    /// Fetch the queue's own ARN attribute.
    pub async fn fetch_arn(&self, queue_url: &str) -> Result<String> {
        let arn = self
            .client
            .queue_arn(queue_url)
            .await
            .map_err(|e| ListenerError::provisioning("queue_arn", e.to_string()))?;

        debug!(queue_url = %queue_url, queue_arn = %arn, "Fetched queue ARN");
        Ok(arn)
    }

    /// Delete the queue. Failures are reported as a [`TeardownFailure`] so
    /// the orchestrator can aggregate them without short-circuiting the
    /// remaining teardown steps.
    pub async fn teardown(&self, queue_url: &str) -> std::result::Result<(), TeardownFailure> {
        debug!(queue_url = %queue_url, "🗑️ Deleting queue");

        match self.client.delete_queue(queue_url).await {
            Ok(()) => {
                info!(queue_url = %queue_url, "Queue deleted");
                Ok(())
            }
            Err(e) => {
                warn!(queue_url = %queue_url, error = %e, "Unable to delete queue");
                Err(TeardownFailure {
                    step: "delete_queue".to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

/// Access policy letting the topic service principal send to this queue,
/// scoped by source-ARN condition to exactly one topic.
fn queue_policy(topic_arn: &str) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": {
                "Service": "sns.amazonaws.com"
            },
            "Action": "sqs:SendMessage",
            "Resource": "*",
            "Condition": {
                "ArnEquals": {
                    "aws:SourceArn": topic_arn
                }
            }
        }]
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::clients::{ClientError, ClientResult};
    use crate::messaging::message::ReceivedMessage;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    struct CreateCall {
        queue_name: String,
        attributes: HashMap<String, String>,
    }

    /// Mock queue client recording create/delete calls.
    #[derive(Default)]
    struct MockQueueClient {
        create_calls: Mutex<Vec<CreateCall>>,
        deleted: Mutex<Vec<String>>,
        fail_create: bool,
        fail_delete: bool,
    }

    #[async_trait]
    impl QueueClient for MockQueueClient {
        async fn create_queue(
            &self,
            queue_name: &str,
            attributes: HashMap<String, String>,
        ) -> ClientResult<String> {
            if self.fail_create {
                return Err(ClientError::service("create rejected"));
            }
            self.create_calls.lock().unwrap().push(CreateCall {
                queue_name: queue_name.to_string(),
                attributes,
            });
            Ok(format!("https://queue.example.com/{queue_name}"))
        }

        async fn delete_queue(&self, queue_url: &str) -> ClientResult<()> {
            if self.fail_delete {
                return Err(ClientError::service("delete rejected"));
            }
            self.deleted.lock().unwrap().push(queue_url.to_string());
            Ok(())
        }

        async fn queue_arn(&self, queue_url: &str) -> ClientResult<String> {
            Ok(format!("arn:aws:sqs:::{queue_url}"))
        }

        async fn receive_messages(
            &self,
            _queue_url: &str,
            _max_messages: u32,
            _visibility_timeout: Duration,
        ) -> ClientResult<Vec<ReceivedMessage>> {
            Ok(vec![])
        }

        async fn delete_message(&self, _queue_url: &str, _receipt_handle: &str) -> ClientResult<()> {
            Ok(())
        }
    }

    const TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123456789012:orders";
    const FIFO_TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123456789012:orders.fifo";

    #[tokio::test]
    async fn test_generated_name_has_uuid_suffix() {
        let client = Arc::new(MockQueueClient::default());
        let provisioner = QueueProvisioner::new(client.clone());

        provisioner
            .provision(None, TOPIC_ARN)
            .await
            .expect("provision failed");

        let calls = client.create_calls.lock().unwrap();
        let name = &calls[0].queue_name;
        let token = name
            .strip_prefix(QUEUE_NAME_PREFIX)
            .expect("generated name missing prefix");
        Uuid::parse_str(token).expect("generated name suffix is not a v4 UUID");
    }

    #[tokio::test]
    async fn test_explicit_name_preserved() {
        let client = Arc::new(MockQueueClient::default());
        let provisioner = QueueProvisioner::new(client.clone());

        let queue = provisioner
            .provision(Some("orders-listener"), TOPIC_ARN)
            .await
            .expect("provision failed");

        assert!(!queue.is_fifo);
        let calls = client.create_calls.lock().unwrap();
        assert_eq!(calls[0].queue_name, "orders-listener");
        assert!(!calls[0].attributes.contains_key("FifoQueue"));
        assert!(!calls[0].attributes.contains_key("ContentBasedDeduplication"));
    }

    #[tokio::test]
    async fn test_fifo_topic_gets_fifo_queue() {
        let client = Arc::new(MockQueueClient::default());
        let provisioner = QueueProvisioner::new(client.clone());

        let queue = provisioner
            .provision(Some("orders-listener"), FIFO_TOPIC_ARN)
            .await
            .expect("provision failed");

        assert!(queue.is_fifo);
        let calls = client.create_calls.lock().unwrap();
        assert_eq!(calls[0].queue_name, "orders-listener.fifo");
        assert_eq!(calls[0].attributes.get("FifoQueue").map(String::as_str), Some("true"));
        assert_eq!(
            calls[0]
                .attributes
                .get("ContentBasedDeduplication")
                .map(String::as_str),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_generated_fifo_name_has_suffix() {
        let client = Arc::new(MockQueueClient::default());
        let provisioner = QueueProvisioner::new(client.clone());

        provisioner
            .provision(None, FIFO_TOPIC_ARN)
            .await
            .expect("provision failed");

        let calls = client.create_calls.lock().unwrap();
        assert!(calls[0].queue_name.starts_with(QUEUE_NAME_PREFIX));
        assert!(calls[0].queue_name.ends_with(FIFO_SUFFIX));
    }

    #[tokio::test]
    async fn test_policy_scoped_to_topic() {
        let client = Arc::new(MockQueueClient::default());
        let provisioner = QueueProvisioner::new(client.clone());

        provisioner
            .provision(Some("orders-listener"), TOPIC_ARN)
            .await
            .expect("provision failed");

        let calls = client.create_calls.lock().unwrap();
        let policy: serde_json::Value =
            serde_json::from_str(calls[0].attributes.get("Policy").expect("no policy set"))
                .expect("policy is not valid JSON");

        let statement = &policy["Statement"][0];
        assert_eq!(statement["Effect"], "Allow");
        assert_eq!(statement["Principal"]["Service"], "sns.amazonaws.com");
        assert_eq!(statement["Action"], "sqs:SendMessage");
        assert_eq!(statement["Condition"]["ArnEquals"]["aws:SourceArn"], TOPIC_ARN);
    }

    #[tokio::test]
    async fn test_invalid_name_is_provisioning_error_without_create_call() {
        let client = Arc::new(MockQueueClient::default());
        let provisioner = QueueProvisioner::new(client.clone());

        let err = provisioner
            .provision(Some("bad name!"), TOPIC_ARN)
            .await
            .unwrap_err();

        assert!(matches!(err, ListenerError::Provisioning { .. }));
        assert!(client.create_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_create_is_provisioning_error() {
        let client = Arc::new(MockQueueClient {
            fail_create: true,
            ..Default::default()
        });
        let provisioner = QueueProvisioner::new(client);

        let err = provisioner.provision(None, TOPIC_ARN).await.unwrap_err();
        assert!(matches!(err, ListenerError::Provisioning { .. }));
    }

    #[tokio::test]
    async fn test_teardown_deletes_queue() {
        let client = Arc::new(MockQueueClient::default());
        let provisioner = QueueProvisioner::new(client.clone());

        provisioner
            .teardown("https://queue.example.com/orders-listener")
            .await
            .expect("teardown failed");

        assert_eq!(
            client.deleted.lock().unwrap().as_slice(),
            ["https://queue.example.com/orders-listener"]
        );
    }

    #[tokio::test]
    async fn test_teardown_failure_reported_not_thrown() {
        let client = Arc::new(MockQueueClient {
            fail_delete: true,
            ..Default::default()
        });
        let provisioner = QueueProvisioner::new(client);

        let failure = provisioner
            .teardown("https://queue.example.com/orders-listener")
            .await
            .unwrap_err();

        assert_eq!(failure.step, "delete_queue");
        assert!(failure.message.contains("delete rejected"));
    }
}
