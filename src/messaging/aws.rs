//! # AWS SDK Client Wrappers
//!
//! Thin adapters satisfying the capability traits with v2-generation AWS
//! SDK clients. Nothing here retries or interprets service behavior; the
//! lifecycle logic lives above the trait boundary, which is also why these
//! wrappers carry no tests of their own.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::QueueAttributeName;

use crate::messaging::clients::{
    ClientError, ClientResult, ParameterClient, QueueClient, TopicClient,
};
use crate::messaging::message::ReceivedMessage;

/// SQS-backed [`QueueClient`].
#[derive(Debug, Clone)]
pub struct SqsQueueClient {
    client: aws_sdk_sqs::Client,
}

impl SqsQueueClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_sqs::Client::new(config),
        }
    }
}

#[async_trait]
impl QueueClient for SqsQueueClient {
    async fn create_queue(
        &self,
        queue_name: &str,
        attributes: HashMap<String, String>,
    ) -> ClientResult<String> {
        let mut request = self.client.create_queue().queue_name(queue_name);
        for (name, value) in attributes {
            request = request.attributes(QueueAttributeName::from(name.as_str()), value);
        }

        let output = request
            .send()
            .await
            .map_err(|e| ClientError::service(format!("{}", DisplayErrorContext(&e))))?;

        output
            .queue_url()
            .map(str::to_string)
            .ok_or_else(|| ClientError::service("create_queue returned no queue URL"))
    }

    async fn delete_queue(&self, queue_url: &str) -> ClientResult<()> {
        self.client
            .delete_queue()
            .queue_url(queue_url)
            .send()
            .await
            .map_err(|e| ClientError::service(format!("{}", DisplayErrorContext(&e))))?;
        Ok(())
    }

    async fn queue_arn(&self, queue_url: &str) -> ClientResult<String> {
        let output = self
            .client
            .get_queue_attributes()
            .queue_url(queue_url)
            .attribute_names(QueueAttributeName::QueueArn)
            .send()
            .await
            .map_err(|e| ClientError::service(format!("{}", DisplayErrorContext(&e))))?;

        output
            .attributes()
            .and_then(|attrs| attrs.get(&QueueAttributeName::QueueArn))
            .cloned()
            .ok_or_else(|| ClientError::service("queue has no QueueArn attribute"))
    }

    async fn receive_messages(
        &self,
        queue_url: &str,
        max_messages: u32,
        visibility_timeout: Duration,
    ) -> ClientResult<Vec<ReceivedMessage>> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages as i32)
            .visibility_timeout(visibility_timeout.as_secs() as i32)
            .message_attribute_names("All")
            .send()
            .await
            .map_err(|e| ClientError::service(format!("{}", DisplayErrorContext(&e))))?;

        Ok(output
            .messages()
            .iter()
            .map(|message| ReceivedMessage {
                id: message.message_id().unwrap_or_default().to_string(),
                body: message.body().unwrap_or_default().to_string(),
                receipt_handle: message.receipt_handle().unwrap_or_default().to_string(),
            })
            .collect())
    }

    async fn delete_message(&self, queue_url: &str, receipt_handle: &str) -> ClientResult<()> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| ClientError::service(format!("{}", DisplayErrorContext(&e))))?;
        Ok(())
    }
}

/// SNS-backed [`TopicClient`].
#[derive(Debug, Clone)]
pub struct SnsTopicClient {
    client: aws_sdk_sns::Client,
}

impl SnsTopicClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_sns::Client::new(config),
        }
    }
}

#[async_trait]
impl TopicClient for SnsTopicClient {
    async fn subscribe(&self, topic_arn: &str, queue_arn: &str) -> ClientResult<String> {
        let output = self
            .client
            .subscribe()
            .topic_arn(topic_arn)
            .protocol("sqs")
            .endpoint(queue_arn)
            .return_subscription_arn(true)
            .send()
            .await
            .map_err(|e| ClientError::service(format!("{}", DisplayErrorContext(&e))))?;

        output
            .subscription_arn()
            .map(str::to_string)
            .ok_or_else(|| ClientError::service("subscribe returned no subscription ARN"))
    }

    async fn unsubscribe(&self, subscription_arn: &str) -> ClientResult<()> {
        self.client
            .unsubscribe()
            .subscription_arn(subscription_arn)
            .send()
            .await
            .map_err(|e| ClientError::service(format!("{}", DisplayErrorContext(&e))))?;
        Ok(())
    }
}

/// SSM-backed [`ParameterClient`].
#[derive(Debug, Clone)]
pub struct SsmParameterClient {
    client: aws_sdk_ssm::Client,
}

impl SsmParameterClient {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_ssm::Client::new(config),
        }
    }
}

#[async_trait]
impl ParameterClient for SsmParameterClient {
    async fn get_parameter(&self, path: &str, decrypt: bool) -> ClientResult<String> {
        let output = self
            .client
            .get_parameter()
            .name(path)
            .with_decryption(decrypt)
            .send()
            .await
            .map_err(|e| ClientError::service(format!("{}", DisplayErrorContext(&e))))?;

        output
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(str::to_string)
            .ok_or_else(|| ClientError::service(format!("parameter {path} has no value")))
    }
}
