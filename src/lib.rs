#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # SNS Listener
//!
//! Listens to events published to a pub/sub topic by provisioning a
//! temporary queue, authorizing the topic to push into it, subscribing the
//! queue to the topic and receiving messages from the queue on a loop.
//! Supports regular and FIFO topics, and topic ARNs resolved from a
//! parameter store.
//!
//! The crate has no opinion about which SDK backs the topic, queue and
//! parameter services. They are consumed through narrow capability traits
//! ([`messaging::QueueClient`], [`messaging::TopicClient`],
//! [`messaging::ParameterClient`]), with AWS SDK adapters available behind
//! the default `aws` feature.
//!
//! ## Module Organization
//!
//! - [`config`] - Listener configuration with defaults and validation
//! - [`error`] - Structured error taxonomy for the lifecycle
//! - [`messaging`] - Service capability traits and resource managers
//! - [`orchestration`] - Setup → listen → teardown state machine
//! - [`consumer`] - The caller-supplied message/error callback contract
//! - [`logging`] - Subscriber setup for binaries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use sns_listener::{Consumer, ListenerConfig, ListenerError, MessageContent};
//! use sns_listener::messaging::aws::{SnsTopicClient, SqsQueueClient};
//! use sns_listener::{ShutdownToken, TopicListener};
//!
//! struct PrintConsumer;
//!
//! #[async_trait]
//! impl Consumer for PrintConsumer {
//!     async fn on_message(&self, message: MessageContent) {
//!         println!("{}", message.body);
//!     }
//!     async fn on_error(&self, error: &ListenerError) {
//!         eprintln!("{error}");
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
//! let mut listener = TopicListener::new(
//!     ListenerConfig::new("arn:aws:sns:us-east-1:123456789012:orders"),
//!     Arc::new(SqsQueueClient::new(&aws_config)),
//!     Arc::new(SnsTopicClient::new(&aws_config)),
//! )?;
//!
//! let shutdown = ShutdownToken::new();
//! // Cancel `shutdown` from a signal handler to stop the run.
//! listener.run(&shutdown, Arc::new(PrintConsumer)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! The run owns its queue and subscription exclusively: both are created
//! during setup and deleted during teardown, including rollback when a
//! later setup step fails. Teardown errors are aggregated, never
//! short-circuited.

pub mod config;
pub mod consumer;
pub mod error;
pub mod logging;
pub mod messaging;
pub mod orchestration;
pub mod validation;

pub use config::ListenerConfig;
pub use consumer::Consumer;
pub use error::{ListenerError, Result, TeardownFailure};
pub use messaging::{MessageContent, ProvisionedQueue, ReceivedMessage, Subscription};
pub use orchestration::{LifecycleState, ShutdownToken, TopicListener};
