//! # Messaging Layer
//!
//! Capability traits for the external queue, topic and parameter services,
//! plus the resource managers built on top of them: the queue provisioner,
//! the subscription manager and the parameter resolver. Production callers
//! satisfy the traits with SDK wrappers; tests satisfy them with mocks.

#[cfg(feature = "aws")]
pub mod aws;
pub mod clients;
pub mod message;
pub mod parameter;
pub mod queue;
pub mod topic;

pub use clients::{ClientError, ParameterClient, QueueClient, TopicClient};
pub use message::{MessageContent, ReceivedMessage};
pub use parameter::ParameterResolver;
pub use queue::{ProvisionedQueue, QueueProvisioner};
pub use topic::{Subscription, SubscriptionManager};
