//! # Lifecycle Orchestration
//!
//! The setup → listen → teardown state machine. [`TopicListener`] sequences
//! parameter resolution, queue provisioning and subscription, runs the
//! [`QueuePoller`] on its own task until the [`ShutdownToken`] fires, then
//! unwinds the created resources, aggregating teardown errors instead of
//! short-circuiting on the first one.

pub mod lifecycle;
pub mod poller;
pub mod shutdown;

pub use lifecycle::{LifecycleState, TopicListener};
pub use poller::QueuePoller;
pub use shutdown::ShutdownToken;
