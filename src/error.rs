//! # Listener Error Types
//!
//! Structured error handling for the listener lifecycle using thiserror.
//! Startup errors (resolution, provisioning, subscription) are fatal and
//! abort the run after rollback; poll errors are reported to the consumer
//! and the loop keeps going; teardown errors are collected and reported
//! once at the end of the run.

use thiserror::Error;

/// Errors produced across the setup/listen/teardown lifecycle.
#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("Parameter resolution failed: {path}: {message}")]
    Resolution { path: String, message: String },

    #[error("Queue provisioning failed: {operation}: {message}")]
    Provisioning { operation: String, message: String },

    #[error("Subscription failed: {topic_arn}: {message}")]
    Subscription { topic_arn: String, message: String },

    #[error("Poll failed: {operation}: {message}")]
    Poll { operation: String, message: String },

    #[error("Teardown failed: {}", format_teardown_failures(.failures))]
    Teardown { failures: Vec<TeardownFailure> },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Clean-stop marker: an in-flight call observed cancellation. Never
    /// surfaced as a run failure.
    #[error("Operation cancelled")]
    Cancelled,
}

/// One failed teardown step, recorded without aborting the others.
#[derive(Debug)]
pub struct TeardownFailure {
    pub step: String,
    pub message: String,
}

impl std::fmt::Display for TeardownFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.step, self.message)
    }
}

fn format_teardown_failures(failures: &[TeardownFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ListenerError {
    pub fn resolution(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn provisioning(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provisioning {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn subscription(topic_arn: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Subscription {
            topic_arn: topic_arn.into(),
            message: message.into(),
        }
    }

    pub fn poll(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Poll {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn teardown(failures: Vec<TeardownFailure>) -> Self {
        Self::Teardown { failures }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error is the cooperative-cancellation marker.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, ListenerError>;
