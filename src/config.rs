//! # Listener Configuration
//!
//! Programmatic configuration for one listener run. Defaults mirror the
//! behavior of the CLI: a 1 second polling interval, a generated queue name
//! and silent logging. Validation is explicit: a config that names neither
//! a topic ARN nor a parameter path is rejected before any service call.

use std::time::Duration;

use tracing::warn;

use crate::error::{ListenerError, Result};

/// Default delay between receive attempts against the queue.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(1);

/// Prefix for generated queue names.
pub const QUEUE_NAME_PREFIX: &str = "sns-listener-";

/// Configuration for a single listener run.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Time between attempts to receive messages from the queue.
    /// A zero interval is replaced with [`DEFAULT_POLLING_INTERVAL`].
    pub polling_interval: Duration,
    /// Name for the queue to create. When `None` a unique
    /// `sns-listener-<uuid>` name is generated at provisioning time.
    pub queue_name: Option<String>,
    /// Parameter-store path holding the topic ARN. When set, resolution
    /// overrides `topic_arn`.
    pub parameter_path: Option<String>,
    /// ARN of the topic to subscribe to.
    pub topic_arn: String,
    /// Gates listener logging in the binary; the library itself only emits
    /// tracing events.
    pub verbose: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            polling_interval: DEFAULT_POLLING_INTERVAL,
            queue_name: None,
            parameter_path: None,
            topic_arn: String::new(),
            verbose: false,
        }
    }
}

impl ListenerConfig {
    /// Config for listening to a topic known by ARN.
    pub fn new(topic_arn: impl Into<String>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            ..Self::default()
        }
    }

    /// Config for a topic ARN resolved from the parameter store.
    pub fn from_parameter_path(parameter_path: impl Into<String>) -> Self {
        Self {
            parameter_path: Some(parameter_path.into()),
            ..Self::default()
        }
    }

    pub fn with_queue_name(mut self, queue_name: impl Into<String>) -> Self {
        let queue_name = queue_name.into();
        self.queue_name = if queue_name.is_empty() {
            None
        } else {
            Some(queue_name)
        };
        self
    }

    pub fn with_polling_interval(mut self, polling_interval: Duration) -> Self {
        self.polling_interval = polling_interval;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate the config and normalize defaults.
    ///
    /// Either `topic_arn` or `parameter_path` must be set. A zero polling
    /// interval is replaced with the default rather than rejected outright,
    /// matching the CLI's treatment of an unset interval flag.
    pub fn validate(&mut self) -> Result<()> {
        if self.topic_arn.is_empty() && self.parameter_path.as_deref().unwrap_or("").is_empty() {
            return Err(ListenerError::configuration(
                "either a topic ARN or a parameter path must be provided",
            ));
        }

        if self.polling_interval.is_zero() {
            warn!(
                default_ms = DEFAULT_POLLING_INTERVAL.as_millis() as u64,
                "Polling interval must be positive, falling back to default"
            );
            self.polling_interval = DEFAULT_POLLING_INTERVAL;
        }

        Ok(())
    }
}
