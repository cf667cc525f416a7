//! # Parameter Resolver
//!
//! Resolves a symbolic parameter-store path to a topic ARN. Resolution
//! failures are fatal to startup; the orchestrator must not proceed to
//! queue provisioning with an unresolved topic.

use std::sync::Arc;

use tracing::debug;

use crate::error::{ListenerError, Result};
use crate::messaging::clients::ParameterClient;

/// Resolves topic ARNs through a [`ParameterClient`].
pub struct ParameterResolver {
    client: Arc<dyn ParameterClient>,
}

impl ParameterResolver {
    pub fn new(client: Arc<dyn ParameterClient>) -> Self {
        Self { client }
    }

    /// Fetch the decrypted parameter value at `path`. No retry.
    pub async fn resolve(&self, path: &str) -> Result<String> {
        debug!(path = %path, "Fetching topic ARN from parameter store");

        let value = self
            .client
            .get_parameter(path, true)
            .await
            .map_err(|e| ListenerError::resolution(path, e.to_string()))?;

        debug!(path = %path, value = %value, "Resolved parameter");
        Ok(value)
    }
}
