//! # Lifecycle Orchestrator
//!
//! Sequences one listener run: resolve the topic ARN (when configured via a
//! parameter path), provision the queue, fetch its ARN, subscribe it to the
//! topic, poll until cancelled, then unwind. Resource handles accumulate on
//! the orchestrator as they are created and are unwound in reverse order:
//! on startup failure as a rollback, on shutdown as the teardown step. A
//! resource that was never created is never torn down.
//!
//! Teardown never short-circuits: unsubscribe and queue deletion both run
//! regardless of each other's outcome, and their failures are combined into
//! a single reported error.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::config::ListenerConfig;
use crate::consumer::Consumer;
use crate::error::{ListenerError, Result, TeardownFailure};
use crate::messaging::clients::{ParameterClient, QueueClient, TopicClient};
use crate::messaging::{
    ParameterResolver, ProvisionedQueue, QueueProvisioner, Subscription, SubscriptionManager,
};
use crate::orchestration::poller::QueuePoller;
use crate::orchestration::shutdown::ShutdownToken;

/// Where a run currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Resolving,
    Provisioning,
    Subscribing,
    Listening,
    TearingDown,
    Done,
    Failed,
}

/// Orchestrates setup → listen → teardown for one topic.
///
/// Owns the provisioned queue and subscription exclusively for the duration
/// of the run; nothing is shared across concurrent runs.
pub struct TopicListener {
    config: ListenerConfig,
    queue_client: Arc<dyn QueueClient>,
    provisioner: QueueProvisioner,
    subscriptions: SubscriptionManager,
    resolver: Option<ParameterResolver>,
    topic_arn: String,
    state: LifecycleState,
    queue: Option<ProvisionedQueue>,
    subscription: Option<Subscription>,
}

impl TopicListener {
    /// Build a listener over the given service clients. Validates the
    /// config up front; a zero polling interval is normalized to the
    /// default here.
    pub fn new(
        mut config: ListenerConfig,
        queue_client: Arc<dyn QueueClient>,
        topic_client: Arc<dyn TopicClient>,
    ) -> Result<Self> {
        config.validate()?;

        let topic_arn = config.topic_arn.clone();
        Ok(Self {
            config,
            queue_client: queue_client.clone(),
            provisioner: QueueProvisioner::new(queue_client),
            subscriptions: SubscriptionManager::new(topic_client),
            resolver: None,
            topic_arn,
            state: LifecycleState::Idle,
            queue: None,
            subscription: None,
        })
    }

    /// Attach a parameter-store client, required when the config carries a
    /// parameter path instead of a topic ARN.
    pub fn with_parameter_client(mut self, client: Arc<dyn ParameterClient>) -> Self {
        self.resolver = Some(ParameterResolver::new(client));
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The topic ARN in effect for this run (post-resolution, if any).
    pub fn topic_arn(&self) -> &str {
        &self.topic_arn
    }

    /// The provisioned queue, once setup has created it.
    pub fn queue(&self) -> Option<&ProvisionedQueue> {
        self.queue.as_ref()
    }

    /// The topic subscription, once setup has created it.
    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    /// Resolve, provision and subscribe. On failure, resources already
    /// created in this run are rolled back (in reverse order) before the
    /// startup error is returned.
    pub async fn setup(&mut self) -> Result<()> {
        if let Some(path) = self
            .config
            .parameter_path
            .clone()
            .filter(|p| !p.is_empty())
        {
            self.state = LifecycleState::Resolving;
            let resolver = match self.resolver.as_ref() {
                Some(resolver) => resolver,
                None => {
                    self.state = LifecycleState::Failed;
                    return Err(ListenerError::configuration(
                        "a parameter client is required to resolve a parameter path",
                    ));
                }
            };
            match resolver.resolve(&path).await {
                Ok(topic_arn) => self.topic_arn = topic_arn,
                Err(e) => {
                    self.state = LifecycleState::Failed;
                    return Err(e);
                }
            }
        }

        self.state = LifecycleState::Provisioning;
        let mut queue = match self
            .provisioner
            .provision(self.config.queue_name.as_deref(), &self.topic_arn)
            .await
        {
            Ok(queue) => queue,
            Err(e) => {
                self.state = LifecycleState::Failed;
                return Err(e);
            }
        };

        let queue_arn = match self.provisioner.fetch_arn(&queue.url).await {
            Ok(arn) => arn,
            Err(e) => {
                // The queue exists even though its ARN could not be read;
                // it must not leak.
                self.queue = Some(queue);
                self.fail_with_rollback().await;
                return Err(e);
            }
        };
        queue.arn = Some(queue_arn.clone());
        self.queue = Some(queue);

        self.state = LifecycleState::Subscribing;
        let subscription = match self.subscriptions.subscribe(&self.topic_arn, &queue_arn).await {
            Ok(subscription) => subscription,
            Err(e) => {
                self.fail_with_rollback().await;
                return Err(e);
            }
        };

        info!(
            topic_arn = %self.topic_arn,
            subscription_arn = %subscription.arn,
            "🚀 Listener initialised"
        );
        self.subscription = Some(subscription);
        Ok(())
    }

    /// Run the poll loop until the shutdown token fires.
    ///
    /// The loop runs on its own task; its completion comes back over a
    /// one-slot channel so callers holding the token can race interrupts
    /// against the loop's exit.
    pub async fn listen(
        &mut self,
        shutdown: &ShutdownToken,
        consumer: Arc<dyn Consumer>,
    ) -> Result<()> {
        let queue_url = match self.queue.as_ref() {
            Some(queue) => queue.url.clone(),
            None => {
                return Err(ListenerError::configuration(
                    "setup must complete before listening",
                ))
            }
        };

        self.state = LifecycleState::Listening;

        let poller = QueuePoller::new(
            self.queue_client.clone(),
            queue_url,
            self.config.polling_interval,
        );
        let token = shutdown.clone();
        let (done_tx, done_rx) = oneshot::channel();

        tokio::spawn(async move {
            poller.run(&token, consumer.as_ref()).await;
            let _ = done_tx.send(());
        });

        done_rx.await.map_err(|_| {
            error!("Poll loop task terminated without completing");
            ListenerError::poll("poll_loop", "poll task terminated unexpectedly")
        })
    }

    /// Unwind the subscription and the queue, in that order, attempting
    /// both regardless of individual outcomes. Runs on a fresh,
    /// non-cancelled path: the shutdown token is deliberately ignored so
    /// cleanup is not aborted by the signal that stopped polling.
    pub async fn teardown(&mut self) -> Result<()> {
        self.state = LifecycleState::TearingDown;
        let failures = self.unwind().await;
        self.state = LifecycleState::Done;

        if failures.is_empty() {
            info!("Listener torn down cleanly");
            Ok(())
        } else {
            Err(ListenerError::teardown(failures))
        }
    }

    /// Full lifecycle: setup, listen until cancelled, teardown.
    ///
    /// Reports the startup error when setup fails (after rollback), and
    /// otherwise the combined teardown result.
    pub async fn run(&mut self, shutdown: &ShutdownToken, consumer: Arc<dyn Consumer>) -> Result<()> {
        self.setup().await?;
        let listen_result = self.listen(shutdown, consumer).await;
        let teardown_result = self.teardown().await;
        listen_result.and(teardown_result)
    }

    async fn fail_with_rollback(&mut self) {
        debug!("Startup failed, rolling back already-created resources");
        for failure in self.unwind().await {
            warn!(step = %failure.step, error = %failure.message, "Rollback step failed");
        }
        self.state = LifecycleState::Failed;
    }

    /// Reverse-order unwind of whatever has been created so far. Collects
    /// failures instead of short-circuiting.
    async fn unwind(&mut self) -> Vec<TeardownFailure> {
        let mut failures = Vec::new();

        if let Some(subscription) = self.subscription.take() {
            if let Err(failure) = self.subscriptions.unsubscribe(&subscription.arn).await {
                failures.push(failure);
            }
        }

        if let Some(queue) = self.queue.take() {
            if let Err(failure) = self.provisioner.teardown(&queue.url).await {
                failures.push(failure);
            }
        }

        failures
    }
}
