//! CLI for listening to a pub/sub topic.
//!
//! Prints the body of every message published to the topic to stdout; logs
//! go to stderr so output can be piped or redirected without pollution.
//! The queue is created at startup and deleted again on ctrl-c, along with
//! its subscription. Only one message at a time is received, so this is a
//! troubleshooting aid, not a high-volume processor.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::{ArgGroup, Parser};
use tracing::{error, info};

use sns_listener::logging::init_logging;
use sns_listener::messaging::aws::{SnsTopicClient, SqsQueueClient, SsmParameterClient};
use sns_listener::{Consumer, ListenerConfig, ListenerError, MessageContent};
use sns_listener::{ShutdownToken, TopicListener};

#[derive(Parser, Debug)]
#[command(
    name = "sns-listener",
    version,
    about = "Listens to an SNS topic by provisioning a temporary SQS queue",
    group(ArgGroup::new("topic-source").required(true).args(["topic_arn", "parameter_path"]))
)]
struct Args {
    /// ARN of the topic to listen to; mutually exclusive with --parameter-path
    #[arg(short = 't', long)]
    topic_arn: Option<String>,

    /// SSM parameter path to resolve the topic ARN from
    #[arg(short = 'p', long)]
    parameter_path: Option<String>,

    /// Name for the queue to create (".fifo" is appended automatically for
    /// FIFO topics); defaults to a generated sns-listener-<uuid> name
    #[arg(short = 'q', long)]
    queue_name: Option<String>,

    /// Delay between receive attempts, in milliseconds
    #[arg(short = 'i', long = "interval-ms", default_value_t = 1000)]
    interval_ms: u64,

    /// Log listener events to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Writes message bodies to stdout and poll errors to the log.
struct StdoutConsumer;

#[async_trait]
impl Consumer for StdoutConsumer {
    async fn on_message(&self, message: MessageContent) {
        println!("{}", message.body);
    }

    async fn on_error(&self, err: &ListenerError) {
        error!(error = %err, "Error while polling queue");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ListenerConfig {
        polling_interval: Duration::from_millis(args.interval_ms),
        queue_name: args.queue_name,
        parameter_path: args.parameter_path,
        topic_arn: args.topic_arn.unwrap_or_default(),
        verbose: args.verbose,
    };
    init_logging(config.verbose);

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let mut listener = TopicListener::new(
        config,
        Arc::new(SqsQueueClient::new(&aws_config)),
        Arc::new(SnsTopicClient::new(&aws_config)),
    )?
    .with_parameter_client(Arc::new(SsmParameterClient::new(&aws_config)));

    listener.setup().await?;

    let shutdown = ShutdownToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received interrupt, stopping listener");
            signal_token.cancel();
        }
    });

    let listen_result = listener.listen(&shutdown, Arc::new(StdoutConsumer)).await;
    if let Err(e) = &listen_result {
        error!(error = %e, "Runtime error while listening");
    }

    listener.teardown().await?;
    listen_result?;
    Ok(())
}
