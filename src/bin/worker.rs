// This is the Lambda bootstrap entry point for the Worker function

use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use linkdigest::core::config::{AppConfig, Role};
use linkdigest::worker::{WorkerContext, handler};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    linkdigest::setup_logging();

    let config = AppConfig::from_env(Role::Worker).map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e.to_string())
    })?;
    let ctx = Arc::new(WorkerContext::from_config(&config).map_err(|e| {
        error!("Failed to initialize worker: {}", e);
        Error::from(e.to_string())
    })?);

    info!(
        summarization_url = %config.summarization_url,
        keyphrase_url = %config.keyphrase_url,
        tagging_enabled = config.pipeline.tagging_enabled,
        "Worker initialized"
    );

    run(service_fn(move |event: LambdaEvent<Value>| {
        let ctx = Arc::clone(&ctx);
        async move { handler(&ctx, event).await }
    }))
    .await
}
