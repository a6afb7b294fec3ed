mod cloud_watch_metrics_client;
mod config;
mod error;
mod metric;
mod report;
mod slack_client;
mod time_range;

use lambda_runtime::{service_fn, LambdaEvent};
use tracing_subscriber::EnvFilter;

use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct ReportHandlerOutput {
    message: String,
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    lambda_runtime::run(service_fn(report_handler)).await?;
    Ok(())
}

async fn report_handler(
    _event: LambdaEvent<Value>,
) -> Result<ReportHandlerOutput, lambda_runtime::Error> {
    let message = report::run().await?;
    Ok(ReportHandlerOutput { message })
}
