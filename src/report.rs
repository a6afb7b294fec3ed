use crate::cloud_watch_metrics_client::{
    build_queries, CloudWatchMetricsClient, FetchEstimatedCharges,
};
use crate::config::{self, Config};
use crate::error::BillingNotifierError;
use crate::metric::EstimatedCharge;
use crate::slack_client::{Notify, Payload, SlackClient};
use crate::time_range::TimeRange;
use chrono::{DateTime, Utc};
use std::convert::TryFrom;
use std::path::Path;

/// Builds and delivers yesterday's billing report. One notification per run.
pub async fn run() -> Result<String, BillingNotifierError> {
    let config = Config::from_env()?;
    let service_names = config::load_service_names(Path::new(config::SERVICE_NAME_FILE))?;
    let fetcher = CloudWatchMetricsClient::from_config(&config)?;
    let notifier = SlackClient::new(config.webhook_url.clone());

    deliver_report(
        &fetcher,
        &notifier,
        &config.channel_name,
        &service_names,
        Utc::now(),
    )
    .await
}

pub async fn deliver_report<F, N>(
    fetcher: &F,
    notifier: &N,
    channel: &str,
    service_names: &[String],
    now: DateTime<Utc>,
) -> Result<String, BillingNotifierError>
where
    F: FetchEstimatedCharges + Sync,
    N: Notify + Sync,
{
    let time_range = TimeRange::try_from(now)?;
    let queries = build_queries(service_names);
    tracing::info!(
        start = %time_range.start,
        end = %time_range.end,
        queries = queries.len(),
        "collecting estimated charges"
    );

    let mut charges = Vec::with_capacity(queries.len());
    for query in &queries {
        let amount = fetcher.sum_estimated_charges(query, &time_range).await?;
        tracing::debug!(label = %query.label, amount, "summed datapoints");
        charges.push(EstimatedCharge::new(&query.label, amount));
    }

    let payload = Payload::estimated_charges(channel, &charges);
    notifier.notify(&payload).await?;
    tracing::info!(channel = %channel, fields = charges.len(), "billing report delivered");

    Ok("ok".to_string())
}
