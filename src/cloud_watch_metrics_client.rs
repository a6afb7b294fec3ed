use crate::config::Config;
use crate::error::BillingNotifierError;
use crate::time_range::TimeRange;
use async_trait::async_trait;

use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use rusoto_cloudwatch::{
    CloudWatch, CloudWatchClient, Datapoint, Dimension, GetMetricStatisticsInput,
};
use rusoto_core::Region;

use std::ops::Add;
use std::str::FromStr;

const METRIC_NAME: &str = "EstimatedCharges";
const NAMESPACE: &str = "AWS/Billing";
const PERIOD: i64 = 86_400;
const DEFAULT_STATISTICS: [&'static str; 1] = ["Average"];

/// One billing target: the account total, or a single service.
#[derive(Debug, PartialEq)]
pub struct ChargeQuery {
    pub label: String,
    pub service_name: Option<String>,
}

impl ChargeQuery {
    pub fn total() -> Self {
        ChargeQuery {
            label: "Total".to_string(),
            service_name: None,
        }
    }

    pub fn for_service(service_name: &str) -> Self {
        ChargeQuery {
            label: service_name.to_string(),
            service_name: Some(service_name.to_string()),
        }
    }

    fn dimensions(&self) -> Vec<Dimension> {
        let mut dimensions = vec![Dimension {
            name: "Currency".to_string(),
            value: "USD".to_string(),
        }];
        if let Some(ref service_name) = self.service_name {
            dimensions.push(Dimension {
                name: "ServiceName".to_string(),
                value: service_name.clone(),
            });
        }
        dimensions
    }

    fn to_input(&self, time_range: &TimeRange) -> GetMetricStatisticsInput {
        GetMetricStatisticsInput {
            start_time: time_range.start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            end_time: time_range.end.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            metric_name: METRIC_NAME.to_string(),
            namespace: NAMESPACE.to_string(),
            period: PERIOD,
            dimensions: Some(self.dimensions()),
            statistics: Some(
                DEFAULT_STATISTICS
                    .iter()
                    .map(|statistic| statistic.to_string())
                    .collect(),
            ),
            ..Default::default()
        }
    }
}

/// "Total" first, then one query per service in list order.
pub fn build_queries(service_names: &[String]) -> Vec<ChargeQuery> {
    let mut queries = Vec::with_capacity(service_names.len() + 1);
    queries.push(ChargeQuery::total());
    for service_name in service_names {
        queries.push(ChargeQuery::for_service(service_name));
    }
    queries
}

pub struct CloudWatchMetricsClient {
    client: CloudWatchClient,
}

#[async_trait]
pub trait FetchEstimatedCharges {
    async fn sum_estimated_charges(
        &self,
        query: &ChargeQuery,
        time_range: &TimeRange,
    ) -> Result<f64, BillingNotifierError>;
}

#[async_trait]
impl FetchEstimatedCharges for CloudWatchMetricsClient {
    async fn sum_estimated_charges(
        &self,
        query: &ChargeQuery,
        time_range: &TimeRange,
    ) -> Result<f64, BillingNotifierError> {
        let metrics = self
            .client
            .get_metric_statistics(query.to_input(time_range))
            .await?;
        self.sum_data_points(metrics.datapoints)
    }
}

impl CloudWatchMetricsClient {
    pub fn from_config(config: &Config) -> Result<Self, BillingNotifierError> {
        let region = resolve_region(config.endpoint.as_deref(), config.region.as_deref())?;
        Ok(CloudWatchMetricsClient::new_with_client(
            CloudWatchClient::new(region),
        ))
    }

    fn new_with_client(client: CloudWatchClient) -> Self {
        CloudWatchMetricsClient { client }
    }

    // Sums every returned average as-is. With a one-day period and a one-day
    // window CloudWatch returns at most one datapoint, so the sum is the
    // day's estimated charge.
    fn sum_data_points(
        &self,
        data_points: Option<Vec<Datapoint>>,
    ) -> Result<f64, BillingNotifierError> {
        let data_points = data_points.map_or(vec![], |points| points);
        if data_points.is_empty() {
            return Ok(0.0);
        }
        let mut total = BigDecimal::from(0);
        for data_point in data_points {
            let average = data_point
                .average
                .map(|average| {
                    BigDecimal::from_f64(average).map_or(BigDecimal::from(0), |average| average)
                })
                .ok_or(BillingNotifierError::MissingDatapointValue)?;
            total = total.add(average);
        }
        total.to_f64().ok_or(BillingNotifierError::ToPrimitive)
    }
}

fn resolve_region(
    endpoint: Option<&str>,
    region: Option<&str>,
) -> Result<Region, BillingNotifierError> {
    match (endpoint, region) {
        (Some(endpoint), region) => Ok(Region::Custom {
            name: region
                .map(|name| name.to_string())
                .unwrap_or_else(|| Region::default().name().to_string()),
            endpoint: endpoint.to_string(),
        }),
        (None, Some(region)) => Region::from_str(region)
            .map_err(|_| BillingNotifierError::InvalidRegion(region.to_string())),
        (None, None) => Ok(Region::default()),
    }
}

#[cfg(test)]
mod tests {
    use crate::cloud_watch_metrics_client::{
        build_queries, resolve_region, ChargeQuery, CloudWatchMetricsClient,
        FetchEstimatedCharges,
    };
    use crate::error::BillingNotifierError;
    use crate::time_range::TimeRange;
    use chrono::{DateTime, Utc};
    use rusoto_cloudwatch::{CloudWatchClient, Datapoint, Dimension};
    use rusoto_core::Region;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };
    use std::convert::TryFrom;
    use std::str::FromStr;

    fn datapoint(average: Option<f64>) -> Datapoint {
        Datapoint {
            average,
            extended_statistics: None,
            maximum: None,
            minimum: None,
            sample_count: None,
            sum: None,
            timestamp: None,
            unit: None,
        }
    }

    fn time_range() -> TimeRange {
        let now = DateTime::<Utc>::from_str("2020-12-01T15:00:00.0+00:00").unwrap();
        TimeRange::try_from(now).unwrap()
    }

    #[test]
    fn test_build_queries() {
        let service_names = vec!["AmazonEC2".to_string(), "AmazonS3".to_string()];
        let queries = build_queries(&service_names);

        assert_eq!(
            queries,
            vec![
                ChargeQuery {
                    label: "Total".to_string(),
                    service_name: None,
                },
                ChargeQuery {
                    label: "AmazonEC2".to_string(),
                    service_name: Some("AmazonEC2".to_string()),
                },
                ChargeQuery {
                    label: "AmazonS3".to_string(),
                    service_name: Some("AmazonS3".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_to_input() {
        let input = ChargeQuery::for_service("AmazonEC2").to_input(&time_range());

        assert_eq!(input.metric_name, "EstimatedCharges");
        assert_eq!(input.namespace, "AWS/Billing");
        assert_eq!(input.period, 86_400);
        assert_eq!(input.statistics, Some(vec!["Average".to_string()]));
        assert_eq!(input.start_time, "2020-11-30T15:00:00Z");
        assert_eq!(input.end_time, "2020-12-01T14:59:59Z");
        assert_eq!(
            input.dimensions,
            Some(vec![
                Dimension {
                    name: "Currency".to_string(),
                    value: "USD".to_string(),
                },
                Dimension {
                    name: "ServiceName".to_string(),
                    value: "AmazonEC2".to_string(),
                },
            ])
        );
    }

    #[test]
    fn test_to_input_total_has_currency_dimension_only() {
        let input = ChargeQuery::total().to_input(&time_range());

        assert_eq!(
            input.dimensions,
            Some(vec![Dimension {
                name: "Currency".to_string(),
                value: "USD".to_string(),
            }])
        );
    }

    #[tokio::test]
    async fn test_sum_estimated_charges() {
        let mock = CloudWatchClient::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/valid",
                "get_metric_statistics.xml",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = CloudWatchMetricsClient::new_with_client(mock);
        let result = client
            .sum_estimated_charges(&ChargeQuery::for_service("AmazonEC2"), &time_range())
            .await;

        assert_eq!(result.unwrap(), 10.0);
    }

    #[tokio::test]
    async fn test_sum_estimated_charges_without_datapoints() {
        let mock = CloudWatchClient::new_with(
            MockRequestDispatcher::default().with_body(&*MockResponseReader::read_response(
                "test_resources/empty",
                "get_metric_statistics.xml",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = CloudWatchMetricsClient::new_with_client(mock);
        let result = client
            .sum_estimated_charges(&ChargeQuery::total(), &time_range())
            .await;

        assert_eq!(result.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_sum_estimated_charges_error() {
        let mock = CloudWatchClient::new_with(
            MockRequestDispatcher::with_status(400).with_body(&*MockResponseReader::read_response(
                "test_resources/error",
                "get_metric_statistics.xml",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = CloudWatchMetricsClient::new_with_client(mock);
        let result = client
            .sum_estimated_charges(&ChargeQuery::total(), &time_range())
            .await;

        assert!(result.is_err());
    }

    #[test]
    fn test_sum_data_points_adds_every_average() {
        let client =
            CloudWatchMetricsClient::new_with_client(CloudWatchClient::new(Region::UsEast1));
        let result = client.sum_data_points(Some(vec![
            datapoint(Some(4.0)),
            datapoint(Some(6.0)),
            datapoint(Some(2.5)),
        ]));
        assert_eq!(result.unwrap(), 12.5);
    }

    #[test]
    fn test_sum_data_points_when_empty() {
        let client =
            CloudWatchMetricsClient::new_with_client(CloudWatchClient::new(Region::UsEast1));
        let result = client.sum_data_points(Some(vec![]));
        assert_eq!(result.unwrap(), 0.0);
    }

    #[test]
    fn test_sum_data_points_when_none() {
        let client =
            CloudWatchMetricsClient::new_with_client(CloudWatchClient::new(Region::UsEast1));
        let result = client.sum_data_points(None);
        assert_eq!(result.unwrap(), 0.0);
    }

    #[test]
    fn test_sum_data_points_without_average() {
        let client =
            CloudWatchMetricsClient::new_with_client(CloudWatchClient::new(Region::UsEast1));
        let result = client.sum_data_points(Some(vec![datapoint(None)]));
        assert!(matches!(
            result,
            Err(BillingNotifierError::MissingDatapointValue)
        ));
    }

    #[test]
    fn test_resolve_region() {
        assert_eq!(
            resolve_region(None, Some("ap-northeast-1")).unwrap(),
            Region::ApNortheast1
        );
        assert_eq!(
            resolve_region(Some("http://localhost:4566"), Some("us-east-1")).unwrap(),
            Region::Custom {
                name: "us-east-1".to_string(),
                endpoint: "http://localhost:4566".to_string(),
            }
        );
        assert!(matches!(
            resolve_region(None, Some("not-a-region")),
            Err(BillingNotifierError::InvalidRegion(_))
        ));
    }
}
