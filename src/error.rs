use std::error::Error;

use rusoto_cloudwatch::GetMetricStatisticsError;
use rusoto_core::RusotoError;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

#[derive(Debug)]
pub enum BillingNotifierError {
    MissingConfiguration(&'static str),
    InvalidRegion(String),
    ServiceListRead(std::io::Error),
    ServiceListParse(serde_yaml::Error),
    InvalidTimeRange,
    MissingDatapointValue,
    ToPrimitive,
    GetMetricsError(RusotoError<GetMetricStatisticsError>),
    WebhookError(reqwest::Error),
}

impl Display for BillingNotifierError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            BillingNotifierError::MissingConfiguration(name) => {
                write!(f, "Environment variable {} is not set", name)
            }
            BillingNotifierError::InvalidRegion(ref region) => {
                write!(f, "Unknown region {}", region)
            }
            BillingNotifierError::ServiceListRead(ref error) => {
                write!(f, "Failed to read service name list: {}", error)
            }
            BillingNotifierError::ServiceListParse(ref error) => {
                write!(f, "Failed to parse service name list: {}", error)
            }
            BillingNotifierError::InvalidTimeRange => write!(f, "Failed to build report time range"),
            BillingNotifierError::MissingDatapointValue => write!(f, "Datapoint has no average"),
            BillingNotifierError::ToPrimitive => {
                write!(f, "Failed to convert bigDecimal to primitive")
            }
            BillingNotifierError::GetMetricsError(ref error) => std::fmt::Display::fmt(error, f),
            BillingNotifierError::WebhookError(ref error) => std::fmt::Display::fmt(error, f),
        }
    }
}

impl Error for BillingNotifierError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            BillingNotifierError::ServiceListRead(ref error) => Some(error),
            BillingNotifierError::ServiceListParse(ref error) => Some(error),
            BillingNotifierError::GetMetricsError(ref error) => Some(error),
            BillingNotifierError::WebhookError(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<RusotoError<GetMetricStatisticsError>> for BillingNotifierError {
    fn from(e: RusotoError<GetMetricStatisticsError>) -> BillingNotifierError {
        BillingNotifierError::GetMetricsError(e)
    }
}

impl From<reqwest::Error> for BillingNotifierError {
    fn from(e: reqwest::Error) -> BillingNotifierError {
        BillingNotifierError::WebhookError(e)
    }
}
