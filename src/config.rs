use crate::error::BillingNotifierError;
use std::env;
use std::fs;
use std::path::Path;

/// Service name list bundled with the deployment package.
pub const SERVICE_NAME_FILE: &str = "config/servicename.yml";

#[derive(Debug, PartialEq)]
pub struct Config {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub webhook_url: String,
    pub channel_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, BillingNotifierError> {
        Ok(Config {
            endpoint: optional_var("CW_ENDPOINT"),
            region: optional_var("CW_REGION"),
            webhook_url: required_var("SLACK_WEBHOOK_URL")?,
            channel_name: required_var("SLACK_CHANNEL_NAME")?,
        })
    }
}

// An empty value counts as unset.
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn required_var(name: &'static str) -> Result<String, BillingNotifierError> {
    optional_var(name).ok_or(BillingNotifierError::MissingConfiguration(name))
}

pub fn load_service_names(path: &Path) -> Result<Vec<String>, BillingNotifierError> {
    let data = fs::read_to_string(path).map_err(BillingNotifierError::ServiceListRead)?;
    parse_service_names(&data)
}

fn parse_service_names(data: &str) -> Result<Vec<String>, BillingNotifierError> {
    serde_yaml::from_str(data).map_err(BillingNotifierError::ServiceListParse)
}
