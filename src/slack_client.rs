use crate::error::BillingNotifierError;
use crate::metric::EstimatedCharge;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Serialize;

static CLIENT: Lazy<Client> = Lazy::new(Client::new);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub channel: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    pub fallback: String,
    pub pretext: String,
    pub color: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl Payload {
    pub fn estimated_charges(channel: &str, charges: &[EstimatedCharge]) -> Self {
        let fields = charges
            .iter()
            .map(|charge| Field {
                title: charge.label.clone(),
                value: charge.to_field_value(),
                short: true,
            })
            .collect();

        Payload {
            channel: channel.to_string(),
            attachments: vec![Attachment {
                fallback: "oops".to_string(),
                pretext: "".to_string(),
                color: "good".to_string(),
                fields,
            }],
        }
    }
}

pub struct SlackClient {
    webhook_url: String,
}

#[async_trait]
pub trait Notify {
    async fn notify(&self, payload: &Payload) -> Result<(), BillingNotifierError>;
}

#[async_trait]
impl Notify for SlackClient {
    async fn notify(&self, payload: &Payload) -> Result<(), BillingNotifierError> {
        let response = CLIENT
            .post(self.webhook_url.as_str())
            .json(payload)
            .send()
            .await?;
        response.error_for_status()?;
        Ok(())
    }
}

impl SlackClient {
    pub fn new(webhook_url: String) -> Self {
        SlackClient { webhook_url }
    }
}
