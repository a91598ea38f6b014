use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout the provider expects: UTC with a literal `Z`.
pub const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format_provider_time(instant: &DateTime<Utc>) -> String {
    instant.format(PROVIDER_TIME_FORMAT).to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CampaignRecipients {
    pub list_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhatsAppCampaign {
    pub name: String,
    pub template_id: i64,
    pub recipients: CampaignRecipients,
    pub scheduled_at: DateTime<Utc>,
}

/// Identifiers produced by one successful WhatsApp send.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CampaignReceipt {
    pub contact_ids: Vec<i64>,
    pub list_id: i64,
    pub template_id: i64,
    pub campaign_id: i64,
    pub scheduled_at: DateTime<Utc>,
}
