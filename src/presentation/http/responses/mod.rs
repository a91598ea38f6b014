use poem_openapi::Object;

use crate::presentation::models::MessageTypeKind;

#[derive(Object, Debug)]
pub struct CampaignDto {
    pub campaign_id: i64,
    pub template_id: i64,
    pub list_id: i64,
    pub contact_ids: Vec<i64>,
    pub scheduled_at: String,
}

#[derive(Object, Debug)]
pub struct SendMessageResponseDto {
    #[oai(rename = "type")]
    pub message_type: MessageTypeKind,
    /// Recipients an SMS went out to; empty for WhatsApp campaigns.
    pub delivered: Vec<String>,
    pub campaign: Option<CampaignDto>,
}
