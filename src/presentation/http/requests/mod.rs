use poem_openapi::Object;

use crate::domain::{
    errors::SendError,
    models::{DEFAULT_REGION, Message, MessageType},
};

#[derive(Object, Debug)]
pub struct SendMessageRequestDto {
    /// `sms` or `whatsapp`.
    #[oai(rename = "type")]
    pub message_type: String,
    #[oai(validator(min_items = 1))]
    pub recipients: Vec<String>,
    #[oai(validator(min_length = 1))]
    pub body: String,
    /// Sender name, at most 11 characters.
    #[oai(validator(min_length = 1, max_length = 11))]
    pub sender: Option<String>,
    /// Language tag, `de` when omitted.
    pub region: Option<String>,
}

impl SendMessageRequestDto {
    pub fn to_message(&self) -> Result<Message, SendError> {
        let mut message = Message::new(MessageType::parse(&self.message_type)?);
        message
            .set_region(self.region.clone().unwrap_or_else(|| DEFAULT_REGION.to_string()))
            .set_sender(self.sender.clone())
            .set_recipients(self.recipients.clone())
            .set_body(self.body.clone());
        Ok(message)
    }
}
