use serde::{Deserialize, Serialize};

use crate::domain::{errors::SendError, value_objects::Recipients};

pub const DEFAULT_REGION: &str = "de";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Sms,
    #[serde(rename = "whatsapp")]
    WhatsApp,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Sms => "sms",
            MessageType::WhatsApp => "whatsapp",
        }
    }

    pub fn parse(value: &str) -> Result<Self, SendError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sms" => Ok(MessageType::Sms),
            "whatsapp" => Ok(MessageType::WhatsApp),
            other => Err(SendError::UnsupportedType(other.to_string())),
        }
    }
}

/// One outbound communication as handed over by the host application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Language tag, also used as the WhatsApp template language.
    pub region: String,
    /// Sender name; the provider accepts at most 11 characters.
    pub sender: Option<String>,
    pub recipients: Recipients,
    pub body: String,
    pub message_type: MessageType,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            sender: None,
            recipients: Recipients::default(),
            body: String::new(),
            message_type: MessageType::Sms,
        }
    }
}

impl Message {
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            ..Self::default()
        }
    }

    pub fn sms() -> Self {
        Self::new(MessageType::Sms)
    }

    pub fn whatsapp() -> Self {
        Self::new(MessageType::WhatsApp)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.set_region(region);
        self
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.set_sender(Some(sender.into()));
        self
    }

    pub fn with_recipients(mut self, recipients: impl Into<Recipients>) -> Self {
        self.set_recipients(recipients);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.set_body(body);
        self
    }

    pub fn set_region(&mut self, region: impl Into<String>) -> &mut Self {
        self.region = region.into();
        self
    }

    pub fn set_sender(&mut self, sender: Option<String>) -> &mut Self {
        self.sender = sender;
        self
    }

    pub fn set_recipients(&mut self, recipients: impl Into<Recipients>) -> &mut Self {
        self.recipients = recipients.into();
        self
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> &mut Self {
        self.body = body.into();
        self
    }

    pub fn set_type(&mut self, message_type: MessageType) -> &mut Self {
        self.message_type = message_type;
        self
    }

    pub fn recipient_list(&self) -> Vec<String> {
        self.recipients.to_vec()
    }
}
