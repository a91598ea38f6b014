pub mod campaign;
pub mod contact;
pub mod message;
pub mod sms;
pub mod template;

pub use campaign::{
    CampaignReceipt, CampaignRecipients, PROVIDER_TIME_FORMAT, WhatsAppCampaign,
    format_provider_time,
};
pub use contact::{Contact, ContactAttributes, ContactList, NewContactList};
pub use message::{DEFAULT_REGION, Message, MessageType};
pub use sms::{SmsKind, TransactionalSms};
pub use template::{TemplateCategory, TemplateStatus, TemplateSummary, WhatsAppTemplate};
