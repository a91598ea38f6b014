use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    errors::ProviderError,
    models::{
        Contact, ContactAttributes, ContactList, NewContactList, TemplateSummary,
        TransactionalSms, WhatsAppCampaign, WhatsAppTemplate,
    },
};

#[async_trait]
pub trait TransactionalSmsApi: Send + Sync {
    async fn send_transactional_sms(&self, sms: &TransactionalSms) -> Result<(), ProviderError>;
}

#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// Looks a contact up by phone number. A missing contact is reported as
    /// [`ProviderError::NotFound`].
    async fn get_contact(&self, number: &str) -> Result<Contact, ProviderError>;
    async fn create_contact(&self, attributes: &ContactAttributes) -> Result<Contact, ProviderError>;
    async fn create_list(&self, list: &NewContactList) -> Result<ContactList, ProviderError>;
    async fn add_contacts_to_list(
        &self,
        list_id: i64,
        contact_ids: &[i64],
    ) -> Result<(), ProviderError>;
}

#[async_trait]
pub trait WhatsAppCampaignsApi: Send + Sync {
    async fn create_template(&self, template: &WhatsAppTemplate) -> Result<i64, ProviderError>;
    async fn request_template_approval(&self, template_id: i64) -> Result<(), ProviderError>;
    /// Templates modified inside `[start, end]`.
    async fn list_templates(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TemplateSummary>, ProviderError>;
    async fn create_campaign(&self, campaign: &WhatsAppCampaign) -> Result<i64, ProviderError>;
}
