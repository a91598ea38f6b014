use std::sync::Arc;

use chrono::TimeDelta;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::{
    application::services::{
        approval::{ApprovalPolicy, ApprovalPoller},
        brevo::{ContactsApi, WhatsAppCampaignsApi},
        clock::{Clock, Sleeper, SystemClock, TokioSleeper},
        naming::{NameGenerator, UuidNameGenerator},
    },
    domain::{
        errors::WorkflowError,
        models::{
            CampaignReceipt, CampaignRecipients, ContactAttributes, Message, NewContactList,
            WhatsAppCampaign, WhatsAppTemplate,
        },
    },
};

pub const DEFAULT_LIST_FOLDER_ID: i64 = 1;

#[derive(Debug, Clone)]
pub struct WhatsAppCampaignConfig {
    /// Provider folder that receives the per-send recipient lists.
    pub list_folder_id: i64,
    /// Offset between campaign creation and its scheduled start.
    pub schedule_delay: TimeDelta,
    pub approval: ApprovalPolicy,
}

impl Default for WhatsAppCampaignConfig {
    fn default() -> Self {
        Self {
            list_folder_id: DEFAULT_LIST_FOLDER_ID,
            schedule_delay: TimeDelta::minutes(1),
            approval: ApprovalPolicy::default(),
        }
    }
}

/// Runs the WhatsApp send workflow: contacts, list, template, approval,
/// campaign. Every step consumes the identifiers produced by the one before.
pub struct WhatsAppCampaignOrchestrator {
    contacts: Arc<dyn ContactsApi>,
    campaigns: Arc<dyn WhatsAppCampaignsApi>,
    clock: Arc<dyn Clock>,
    names: Arc<dyn NameGenerator>,
    poller: ApprovalPoller,
    config: WhatsAppCampaignConfig,
}

impl WhatsAppCampaignOrchestrator {
    pub fn new(
        contacts: Arc<dyn ContactsApi>,
        campaigns: Arc<dyn WhatsAppCampaignsApi>,
        config: WhatsAppCampaignConfig,
    ) -> Self {
        Self::with_runtime(
            contacts,
            campaigns,
            config,
            Arc::new(SystemClock),
            Arc::new(TokioSleeper),
            Arc::new(UuidNameGenerator),
        )
    }

    pub fn with_runtime(
        contacts: Arc<dyn ContactsApi>,
        campaigns: Arc<dyn WhatsAppCampaignsApi>,
        config: WhatsAppCampaignConfig,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
        names: Arc<dyn NameGenerator>,
    ) -> Self {
        let poller = ApprovalPoller::new(
            campaigns.clone(),
            clock.clone(),
            sleeper,
            config.approval.clone(),
        );
        Self {
            contacts,
            campaigns,
            clock,
            names,
            poller,
            config,
        }
    }

    #[instrument(skip_all, fields(recipients = ?message.recipients))]
    pub async fn execute(
        &self,
        message: &Message,
        cancel: &CancellationToken,
    ) -> Result<CampaignReceipt, WorkflowError> {
        let numbers = message.recipient_list();
        if numbers.is_empty() {
            return Err(WorkflowError::Validation("message has no recipients".into()));
        }

        let template = self.draft_template(message)?;
        let contact_ids = self.provision_contacts(&numbers).await?;
        let list_id = self.provision_list(&numbers, &contact_ids).await?;
        let template_id = self.create_template(&template).await?;
        self.request_approval(template_id).await?;
        self.poller.wait_for_approval(template_id, cancel).await?;
        let (campaign_id, scheduled_at) = self.create_campaign(template_id, list_id).await?;

        Ok(CampaignReceipt {
            contact_ids,
            list_id,
            template_id,
            campaign_id,
            scheduled_at,
        })
    }

    async fn provision_contacts(&self, numbers: &[String]) -> Result<Vec<i64>, WorkflowError> {
        let mut ids = Vec::with_capacity(numbers.len());
        for number in numbers {
            let contact = match self.contacts.get_contact(number).await {
                Ok(contact) => {
                    debug!(%number, contact_id = contact.id, "contact exists");
                    contact
                }
                Err(err) if err.is_not_found() => {
                    let contact = self
                        .contacts
                        .create_contact(&ContactAttributes::for_number(number))
                        .await
                        .map_err(WorkflowError::provider("create contact"))?;
                    debug!(%number, contact_id = contact.id, "contact created");
                    contact
                }
                Err(err) => return Err(WorkflowError::provider("get contact")(err)),
            };
            ids.push(contact.id);
        }
        Ok(ids)
    }

    async fn provision_list(
        &self,
        numbers: &[String],
        contact_ids: &[i64],
    ) -> Result<i64, WorkflowError> {
        let list = self
            .contacts
            .create_list(&NewContactList::for_numbers(numbers, self.config.list_folder_id))
            .await
            .map_err(WorkflowError::provider("create list"))?;
        self.contacts
            .add_contacts_to_list(list.id, contact_ids)
            .await
            .map_err(WorkflowError::provider("add contacts to list"))?;
        info!(list_id = list.id, members = contact_ids.len(), "recipient list ready");
        Ok(list.id)
    }

    fn draft_template(&self, message: &Message) -> Result<WhatsAppTemplate, WorkflowError> {
        let template = WhatsAppTemplate::marketing(
            self.names.next("template"),
            message.region.clone(),
            message.body.clone(),
        );
        template.validate()?;
        Ok(template)
    }

    async fn create_template(&self, template: &WhatsAppTemplate) -> Result<i64, WorkflowError> {
        let template_id = self
            .campaigns
            .create_template(template)
            .await
            .map_err(WorkflowError::provider("create template"))?;
        info!(template_id, name = %template.name, "template created");
        Ok(template_id)
    }

    async fn request_approval(&self, template_id: i64) -> Result<(), WorkflowError> {
        self.campaigns
            .request_template_approval(template_id)
            .await
            .map_err(WorkflowError::provider("request template approval"))?;
        debug!(template_id, "template submitted for approval");
        Ok(())
    }

    async fn create_campaign(
        &self,
        template_id: i64,
        list_id: i64,
    ) -> Result<(i64, chrono::DateTime<chrono::Utc>), WorkflowError> {
        let campaign = WhatsAppCampaign {
            name: self.names.next("campaign"),
            template_id,
            recipients: CampaignRecipients {
                list_ids: vec![list_id],
            },
            scheduled_at: self.clock.now() + self.config.schedule_delay,
        };
        let campaign_id = self
            .campaigns
            .create_campaign(&campaign)
            .await
            .map_err(WorkflowError::provider("create campaign"))?;
        info!(campaign_id, scheduled_at = %campaign.scheduled_at, "campaign scheduled");
        Ok((campaign_id, campaign.scheduled_at))
    }
}
