use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        services::brevo::{ContactsApi, TransactionalSmsApi, WhatsAppCampaignsApi},
        usecases::{
            send_transactional_sms::SendTransactionalSmsUseCase,
            send_whatsapp_campaign::{WhatsAppCampaignConfig, WhatsAppCampaignOrchestrator},
        },
    },
    domain::{
        errors::SendError,
        models::{CampaignReceipt, Message, MessageType},
    },
};

/// Outcome of a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchReport {
    Sms { delivered: Vec<String> },
    WhatsApp(CampaignReceipt),
}

pub struct MessageDispatcher {
    sms: SendTransactionalSmsUseCase,
    whatsapp: WhatsAppCampaignOrchestrator,
}

impl MessageDispatcher {
    pub fn new(
        sms_api: Arc<dyn TransactionalSmsApi>,
        contacts_api: Arc<dyn ContactsApi>,
        campaigns_api: Arc<dyn WhatsAppCampaignsApi>,
        config: WhatsAppCampaignConfig,
    ) -> Self {
        Self::from_parts(
            SendTransactionalSmsUseCase::new(sms_api),
            WhatsAppCampaignOrchestrator::new(contacts_api, campaigns_api, config),
        )
    }

    pub fn from_parts(
        sms: SendTransactionalSmsUseCase,
        whatsapp: WhatsAppCampaignOrchestrator,
    ) -> Self {
        Self { sms, whatsapp }
    }

    pub async fn send(&self, message: &Message) -> Result<DispatchReport, SendError> {
        self.send_with_cancellation(message, CancellationToken::new())
            .await
    }

    /// Like [`MessageDispatcher::send`], but a WhatsApp send waiting for
    /// template approval gives up once `cancel` fires.
    #[instrument(skip_all, fields(message_type = message.message_type.as_str()))]
    pub async fn send_with_cancellation(
        &self,
        message: &Message,
        cancel: CancellationToken,
    ) -> Result<DispatchReport, SendError> {
        match message.message_type {
            MessageType::Sms => {
                let delivered = self.sms.execute(message).await?;
                info!(count = delivered.len(), "sms batch sent");
                Ok(DispatchReport::Sms { delivered })
            }
            MessageType::WhatsApp => match self.whatsapp.execute(message, &cancel).await {
                Ok(receipt) => {
                    info!(campaign_id = receipt.campaign_id, "whatsapp campaign created");
                    Ok(DispatchReport::WhatsApp(receipt))
                }
                Err(source) => {
                    warn!(error = %source, "whatsapp send failed");
                    Err(SendError::WhatsApp {
                        recipients: message.recipient_list(),
                        body: message.body.clone(),
                        sender: message.sender.clone(),
                        source,
                    })
                }
            },
        }
    }
}
