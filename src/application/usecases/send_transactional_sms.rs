use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    application::services::brevo::TransactionalSmsApi,
    domain::{
        errors::SendError,
        models::{Message, SmsKind, TransactionalSms},
    },
};

pub struct SendTransactionalSmsUseCase {
    api: Arc<dyn TransactionalSmsApi>,
}

impl SendTransactionalSmsUseCase {
    pub fn new(api: Arc<dyn TransactionalSmsApi>) -> Self {
        Self { api }
    }

    /// Sends one SMS per recipient, in order, and stops at the first failure.
    /// Returns the recipients that were sent to.
    pub async fn execute(&self, message: &Message) -> Result<Vec<String>, SendError> {
        let recipients = message.recipient_list();
        let mut delivered = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            let sms = TransactionalSms {
                sender: message.sender.clone(),
                recipient: recipient.clone(),
                content: message.body.clone(),
                kind: SmsKind::Transactional,
            };

            if let Err(source) = self.api.send_transactional_sms(&sms).await {
                warn!(%recipient, error = %source, sent = delivered.len(), "sms send failed");
                return Err(SendError::Sms {
                    recipient,
                    body: message.body.clone(),
                    sender: message.sender.clone(),
                    source,
                });
            }
            info!(%recipient, "sms sent");
            delivered.push(recipient);
        }

        Ok(delivered)
    }
}
