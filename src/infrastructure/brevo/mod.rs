use std::sync::Arc;

use tracing::info;

use crate::{
    application::handlers::message_dispatcher::MessageDispatcher,
    config::BrevoConfig,
    domain::errors::SendError,
};

pub mod client;
pub mod in_memory;

pub use client::{BrevoClient, DEFAULT_BASE_URL};
pub use in_memory::InMemoryBrevo;

/// Wires a dispatcher against Brevo, or against [`InMemoryBrevo`] in dry-run mode.
pub fn build_dispatcher(config: &BrevoConfig) -> Result<MessageDispatcher, SendError> {
    if config.dry_run {
        info!("brevo dry run enabled, nothing leaves this process");
        let brevo = Arc::new(InMemoryBrevo::dry_run());
        return Ok(MessageDispatcher::new(
            brevo.clone(),
            brevo.clone(),
            brevo,
            config.campaign.clone(),
        ));
    }

    config.credentials.validate()?;
    let connect = |key: &str| {
        BrevoClient::new(&config.base_url, key)
            .map_err(|e| SendError::Configuration(format!("cannot build brevo client: {e}")))
    };
    let sms_client = Arc::new(connect(&config.credentials.transactional_key)?);
    let api_client = Arc::new(connect(&config.credentials.api_key)?);

    Ok(MessageDispatcher::new(
        sms_client,
        api_client.clone(),
        api_client,
        config.campaign.clone(),
    ))
}
