use std::sync::Arc;

use poem_openapi::Tags;

use crate::application::handlers::message_dispatcher::MessageDispatcher;

pub struct ApiState {
    pub dispatcher: Arc<MessageDispatcher>,
    pub service_api_key: Option<String>,
    pub dry_run: bool,
}

#[derive(Clone, Default)]
pub struct Endpoints {
    pub dry_run: bool,
}

/// Enum of API sections (tags)
#[derive(Tags)]
pub enum EndpointsTags {
    Health,
    Messages,
}
