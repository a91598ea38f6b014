//! Sends SMS and WhatsApp messages through the Brevo API.
//!
//! SMS messages go out as one transactional SMS per recipient. WhatsApp
//! messages need a moderated template, so they run a workflow: provision
//! contacts and a recipient list, create a template, wait for its approval,
//! then schedule a campaign for the list.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::handlers::message_dispatcher::{DispatchReport, MessageDispatcher};
pub use domain::errors::{ProviderError, SendError, WorkflowError};
pub use domain::models::{Message, MessageType};
pub use domain::value_objects::Recipients;
