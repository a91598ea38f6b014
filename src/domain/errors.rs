use thiserror::Error;

/// Failure of a single call against the remote messaging API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Provider returned {status}{}: {message}", code_suffix(.code))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}

/// Failure of one step of the WhatsApp campaign workflow.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{operation} failed: {source}")]
    Provider {
        operation: &'static str,
        #[source]
        source: ProviderError,
    },
    #[error("Template {template_id} was rejected: {status}")]
    ApprovalRejected { template_id: i64, status: String },
    #[error("Template {template_id} still not approved after {attempts} polls")]
    ApprovalTimedOut { template_id: i64, attempts: u32 },
    #[error("Workflow cancelled while waiting for template {template_id}")]
    Cancelled { template_id: i64 },
}

impl WorkflowError {
    pub fn provider(operation: &'static str) -> impl FnOnce(ProviderError) -> Self {
        move |source| WorkflowError::Provider { operation, source }
    }
}

/// Error surfaced to the caller of the dispatcher.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Unsupported message type: {0}")]
    UnsupportedType(String),
    #[error("Error while sending SMS to {recipient} with content {body} from {}: {source}", sender_label(.sender))]
    Sms {
        recipient: String,
        body: String,
        sender: Option<String>,
        #[source]
        source: ProviderError,
    },
    #[error("Error while sending WhatsApp to {} with content {body} from {}: {source}", .recipients.join(", "), sender_label(.sender))]
    WhatsApp {
        recipients: Vec<String>,
        body: String,
        sender: Option<String>,
        #[source]
        source: WorkflowError,
    },
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" ({c})"))
        .unwrap_or_default()
}

fn sender_label(sender: &Option<String>) -> &str {
    sender.as_deref().unwrap_or("<default sender>")
}
