use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SmsKind {
    Transactional,
}

impl SmsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmsKind::Transactional => "transactional",
        }
    }
}

/// A single SMS sent immediately, outside of any campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionalSms {
    pub sender: Option<String>,
    pub recipient: String,
    pub content: String,
    pub kind: SmsKind,
}
