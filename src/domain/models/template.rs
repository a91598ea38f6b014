use serde::{Deserialize, Serialize};

use crate::domain::errors::WorkflowError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TemplateCategory {
    Marketing,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Marketing => "MARKETING",
        }
    }
}

/// WhatsApp template draft submitted for moderation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhatsAppTemplate {
    pub name: String,
    pub language: String,
    pub category: TemplateCategory,
    pub body_text: String,
}

impl WhatsAppTemplate {
    pub fn marketing(
        name: impl Into<String>,
        language: impl Into<String>,
        body_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            category: TemplateCategory::Marketing,
            body_text: body_text.into(),
        }
    }

    /// Checks the fields the provider requires before a template can be created.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.language.trim().is_empty() {
            missing.push("language");
        }
        if self.body_text.trim().is_empty() {
            missing.push("bodyText");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::Validation(format!(
                "template is missing {}",
                missing.join(", ")
            )))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TemplateStatus {
    Pending,
    Approved,
    Rejected(String),
}

impl TemplateStatus {
    pub fn from_provider(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => TemplateStatus::Pending,
            "approved" => TemplateStatus::Approved,
            _ => TemplateStatus::Rejected(value.to_string()),
        }
    }
}

/// Template entry as reported by the template listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateSummary {
    pub id: i64,
    pub status: TemplateStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_template_passes() {
        let template = WhatsAppTemplate::marketing("template1", "de", "Hello");
        assert!(template.validate().is_ok());
    }

    #[test]
    fn empty_body_is_rejected() {
        let template = WhatsAppTemplate::marketing("template1", "de", "   ");
        let err = template.validate().unwrap_err();
        assert_eq!(
            err,
            WorkflowError::Validation("template is missing bodyText".into())
        );
    }

    #[test]
    fn unknown_status_counts_as_rejected() {
        assert_eq!(TemplateStatus::from_provider("approved"), TemplateStatus::Approved);
        assert_eq!(TemplateStatus::from_provider("PENDING"), TemplateStatus::Pending);
        assert_eq!(
            TemplateStatus::from_provider("paused"),
            TemplateStatus::Rejected("paused".into())
        );
    }
}
