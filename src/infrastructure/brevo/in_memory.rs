use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    application::services::brevo::{ContactsApi, TransactionalSmsApi, WhatsAppCampaignsApi},
    domain::{
        errors::ProviderError,
        models::{
            Contact, ContactAttributes, ContactList, NewContactList, TemplateStatus,
            TemplateSummary, TransactionalSms, WhatsAppCampaign, WhatsAppTemplate,
        },
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrevoOperation {
    SendSms,
    GetContact,
    CreateContact,
    CreateList,
    AddContactsToList,
    CreateTemplate,
    RequestApproval,
    ListTemplates,
    CreateCampaign,
}

/// One call received by [`InMemoryBrevo`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrevoCall {
    SendSms(TransactionalSms),
    GetContact(String),
    CreateContact(ContactAttributes),
    CreateList(NewContactList),
    AddContactsToList { list_id: i64, contact_ids: Vec<i64> },
    CreateTemplate(WhatsAppTemplate),
    RequestApproval(i64),
    ListTemplates { start: DateTime<Utc>, end: DateTime<Utc> },
    CreateCampaign(WhatsAppCampaign),
}

impl BrevoCall {
    pub fn operation(&self) -> BrevoOperation {
        match self {
            BrevoCall::SendSms(_) => BrevoOperation::SendSms,
            BrevoCall::GetContact(_) => BrevoOperation::GetContact,
            BrevoCall::CreateContact(_) => BrevoOperation::CreateContact,
            BrevoCall::CreateList(_) => BrevoOperation::CreateList,
            BrevoCall::AddContactsToList { .. } => BrevoOperation::AddContactsToList,
            BrevoCall::CreateTemplate(_) => BrevoOperation::CreateTemplate,
            BrevoCall::RequestApproval(_) => BrevoOperation::RequestApproval,
            BrevoCall::ListTemplates { .. } => BrevoOperation::ListTemplates,
            BrevoCall::CreateCampaign(_) => BrevoOperation::CreateCampaign,
        }
    }
}

struct InjectedFailure {
    operation: BrevoOperation,
    nth: usize,
    error: ProviderError,
}

#[derive(Default)]
struct State {
    recording: bool,
    last_id: i64,
    contacts: HashMap<String, i64>,
    lists: HashMap<i64, Vec<i64>>,
    templates: Vec<i64>,
    status_script: VecDeque<Option<TemplateStatus>>,
    failures: Vec<InjectedFailure>,
    seen: HashMap<BrevoOperation, usize>,
    calls: Vec<BrevoCall>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// Counts the call, logs it when recording, and returns the injected
    /// failure for it, if any.
    fn record(&mut self, call: BrevoCall) -> Result<(), ProviderError> {
        let operation = call.operation();
        let nth = {
            let seen = self.seen.entry(operation).or_default();
            *seen += 1;
            *seen
        };
        if self.recording {
            self.calls.push(call);
        }
        match self
            .failures
            .iter()
            .find(|f| f.operation == operation && f.nth == nth)
        {
            Some(failure) => Err(failure.error.clone()),
            None => Ok(()),
        }
    }
}

/// Provider stand-in that keeps everything in memory.
///
/// Templates are reported with the statuses queued through
/// [`InMemoryBrevo::script_template_statuses`], one entry per listing call
/// (`None` leaves the template out of the listing). Once the queue is empty
/// every template is reported as approved.
///
/// [`InMemoryBrevo::new`] keeps a log of every call and all created lists
/// and templates. [`InMemoryBrevo::dry_run`] keeps neither, so a
/// long-running server does not accumulate state.
#[derive(Clone)]
pub struct InMemoryBrevo {
    state: Arc<RwLock<State>>,
}

impl Default for InMemoryBrevo {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBrevo {
    pub fn new() -> Self {
        Self::with_recording(true)
    }

    pub fn dry_run() -> Self {
        Self::with_recording(false)
    }

    fn with_recording(recording: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                recording,
                ..State::default()
            })),
        }
    }

    pub async fn with_contact(&self, number: &str, contact_id: i64) {
        let mut state = self.state.write().await;
        state.contacts.insert(number.to_string(), contact_id);
        state.last_id = state.last_id.max(contact_id);
    }

    pub async fn script_template_statuses(&self, statuses: Vec<Option<TemplateStatus>>) {
        let mut state = self.state.write().await;
        state.status_script.extend(statuses);
    }

    /// Makes the `nth` call (1-based) of `operation` fail with `error`.
    pub async fn fail_on(&self, operation: BrevoOperation, nth: usize, error: ProviderError) {
        let mut state = self.state.write().await;
        state.failures.push(InjectedFailure {
            operation,
            nth,
            error,
        });
    }

    pub async fn calls(&self) -> Vec<BrevoCall> {
        self.state.read().await.calls.clone()
    }

    pub async fn calls_of(&self, operation: BrevoOperation) -> Vec<BrevoCall> {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter(|c| c.operation() == operation)
            .cloned()
            .collect()
    }

    pub async fn list_members(&self, list_id: i64) -> Option<Vec<i64>> {
        self.state.read().await.lists.get(&list_id).cloned()
    }

    /// Templates created and not yet turned into a campaign.
    pub async fn open_templates(&self) -> usize {
        self.state.read().await.templates.len()
    }
}

#[async_trait]
impl TransactionalSmsApi for InMemoryBrevo {
    async fn send_transactional_sms(&self, sms: &TransactionalSms) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        state.record(BrevoCall::SendSms(sms.clone()))
    }
}

#[async_trait]
impl ContactsApi for InMemoryBrevo {
    async fn get_contact(&self, number: &str) -> Result<Contact, ProviderError> {
        let mut state = self.state.write().await;
        state.record(BrevoCall::GetContact(number.to_string()))?;
        state
            .contacts
            .get(number)
            .map(|id| Contact { id: *id })
            .ok_or_else(|| ProviderError::NotFound(format!("contact {number}")))
    }

    async fn create_contact(&self, attributes: &ContactAttributes) -> Result<Contact, ProviderError> {
        let mut state = self.state.write().await;
        state.record(BrevoCall::CreateContact(attributes.clone()))?;
        let id = state.next_id();
        state.contacts.insert(attributes.sms.clone(), id);
        Ok(Contact { id })
    }

    async fn create_list(&self, list: &NewContactList) -> Result<ContactList, ProviderError> {
        let mut state = self.state.write().await;
        state.record(BrevoCall::CreateList(list.clone()))?;
        let id = state.next_id();
        if state.recording {
            state.lists.insert(id, Vec::new());
        }
        Ok(ContactList { id })
    }

    async fn add_contacts_to_list(
        &self,
        list_id: i64,
        contact_ids: &[i64],
    ) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        state.record(BrevoCall::AddContactsToList {
            list_id,
            contact_ids: contact_ids.to_vec(),
        })?;
        if !state.recording {
            return if list_id <= state.last_id {
                Ok(())
            } else {
                Err(ProviderError::NotFound(format!("list {list_id}")))
            };
        }
        let members = state
            .lists
            .get_mut(&list_id)
            .ok_or_else(|| ProviderError::NotFound(format!("list {list_id}")))?;
        members.extend_from_slice(contact_ids);
        Ok(())
    }
}

#[async_trait]
impl WhatsAppCampaignsApi for InMemoryBrevo {
    async fn create_template(&self, template: &WhatsAppTemplate) -> Result<i64, ProviderError> {
        let mut state = self.state.write().await;
        state.record(BrevoCall::CreateTemplate(template.clone()))?;
        let id = state.next_id();
        state.templates.push(id);
        Ok(id)
    }

    async fn request_template_approval(&self, template_id: i64) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        state.record(BrevoCall::RequestApproval(template_id))?;
        if !state.templates.contains(&template_id) {
            return Err(ProviderError::NotFound(format!("template {template_id}")));
        }
        Ok(())
    }

    async fn list_templates(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TemplateSummary>, ProviderError> {
        let mut state = self.state.write().await;
        state.record(BrevoCall::ListTemplates { start, end })?;
        let status = match state.status_script.pop_front() {
            Some(Some(status)) => status,
            Some(None) => return Ok(Vec::new()),
            None => TemplateStatus::Approved,
        };
        Ok(state
            .templates
            .iter()
            .map(|id| TemplateSummary {
                id: *id,
                status: status.clone(),
            })
            .collect())
    }

    async fn create_campaign(&self, campaign: &WhatsAppCampaign) -> Result<i64, ProviderError> {
        let mut state = self.state.write().await;
        state.record(BrevoCall::CreateCampaign(campaign.clone()))?;
        if !state.recording {
            state.templates.retain(|id| *id != campaign.template_id);
        }
        Ok(state.next_id())
    }
}
