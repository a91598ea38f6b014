use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    application::services::brevo::{ContactsApi, TransactionalSmsApi, WhatsAppCampaignsApi},
    domain::{
        errors::ProviderError,
        models::{
            Contact, ContactAttributes, ContactList, NewContactList, TemplateStatus,
            TemplateSummary, TransactionalSms, WhatsAppCampaign, WhatsAppTemplate,
            format_provider_time,
        },
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.brevo.com/v3";

/// Brevo REST client authenticating every request with one API key.
///
/// Transactional SMS and the contacts/campaign endpoints use different keys,
/// so a service normally holds two instances.
#[derive(Clone)]
pub struct BrevoClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl BrevoClient {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .user_agent("brevo-messaging")
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ProviderError::Transport(format!("invalid base url {base_url}: {e}")))?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Transport(format!("base url {} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ProviderError> {
        let url = self.url(segments)?;
        debug!(%method, %url, "brevo request");
        Ok(self
            .http
            .request(method, url)
            .header("api-key", &self.api_key)
            .header("accept", "application/json"))
    }

    async fn send(request: RequestBuilder) -> Result<Response, ProviderError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: Option<BrevoErrorBody> = response.json().await.ok();
        let message = body
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(message));
        }
        Err(ProviderError::Api {
            status: status.as_u16(),
            code: body.and_then(|b| b.code),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ProviderError> {
        let response = Self::send(request).await?;
        Ok(response.json::<T>().await?)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl TransactionalSmsApi for BrevoClient {
    async fn send_transactional_sms(&self, sms: &TransactionalSms) -> Result<(), ProviderError> {
        let body = SendTransacSmsBody {
            sender: sms.sender.as_deref(),
            recipient: &sms.recipient,
            content: &sms.content,
            kind: sms.kind.as_str(),
        };
        let request = self
            .request(Method::POST, &["transactionalSMS", "sms"])?
            .json(&body);
        Self::send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactsApi for BrevoClient {
    async fn get_contact(&self, number: &str) -> Result<Contact, ProviderError> {
        let request = self
            .request(Method::GET, &["contacts", number])?
            .query(&[("identifierType", "phone_id")]);
        let created: IdResponse = Self::send_json(request).await?;
        Ok(Contact { id: created.id })
    }

    async fn create_contact(&self, attributes: &ContactAttributes) -> Result<Contact, ProviderError> {
        let body = CreateContactBody {
            attributes: ContactAttributesBody {
                sms: &attributes.sms,
                whatsapp: &attributes.whatsapp,
            },
        };
        let request = self.request(Method::POST, &["contacts"])?.json(&body);
        let created: IdResponse = Self::send_json(request).await?;
        Ok(Contact { id: created.id })
    }

    async fn create_list(&self, list: &NewContactList) -> Result<ContactList, ProviderError> {
        let body = CreateListBody {
            name: &list.name,
            folder_id: list.folder_id,
        };
        let request = self
            .request(Method::POST, &["contacts", "lists"])?
            .json(&body);
        let created: IdResponse = Self::send_json(request).await?;
        Ok(ContactList { id: created.id })
    }

    async fn add_contacts_to_list(
        &self,
        list_id: i64,
        contact_ids: &[i64],
    ) -> Result<(), ProviderError> {
        let list_id = list_id.to_string();
        let request = self
            .request(Method::POST, &["contacts", "lists", &list_id, "contacts", "add"])?
            .json(&AddContactsBody { ids: contact_ids });
        Self::send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl WhatsAppCampaignsApi for BrevoClient {
    async fn create_template(&self, template: &WhatsAppTemplate) -> Result<i64, ProviderError> {
        let body = CreateTemplateBody {
            name: &template.name,
            language: &template.language,
            category: template.category.as_str(),
            body_text: &template.body_text,
        };
        let request = self
            .request(Method::POST, &["whatsappCampaigns", "template"])?
            .json(&body);
        let created: IdResponse = Self::send_json(request).await?;
        Ok(created.id)
    }

    async fn request_template_approval(&self, template_id: i64) -> Result<(), ProviderError> {
        let template_id = template_id.to_string();
        let request = self.request(
            Method::POST,
            &["whatsappCampaigns", "template", "approval", &template_id],
        )?;
        Self::send(request).await?;
        Ok(())
    }

    async fn list_templates(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TemplateSummary>, ProviderError> {
        let request = self
            .request(Method::GET, &["whatsappCampaigns", "template-list"])?
            .query(&[
                ("startDate", format_provider_time(&start)),
                ("endDate", format_provider_time(&end)),
            ]);
        let payload: TemplateListResponse = Self::send_json(request).await?;

        Ok(payload
            .templates
            .into_iter()
            .map(|t| TemplateSummary {
                id: t.id,
                status: TemplateStatus::from_provider(&t.status),
            })
            .collect())
    }

    async fn create_campaign(&self, campaign: &WhatsAppCampaign) -> Result<i64, ProviderError> {
        let body = CreateCampaignBody {
            name: &campaign.name,
            template_id: campaign.template_id,
            scheduled_at: format_provider_time(&campaign.scheduled_at),
            recipients: CampaignRecipientsBody {
                list_ids: &campaign.recipients.list_ids,
            },
        };
        let request = self
            .request(Method::POST, &["whatsappCampaigns"])?
            .json(&body);
        let created: IdResponse = Self::send_json(request).await?;
        Ok(created.id)
    }
}

#[derive(Debug, Serialize)]
struct SendTransacSmsBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sender: Option<&'a str>,
    recipient: &'a str,
    content: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateContactBody<'a> {
    attributes: ContactAttributesBody<'a>,
}

#[derive(Debug, Serialize)]
struct ContactAttributesBody<'a> {
    #[serde(rename = "SMS")]
    sms: &'a str,
    #[serde(rename = "WHATSAPP")]
    whatsapp: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateListBody<'a> {
    name: &'a str,
    folder_id: i64,
}

#[derive(Debug, Serialize)]
struct AddContactsBody<'a> {
    ids: &'a [i64],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTemplateBody<'a> {
    name: &'a str,
    language: &'a str,
    category: &'a str,
    body_text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCampaignBody<'a> {
    name: &'a str,
    template_id: i64,
    scheduled_at: String,
    recipients: CampaignRecipientsBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CampaignRecipientsBody<'a> {
    list_ids: &'a [i64],
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TemplateListResponse {
    #[serde(default)]
    templates: Vec<TemplateEntry>,
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    id: i64,
    status: String,
}

#[derive(Debug, Deserialize)]
struct BrevoErrorBody {
    code: Option<String>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::models::{CampaignRecipients, SmsKind};

    async fn client(server: &MockServer) -> BrevoClient {
        BrevoClient::new(&server.uri(), "test-key").unwrap()
    }

    #[tokio::test]
    async fn sends_transactional_sms_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transactionalSMS/sms"))
            .and(header("api-key", "test-key"))
            .and(body_json(json!({
                "sender": "Nocego",
                "recipient": "+41790000000",
                "content": "Hello",
                "type": "transactional"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "reference": "ab1cde2fgh3i4jklmno",
                "messageId": 1511882900176220u64
            })))
            .expect(1)
            .mount(&server)
            .await;

        let sms = TransactionalSms {
            sender: Some("Nocego".into()),
            recipient: "+41790000000".into(),
            content: "Hello".into(),
            kind: SmsKind::Transactional,
        };
        client(&server).await.send_transactional_sms(&sms).await.unwrap();
    }

    #[tokio::test]
    async fn missing_contact_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/contacts/+41790000000"))
            .and(query_param("identifierType", "phone_id"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "code": "document_not_found",
                "message": "Contact does not exist"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .get_contact("+41790000000")
            .await
            .unwrap_err();
        assert_eq!(err, ProviderError::NotFound("Contact does not exist".into()));
    }

    #[tokio::test]
    async fn creates_contact_with_both_channel_attributes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts"))
            .and(body_json(json!({
                "attributes": { "SMS": "+41790000000", "WHATSAPP": "+41790000000" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 21 })))
            .mount(&server)
            .await;

        let contact = client(&server)
            .await
            .create_contact(&ContactAttributes::for_number("+41790000000"))
            .await
            .unwrap();
        assert_eq!(contact.id, 21);
    }

    #[tokio::test]
    async fn creates_list_and_adds_contacts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts/lists"))
            .and(body_json(json!({ "name": "+4179_+4178", "folderId": 1 })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 7 })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/contacts/lists/7/contacts/add"))
            .and(body_json(json!({ "ids": [21, 22] })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "contacts": { "success": [21, 22], "failure": [] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        let list = client
            .create_list(&NewContactList {
                name: "+4179_+4178".into(),
                folder_id: 1,
            })
            .await
            .unwrap();
        client.add_contacts_to_list(list.id, &[21, 22]).await.unwrap();
        assert_eq!(list.id, 7);
    }

    #[tokio::test]
    async fn template_creation_and_approval() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/whatsappCampaigns/template"))
            .and(body_json(json!({
                "name": "template1",
                "language": "de",
                "category": "MARKETING",
                "bodyText": "Hello"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 3 })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/whatsappCampaigns/template/approval/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server).await;
        let id = client
            .create_template(&WhatsAppTemplate::marketing("template1", "de", "Hello"))
            .await
            .unwrap();
        client.request_template_approval(id).await.unwrap();
        assert_eq!(id, 3);
    }

    #[tokio::test]
    async fn lists_templates_in_window() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/whatsappCampaigns/template-list"))
            .and(query_param("startDate", "2024-05-01T11:55:00Z"))
            .and(query_param("endDate", "2024-05-01T12:00:00Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "templates": [
                    { "id": 3, "name": "template1", "status": "approved", "category": "MARKETING" },
                    { "id": 4, "name": "template2", "status": "pending", "category": "MARKETING" },
                    { "id": 5, "name": "template3", "status": "rejected", "category": "MARKETING" }
                ],
                "count": 3
            })))
            .mount(&server)
            .await;

        let end = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 11, 55, 0).unwrap();
        let templates = client(&server)
            .await
            .list_templates(start, end)
            .await
            .unwrap();

        let statuses: Vec<_> = templates.into_iter().map(|t| (t.id, t.status)).collect();
        assert_eq!(
            statuses,
            vec![
                (3, TemplateStatus::Approved),
                (4, TemplateStatus::Pending),
                (5, TemplateStatus::Rejected("rejected".into())),
            ]
        );
    }

    #[tokio::test]
    async fn creates_scheduled_campaign() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/whatsappCampaigns"))
            .and(body_json(json!({
                "name": "campaign1",
                "templateId": 3,
                "scheduledAt": "2024-05-01T12:01:00Z",
                "recipients": { "listIds": [7] }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 11 })))
            .mount(&server)
            .await;

        let campaign = WhatsAppCampaign {
            name: "campaign1".into(),
            template_id: 3,
            recipients: CampaignRecipients { list_ids: vec![7] },
            scheduled_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 1, 0).unwrap(),
        };
        let id = client(&server).await.create_campaign(&campaign).await.unwrap();
        assert_eq!(id, 11);
    }

    #[tokio::test]
    async fn api_errors_keep_status_and_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/whatsappCampaigns"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "invalid_parameter",
                "message": "scheduledAt is in the past"
            })))
            .mount(&server)
            .await;

        let campaign = WhatsAppCampaign {
            name: "campaign1".into(),
            template_id: 3,
            recipients: CampaignRecipients { list_ids: vec![7] },
            scheduled_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        };
        let err = client(&server)
            .await
            .create_campaign(&campaign)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::Api {
                status: 400,
                code: Some("invalid_parameter".into()),
                message: "scheduledAt is in the past".into(),
            }
        );
    }
}
