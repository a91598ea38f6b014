use std::sync::Arc;

use brevo_messaging::{
    MessageDispatcher, ProviderError,
    application::{
        services::approval::ApprovalPolicy,
        usecases::send_whatsapp_campaign::WhatsAppCampaignConfig,
    },
    config::{BrevoConfig, BrevoCredentials},
    domain::models::TemplateStatus,
    infrastructure::brevo::{
        DEFAULT_BASE_URL, InMemoryBrevo, build_dispatcher, in_memory::BrevoOperation,
    },
    presentation::http::{build_app, endpoints::root::ApiState},
};
use poem::{Route, http::StatusCode, test::TestClient};
use serde_json::json;

fn app(service_api_key: Option<&str>) -> TestClient<Route> {
    let config = BrevoConfig {
        credentials: BrevoCredentials {
            api_key: String::new(),
            transactional_key: String::new(),
        },
        base_url: DEFAULT_BASE_URL.to_string(),
        dry_run: true,
        campaign: WhatsAppCampaignConfig::default(),
    };
    let state = Arc::new(ApiState {
        dispatcher: Arc::new(build_dispatcher(&config).unwrap()),
        service_api_key: service_api_key.map(str::to_string),
        dry_run: true,
    });
    TestClient::new(build_app(state, "http://localhost:3000"))
}

fn app_against(brevo: &Arc<InMemoryBrevo>, campaign: WhatsAppCampaignConfig) -> TestClient<Route> {
    let dispatcher = MessageDispatcher::new(brevo.clone(), brevo.clone(), brevo.clone(), campaign);
    let state = Arc::new(ApiState {
        dispatcher: Arc::new(dispatcher),
        service_api_key: None,
        dry_run: true,
    });
    TestClient::new(build_app(state, "http://localhost:3000"))
}

fn whatsapp_payload() -> serde_json::Value {
    json!({
        "type": "whatsapp",
        "recipients": ["+41790000000"],
        "body": "Hello"
    })
}

#[tokio::test]
async fn health_reports_provider_mode() {
    let response = app(None).get("/api/health").send().await;
    response.assert_status_is_ok();
    response
        .assert_json(json!({ "status": "ok", "provider": "in-memory" }))
        .await;
}

#[tokio::test]
async fn sends_sms_through_the_api() {
    let response = app(None)
        .post("/api/messages")
        .body_json(&json!({
            "type": "sms",
            "recipients": ["+41790000001", "+41790000002"],
            "body": "Hello",
            "sender": "Nocego"
        }))
        .send()
        .await;

    response.assert_status_is_ok();
    let body = response.json().await;
    let object = body.value().object();
    object.get("type").assert_string("sms");
    let delivered = object.get("delivered").array();
    delivered.assert_len(2);
    delivered.get(0).assert_string("+41790000001");
    delivered.get(1).assert_string("+41790000002");
}

#[tokio::test]
async fn schedules_whatsapp_campaign() {
    let response = app(None)
        .post("/api/messages")
        .body_json(&json!({
            "type": "whatsapp",
            "recipients": ["+41790000000"],
            "body": "Hello",
            "region": "de"
        }))
        .send()
        .await;

    response.assert_status_is_ok();
    let body = response.json().await;
    let campaign = body.value().object().get("campaign").object();
    campaign.get("campaign_id").assert_i64(4);
    campaign.get("list_id").assert_i64(2);
    campaign.get("template_id").assert_i64(3);
}

#[tokio::test]
async fn empty_body_is_rejected_by_validation() {
    let response = app(None)
        .post("/api/messages")
        .body_json(&json!({
            "type": "sms",
            "recipients": ["+41790000001"],
            "body": ""
        }))
        .send()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn long_sender_is_rejected() {
    let response = app(None)
        .post("/api/messages")
        .body_json(&json!({
            "type": "sms",
            "recipients": ["+41790000001"],
            "body": "Hello",
            "sender": "ThisSenderIsTooLong"
        }))
        .send()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_key_is_enforced_when_configured() {
    let client = app(Some("secret"));
    let payload = json!({
        "type": "sms",
        "recipients": ["+41790000001"],
        "body": "Hello"
    });

    client
        .post("/api/messages")
        .body_json(&payload)
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    client
        .post("/api/messages")
        .header("X-API-Key", "secret")
        .body_json(&payload)
        .send()
        .await
        .assert_status_is_ok();
}

#[tokio::test]
async fn unknown_type_is_a_bad_request() {
    let response = app(None)
        .post("/api/messages")
        .body_json(&json!({
            "type": "fax",
            "recipients": ["+41790000001"],
            "body": "Hello"
        }))
        .send()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_text("Unsupported message type: fax").await;
}

#[tokio::test]
async fn sms_provider_failure_is_bad_gateway() {
    let brevo = Arc::new(InMemoryBrevo::new());
    brevo
        .fail_on(
            BrevoOperation::SendSms,
            1,
            ProviderError::Api {
                status: 402,
                code: Some("not_enough_credits".into()),
                message: "Not enough credits".into(),
            },
        )
        .await;

    app_against(&brevo, WhatsAppCampaignConfig::default())
        .post("/api/messages")
        .body_json(&json!({
            "type": "sms",
            "recipients": ["+41790000001"],
            "body": "Hello"
        }))
        .send()
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn failed_whatsapp_step_is_bad_gateway() {
    let brevo = Arc::new(InMemoryBrevo::new());
    brevo
        .fail_on(
            BrevoOperation::CreateList,
            1,
            ProviderError::Transport("connection reset".into()),
        )
        .await;

    app_against(&brevo, WhatsAppCampaignConfig::default())
        .post("/api/messages")
        .body_json(&whatsapp_payload())
        .send()
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn rejected_template_is_bad_gateway() {
    let brevo = Arc::new(InMemoryBrevo::new());
    brevo
        .script_template_statuses(vec![Some(TemplateStatus::Rejected("rejected".into()))])
        .await;

    app_against(&brevo, WhatsAppCampaignConfig::default())
        .post("/api/messages")
        .body_json(&whatsapp_payload())
        .send()
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
    assert!(brevo.calls_of(BrevoOperation::CreateCampaign).await.is_empty());
}

#[tokio::test]
async fn approval_that_never_arrives_is_gateway_timeout() {
    let brevo = Arc::new(InMemoryBrevo::new());
    brevo
        .script_template_statuses(vec![Some(TemplateStatus::Pending)])
        .await;
    let campaign = WhatsAppCampaignConfig {
        approval: ApprovalPolicy {
            max_attempts: Some(1),
            ..ApprovalPolicy::default()
        },
        ..WhatsAppCampaignConfig::default()
    };

    app_against(&brevo, campaign)
        .post("/api/messages")
        .body_json(&whatsapp_payload())
        .send()
        .await
        .assert_status(StatusCode::GATEWAY_TIMEOUT);
}
