use poem::http::StatusCode;

use crate::{
    application::handlers::message_dispatcher::DispatchReport,
    domain::{
        errors::{SendError, WorkflowError},
        models::format_provider_time,
    },
    presentation::{
        http::responses::{CampaignDto, SendMessageResponseDto},
        models::MessageTypeKind,
    },
};

pub fn map_report(report: DispatchReport) -> SendMessageResponseDto {
    match report {
        DispatchReport::Sms { delivered } => SendMessageResponseDto {
            message_type: MessageTypeKind::Sms,
            delivered,
            campaign: None,
        },
        DispatchReport::WhatsApp(receipt) => SendMessageResponseDto {
            message_type: MessageTypeKind::WhatsApp,
            delivered: Vec::new(),
            campaign: Some(CampaignDto {
                campaign_id: receipt.campaign_id,
                template_id: receipt.template_id,
                list_id: receipt.list_id,
                contact_ids: receipt.contact_ids,
                scheduled_at: format_provider_time(&receipt.scheduled_at),
            }),
        },
    }
}

pub fn map_send_error(err: SendError) -> poem::Error {
    let status = match &err {
        SendError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SendError::UnsupportedType(_) => StatusCode::BAD_REQUEST,
        SendError::WhatsApp {
            source: WorkflowError::Validation(_),
            ..
        } => StatusCode::BAD_REQUEST,
        SendError::WhatsApp {
            source: WorkflowError::Cancelled { .. } | WorkflowError::ApprovalTimedOut { .. },
            ..
        } => StatusCode::GATEWAY_TIMEOUT,
        SendError::Sms { .. } | SendError::WhatsApp { .. } => StatusCode::BAD_GATEWAY,
    };
    poem::Error::from_string(err.to_string(), status)
}
