use std::sync::Arc;

use poem::Result as PoemResult;
use poem_openapi::{OpenApi, param::Header, payload::Json};

use crate::presentation::http::{
    endpoints::root::{ApiState, EndpointsTags},
    mappers::{map_report, map_send_error},
    requests::SendMessageRequestDto,
    responses::SendMessageResponseDto,
    security::authorize,
};

#[derive(Clone)]
pub struct MessagesEndpoints {
    state: Arc<ApiState>,
}

impl MessagesEndpoints {
    pub fn new(state: Arc<ApiState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl MessagesEndpoints {
    /// Sends an SMS to every recipient, or schedules a WhatsApp campaign.
    /// WhatsApp requests return once the template is approved and the
    /// campaign is scheduled.
    #[oai(
        path = "/messages",
        method = "post",
        tag = EndpointsTags::Messages,
    )]
    pub async fn send_message(
        &self,
        #[oai(name = "X-API-Key")] api_key: Header<Option<String>>,
        request: Json<SendMessageRequestDto>,
    ) -> PoemResult<Json<SendMessageResponseDto>> {
        authorize(
            self.state.service_api_key.as_deref(),
            api_key.0.as_deref(),
        )?;

        let message = request.to_message().map_err(map_send_error)?;
        let report = self
            .state
            .dispatcher
            .send(&message)
            .await
            .map_err(map_send_error)?;

        Ok(Json(map_report(report)))
    }
}
