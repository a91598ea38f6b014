use poem_openapi::{Object, OpenApi, payload::Json};

use crate::presentation::http::endpoints::root::{Endpoints, EndpointsTags};

#[derive(Object)]
pub struct HealthDto {
    pub status: String,
    /// `brevo`, or `in-memory` when running as a dry run.
    pub provider: String,
}

#[OpenApi]
impl Endpoints {
    #[oai(path = "/health", method = "get", tag = EndpointsTags::Health)]
    pub async fn health(&self) -> Json<HealthDto> {
        let provider = if self.dry_run { "in-memory" } else { "brevo" };
        Json(HealthDto {
            status: "ok".to_string(),
            provider: provider.to_string(),
        })
    }
}
