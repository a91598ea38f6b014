use std::sync::Arc;

use poem::Route;
use poem_openapi::OpenApiService;

use crate::presentation::http::endpoints::{
    messages::MessagesEndpoints,
    root::{ApiState, Endpoints},
};

pub mod endpoints;
pub mod mappers;
pub mod requests;
pub mod responses;
pub mod security;

/// API under `/api`, Swagger UI at `/`.
pub fn build_app(state: Arc<ApiState>, server_url: &str) -> Route {
    let endpoints = Endpoints {
        dry_run: state.dry_run,
    };
    let api_service = OpenApiService::new(
        (endpoints, MessagesEndpoints::new(state)),
        "Brevo Messaging API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    Route::new().nest("/api", api_service).nest("/", ui)
}
