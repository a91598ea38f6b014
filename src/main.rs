use std::sync::Arc;

use anyhow::Context;
use poem::{Server, listener::TcpListener};
use tokio::main;
use tracing::info;
use tracing_subscriber::EnvFilter;

use brevo_messaging::{
    config::Config,
    infrastructure::brevo::build_dispatcher,
    presentation::http::{build_app, endpoints::root::ApiState},
};

#[main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brevo_messaging=info,poem=info".into()),
        )
        .init();

    let config = Config::try_parse().context("invalid configuration")?;
    let dispatcher =
        build_dispatcher(&config.brevo).context("failed to set up the brevo dispatcher")?;

    let server_url = format!("{}://{}:{}", config.scheme, config.host, config.port);
    info!(%server_url, dry_run = config.brevo.dry_run, "starting server");

    let state = Arc::new(ApiState {
        dispatcher: Arc::new(dispatcher),
        service_api_key: config.service_api_key.clone(),
        dry_run: config.brevo.dry_run,
    });
    let app = build_app(state, &server_url);

    Server::new(TcpListener::bind(format!("{}:{}", config.host, config.port)))
        .run(app)
        .await
        .context("server stopped")
}
