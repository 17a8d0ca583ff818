use acieicard::{
    auth::TokenIssuer,
    server::{self, AppState},
    settings::Settings,
    telemetry, DatabaseClient,
};
use anyhow::Context;
use std::net::TcpListener;

async fn run() -> anyhow::Result<()> {
    let settings = Settings::read()?;

    let db = DatabaseClient::builder(
        settings.supabase_url.clone(),
        settings.supabase_service_key.clone(),
    )
    .with_max_retries(settings.database_max_retries)
    .build()?;

    let state = AppState {
        db,
        tokens: TokenIssuer::new(
            &settings.jwt_secret,
            chrono::Duration::hours(settings.token_ttl_hours),
        ),
        database: settings
            .supabase_url
            .host_str()
            .unwrap_or_default()
            .to_string(),
    };

    let address = settings.bind_address();
    let listener = TcpListener::bind(&address)
        .with_context(|| format!("Failed to bind {}:{}", address.0, address.1))?;

    tracing::info!(
        "Listening on http://{}:{} ({})",
        address.0,
        address.1,
        settings.node_env.as_deref().unwrap_or("development")
    );

    server::listen(listener, state, settings.allowed_origins())?.await?;
    Ok(())
}

#[actix_web::main]
async fn main() {
    telemetry::init();

    if let Err(e) = run().await {
        tracing::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}
