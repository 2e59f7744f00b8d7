use std::net::SocketAddr;

use mongodb::Client;

use deepterminal_alerts::{config, routes, services, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = services::db_init::ensure_indexes(&db).await {
        tracing::warn!(error = %e, "could not ensure indexes");
    }

    let quotes = services::quotes::QuoteClient::new(settings.finnhub_api_key.clone());
    let mailer = services::notifier::Mailer::new(
        settings.resend_api_key.clone(),
        settings.alert_email_from.clone(),
    );
    let push = services::notifier::PushClient::new(
        settings.push_gateway_url.clone(),
        settings.push_gateway_key.clone(),
    );

    let state = AppState {
        db,
        settings: settings.clone(),
        quotes,
        mailer,
        push,
    };

    services::check_alerts::spawn_alert_scheduler(state.clone());

    let app = routes::app(state);

    let addr = SocketAddr::from((settings.host.parse::<std::net::IpAddr>().unwrap(), settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
