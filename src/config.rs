use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub app_env: String,
    pub cron_secret: String,

    pub finnhub_api_key: String,

    pub resend_api_key: String,
    pub alert_email_from: String,

    pub push_gateway_url: String,
    pub push_gateway_key: String,

    pub symbol_pause_ms: u64,
    pub check_interval_secs: u64,
}

impl Settings {
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "deepterminal".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());
    let cron_secret = env::var("CRON_SECRET").unwrap_or_default();

    let finnhub_api_key = env::var("FINNHUB_API_KEY").unwrap_or_default();

    let resend_api_key = env::var("RESEND_API_KEY").unwrap_or_default();
    let alert_email_from = env::var("ALERT_EMAIL_FROM")
        .unwrap_or_else(|_| "alerts@deepterminal.app".to_string());

    let push_gateway_url = env::var("PUSH_GATEWAY_URL").unwrap_or_default();
    let push_gateway_key = env::var("PUSH_GATEWAY_KEY").unwrap_or_default();

    let symbol_pause_ms = env::var("SYMBOL_PAUSE_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(250);

    // 0 disables the in-process scheduler (an external cron hits /check-alerts).
    let check_interval_secs = env::var("CHECK_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        app_env,
        cron_secret,
        finnhub_api_key,
        resend_api_key,
        alert_email_from,
        push_gateway_url,
        push_gateway_key,
        symbol_pause_ms,
        check_interval_secs,
    }
}
