use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read once at startup. A `.env` file is honored
/// in development; unset channel settings disable that channel rather
/// than failing startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub telegram_bot_token: String,
    pub telegram_ops_chat: String,
    pub whatsapp_gateway_url: String,
    pub whatsapp_api_key: Option<String>,
    pub whatsapp_ops_number: String,
    pub email_recipient: String,
    /// Upper bound on one notification channel send.
    pub channel_send_timeout: Duration,
    pub prep_minutes: i64,
    pub delivery_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(AppConfig {
            bind_addr: var_or("SERVER_ADDR", "127.0.0.1:8080"),
            telegram_bot_token: var_or("TELEGRAM_BOT_TOKEN", ""),
            telegram_ops_chat: var_or("TELEGRAM_OPS_CHAT_ID", ""),
            whatsapp_gateway_url: var_or("WHATSAPP_GATEWAY_URL", ""),
            whatsapp_api_key: env::var("WHATSAPP_API_KEY").ok().filter(|v| !v.is_empty()),
            whatsapp_ops_number: var_or("WHATSAPP_OPS_NUMBER", ""),
            email_recipient: var_or("NOTIFY_EMAIL_TO", ""),
            channel_send_timeout: Duration::from_secs(parse_var("CHANNEL_SEND_TIMEOUT_SECS", 8)?),
            prep_minutes: parse_var("ESTIMATED_PREP_MINUTES", 25)?,
            delivery_minutes: parse_var("ESTIMATED_DELIVERY_MINUTES", 45)?,
        })
    }

    pub fn telegram_enabled(&self) -> bool {
        !self.telegram_bot_token.is_empty() && !self.telegram_ops_chat.is_empty()
    }

    pub fn whatsapp_enabled(&self) -> bool {
        !self.whatsapp_gateway_url.is_empty()
    }
}

fn var_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            value,
        }),
        _ => Ok(default),
    }
}
