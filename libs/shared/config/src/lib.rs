use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_ALERT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STAFF_USER_ID: &str = "1";
const DEFAULT_STAFF_USER_NAME: &str = "Equipe";
const DEFAULT_CHAT_USER_ID: &str = "funcionario_001";
const DEFAULT_DRAFT_DIR: &str = ".carelink";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL for the clinic API (alerts, patient history, upload, chat).
    pub api_base_url: String,
    /// Base URL for the scheduling service serving `/agendamentos`.
    pub agenda_api_url: String,
    pub alert_poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub staff_user_id: String,
    pub staff_user_name: String,
    pub chat_user_id: String,
    pub draft_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_base_url = env::var("API_BASE_URL")
            .unwrap_or_else(|_| {
                warn!("API_BASE_URL not set, using default");
                DEFAULT_API_BASE_URL.to_string()
            });

        let config = Self {
            agenda_api_url: env::var("API_JAVA_URL")
                .unwrap_or_else(|_| {
                    warn!("API_JAVA_URL not set, using API_BASE_URL");
                    api_base_url.clone()
                }),
            api_base_url,
            alert_poll_interval_secs: parse_secs("ALERT_POLL_INTERVAL_SECS", DEFAULT_ALERT_POLL_INTERVAL_SECS),
            request_timeout_secs: parse_secs("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            staff_user_id: env_or("STAFF_USER_ID", DEFAULT_STAFF_USER_ID),
            staff_user_name: env_or("STAFF_USER_NAME", DEFAULT_STAFF_USER_NAME),
            chat_user_id: env_or("CHAT_USER_ID", DEFAULT_CHAT_USER_ID),
            draft_dir: PathBuf::from(env_or("CARELINK_DRAFT_DIR", DEFAULT_DRAFT_DIR)),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - API URLs are empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty() && !self.agenda_api_url.is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn alert_poll_interval(&self) -> Duration {
        Duration::from_secs(self.alert_poll_interval_secs.max(1))
    }
}

fn parse_secs(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using {}", key, default);
            default
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using {:?}", key, default);
        default.to_string()
    })
}
