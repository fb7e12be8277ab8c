use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use chrono::FixedOffset;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub registration: RegistrationMode,
    pub max_body_size: usize,
    pub log_level: String,
    /// Domain used to derive login e-mails from a cedula.
    pub email_domain: String,
    /// Business timezone, used whenever an instant must become a calendar date.
    pub utc_offset: FixedOffset,
    pub upload_dir: PathBuf,
    pub import_row_delay: Duration,
    pub smtp: Option<SmtpConfig>,
    pub gemini: Option<GeminiConfig>,
}

/// Whether anyone may self-register. The very first account is always
/// allowed so a fresh install can be bootstrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationMode {
    Open,
    Closed,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let token_ttl_minutes: i64 = env_or("PORTAL_TOKEN_TTL_MINUTES", "480")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_TOKEN_TTL_MINUTES: {e}"))?;

        let host: IpAddr = env_or("PORTAL_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_HOST: {e}"))?;

        let port: u16 = env_or("PORTAL_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_PORT: {e}"))?;

        let base_url = env_or("PORTAL_BASE_URL", &format!("http://{host}:{port}"));

        let registration = match env_or("PORTAL_REGISTRATION", "closed").as_str() {
            "open" => RegistrationMode::Open,
            _ => RegistrationMode::Closed,
        };

        let max_body_size: usize = env_or("PORTAL_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("PORTAL_LOG_LEVEL", "info");

        let email_domain = env_or("PORTAL_EMAIL_DOMAIN", "talento.local")
            .trim_start_matches('@')
            .to_lowercase();

        let offset_hours: i32 = env_or("PORTAL_UTC_OFFSET_HOURS", "-5")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_UTC_OFFSET_HOURS: {e}"))?;
        let utc_offset = utc_offset_from_hours(offset_hours)?;

        let upload_dir = PathBuf::from(env_or("PORTAL_UPLOAD_DIR", "uploads"));

        let import_row_delay_ms: u64 = env_or("PORTAL_IMPORT_ROW_DELAY_MS", "200")
            .parse()
            .map_err(|e| format!("Invalid PORTAL_IMPORT_ROW_DELAY_MS: {e}"))?;

        let smtp = match (
            std::env::var("PORTAL_SMTP_HOST").ok(),
            std::env::var("PORTAL_SMTP_PORT").ok(),
            std::env::var("PORTAL_SMTP_USER").ok(),
            std::env::var("PORTAL_SMTP_PASS").ok(),
            std::env::var("PORTAL_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid PORTAL_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        let gemini = std::env::var("PORTAL_GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| GeminiConfig {
                api_key,
                model: env_or("PORTAL_GEMINI_MODEL", "gemini-1.5-flash"),
                base_url: env_or(
                    "PORTAL_GEMINI_BASE_URL",
                    "https://generativelanguage.googleapis.com",
                ),
            });

        Ok(Config {
            database_url,
            jwt_secret,
            token_ttl_minutes,
            host,
            port,
            base_url,
            registration,
            max_body_size,
            log_level,
            email_domain,
            utc_offset,
            upload_dir,
            import_row_delay: Duration::from_millis(import_row_delay_ms),
            smtp,
            gemini,
        })
    }

    /// Login e-mail derived from a cedula.
    pub fn email_for(&self, cedula: &str) -> String {
        format!("{cedula}@{}", self.email_domain)
    }
}

pub fn utc_offset_from_hours(hours: i32) -> Result<FixedOffset, String> {
    if !(-12..=14).contains(&hours) {
        return Err(format!("UTC offset out of range: {hours}"));
    }
    FixedOffset::east_opt(hours * 3600).ok_or_else(|| format!("UTC offset out of range: {hours}"))
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
