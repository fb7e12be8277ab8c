use std::sync::Arc;

use sqlx::PgPool;

use crate::assistant::GeminiClient;
use crate::config::Config;
use crate::email::SystemMailer;
use crate::rate_limit::LoginRateLimiter;
use crate::storage::Storage;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub mailer: Option<Arc<SystemMailer>>,
    pub assistant: Option<GeminiClient>,
    pub storage: Storage,
    pub login_limiter: LoginRateLimiter,
}
