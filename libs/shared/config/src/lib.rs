use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub postgrest_url: String,
    pub postgrest_anon_key: String,
    pub jwt_secret: String,
    pub redis_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            postgrest_url: env::var("POSTGREST_URL")
                .unwrap_or_else(|_| {
                    warn!("POSTGREST_URL not set, using empty value");
                    String::new()
                }),
            postgrest_anon_key: env::var("POSTGREST_ANON_KEY")
                .unwrap_or_else(|_| {
                    warn!("POSTGREST_ANON_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            redis_url: env::var("REDIS_URL").ok(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.postgrest_url.is_empty()
            && !self.postgrest_anon_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_rate_limiting_configured(&self) -> bool {
        self.redis_url.is_some()
    }
}
