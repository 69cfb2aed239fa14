use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;

        // JWT_SECRET and LEAD_PROOF_SECRET are read where they are used;
        // their absence should surface at boot, not on the first request.
        for key in ["JWT_SECRET", "LEAD_PROOF_SECRET"] {
            if env::var(key).is_err() {
                anyhow::bail!("{key} must be set");
            }
        }

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            port,
            database_url,
            host,
        })
    }
}
