//! Environment-variable driven configuration (§6), parsed once at
//! startup. `.env` is loaded first via `dotenvy` (as `docsign-api`
//! does), then overridden by whatever is actually set in the process
//! environment.

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    pub cache_enabled: bool,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_db: u8,
    pub redis_password: Option<String>,
    pub redis_ssl: bool,

    pub pdf_cache_ttl: u64,
    pub typst_cache_ttl: u64,

    pub max_workers: usize,
    pub job_workers: usize,
    pub job_queue_capacity: usize,

    pub max_pdf_size_bytes: u64,

    pub rate_limit_per_minute: u32,
    pub rate_limit_burst: u32,

    pub request_timeout_seconds: u64,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),

            cache_enabled: env_or("CACHE_ENABLED", true),
            redis_host: std::env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string()),
            redis_port: env_or("REDIS_PORT", 6379),
            redis_db: env_or("REDIS_DB", 0),
            redis_password: std::env::var("REDIS_PASSWORD").ok(),
            redis_ssl: env_or("REDIS_SSL", false),

            pdf_cache_ttl: env_or("PDF_CACHE_TTL", 86_400),
            typst_cache_ttl: env_or("TYPST_CACHE_TTL", 43_200),

            max_workers: env_or("MAX_WORKERS", 4),
            job_workers: env_or("JOB_WORKERS", docgen_jobs::DEFAULT_WORKERS),
            job_queue_capacity: env_or("JOB_QUEUE_CAPACITY", docgen_jobs::DEFAULT_QUEUE_CAPACITY),

            max_pdf_size_bytes: env_or("MAX_PDF_SIZE_BYTES", 26_214_400),

            rate_limit_per_minute: env_or("RATE_LIMIT_PER_MINUTE", 60),
            rate_limit_burst: env_or("RATE_LIMIT_BURST", 20),

            request_timeout_seconds: env_or("REQUEST_TIMEOUT_SECONDS", 120),
        }
    }

    /// Redis connection URL built from the discrete `REDIS_*` vars, or
    /// `None` if caching is disabled outright.
    pub fn redis_url(&self) -> Option<String> {
        if !self.cache_enabled {
            return None;
        }
        let scheme = if self.redis_ssl { "rediss" } else { "redis" };
        let auth = self
            .redis_password
            .as_ref()
            .map(|p| format!(":{p}@"))
            .unwrap_or_default();
        Some(format!(
            "{scheme}://{auth}{}:{}/{}",
            self.redis_host, self.redis_port, self.redis_db
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redis_url_is_none_when_cache_disabled() {
        let mut config = Config::from_env();
        config.cache_enabled = false;
        assert!(config.redis_url().is_none());
    }

    #[test]
    fn redis_url_includes_password_when_set() {
        let mut config = Config::from_env();
        config.cache_enabled = true;
        config.redis_password = Some("hunter2".to_string());
        let url = config.redis_url().unwrap();
        assert!(url.contains(":hunter2@"));
    }
}
