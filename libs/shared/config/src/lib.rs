use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;
/// Longest accepted token lifetime (ten years).
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub token_secret: String,
    pub token_ttl_days: i64,
    pub store_timeout_secs: u64,
    pub store_backend: StoreBackend,
    /// JSON fixture loaded into the in-memory stores at startup.
    pub memory_seed_path: Option<String>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            token_secret: env::var("TOKEN_SECRET")
                .unwrap_or_else(|_| {
                    warn!("TOKEN_SECRET not set, every token will be rejected");
                    String::new()
                }),
            token_ttl_days: checked_ttl_days(parse_or("TOKEN_TTL_DAYS", DEFAULT_TOKEN_TTL_DAYS)),
            store_timeout_secs: parse_or("STORE_TIMEOUT_SECS", 10),
            store_backend: match env::var("STORE_BACKEND").as_deref() {
                Ok("memory") => StoreBackend::Memory,
                Ok("supabase") | Err(_) => StoreBackend::Supabase,
                Ok(other) => {
                    warn!("Unknown STORE_BACKEND '{}', falling back to supabase", other);
                    StoreBackend::Supabase
                }
            },
            memory_seed_path: env::var("MEMORY_SEED_PATH").ok().filter(|p| !p.is_empty()),
            port: parse_or("PORT", 3000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        let store_ready = match self.store_backend {
            StoreBackend::Memory => true,
            StoreBackend::Supabase => {
                !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
            }
        };

        store_ready && !self.token_secret.is_empty()
    }

    /// Capped at `MAX_TOKEN_TTL_DAYS`. A non-positive value is passed through
    /// and refused when a token is issued.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.token_ttl_days.min(MAX_TOKEN_TTL_DAYS))
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

fn checked_ttl_days(days: i64) -> i64 {
    if (1..=MAX_TOKEN_TTL_DAYS).contains(&days) {
        days
    } else {
        warn!(
            "TOKEN_TTL_DAYS must be between 1 and {}, got {}; using {}",
            MAX_TOKEN_TTL_DAYS, days, DEFAULT_TOKEN_TTL_DAYS
        );
        DEFAULT_TOKEN_TTL_DAYS
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
