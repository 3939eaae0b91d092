use std::env;
use std::time::Duration;

use crate::services::availability::BookedDatePolicy;
use crate::services::retry::RetryPolicy;
use crate::services::status_editor::TransitionPolicy;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub store_latency_ms: u64,
    pub seed_demo_data: bool,
    pub booked_date_policy: BookedDatePolicy,
    pub transition_policy: TransitionPolicy,
    pub store_max_retries: u32,
    pub store_retry_backoff_ms: u64,
    pub venue_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: parsed("PORT", 3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| ":memory:".to_string()),
            store_latency_ms: parsed("STORE_LATENCY_MS", 500),
            seed_demo_data: parsed("SEED_DEMO_DATA", true),
            booked_date_policy: env::var("BOOKED_DATE_POLICY")
                .ok()
                .and_then(|v| {
                    let policy = BookedDatePolicy::parse(&v);
                    if policy.is_none() {
                        tracing::warn!(value = %v, "unknown BOOKED_DATE_POLICY, using default");
                    }
                    policy
                })
                .unwrap_or_default(),
            transition_policy: env::var("STATUS_TRANSITIONS")
                .ok()
                .and_then(|v| {
                    let policy = TransitionPolicy::parse(&v);
                    if policy.is_none() {
                        tracing::warn!(value = %v, "unknown STATUS_TRANSITIONS, using default");
                    }
                    policy
                })
                .unwrap_or_default(),
            store_max_retries: parsed("STORE_MAX_RETRIES", 2),
            store_retry_backoff_ms: parsed("STORE_RETRY_BACKOFF_MS", 100),
            venue_name: env::var("VENUE_NAME").unwrap_or_else(|_| "The Soul Garden".to_string()),
        }
    }

    pub fn store_latency(&self) -> Duration {
        Duration::from_millis(self.store_latency_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.store_max_retries,
            base_backoff: Duration::from_millis(self.store_retry_backoff_ms),
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %v, "invalid config value, using default");
            default
        }),
        Err(_) => default,
    }
}
