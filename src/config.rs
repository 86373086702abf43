use std::env;

use chrono_tz::Tz;

use crate::errors::AppError;

/// One week.
pub const MAX_SESSION_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Base URL of the question-answering and scheduling service.
    pub api_base_url: String,
    pub business_timezone: Tz,
    pub session_ttl_minutes: i64,
    pub upstream_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let api_base_url = env::var("API_BASE_URL")
            .or_else(|_| env::var("NEXT_PUBLIC_API_BASE_URL"))
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let tz_name = env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "Asia/Dhaka".to_string());
        let business_timezone = tz_name
            .parse::<Tz>()
            .map_err(|e| AppError::Config(format!("BUSINESS_TIMEZONE: {e}")))?;

        let session_ttl_minutes = session_ttl(env::var("SESSION_TTL_MINUTES").ok().as_deref())?;

        Ok(Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            business_timezone,
            session_ttl_minutes,
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}

fn session_ttl(raw: Option<&str>) -> Result<i64, AppError> {
    let Some(raw) = raw else {
        return Ok(30);
    };
    match raw.trim().parse::<i64>() {
        Ok(minutes) if (1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) => Ok(minutes),
        _ => Err(AppError::Config(format!(
            "SESSION_TTL_MINUTES must be between 1 and {MAX_SESSION_TTL_MINUTES}, got {raw:?}"
        ))),
    }
}
