//! Application-layer rate limiting for login and registration routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use shared::error::ErrorCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::AppError;
use crate::core::ServerState;
use crate::security_log;

const WINDOW: Duration = Duration::from_secs(60);

struct IpEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window counter keyed by (route, client IP)
#[derive(Clone)]
pub struct RateLimiter {
    max_per_window: u32,
    entries: Arc<DashMap<(&'static str, String), IpEntry>>,
}

impl RateLimiter {
    /// `max_per_window == 0` disables limiting.
    pub fn new(max_per_window: u32) -> Self {
        Self {
            max_per_window,
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub fn check(&self, route: &'static str, ip: &str) -> bool {
        if self.max_per_window == 0 {
            return true;
        }
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry((route, ip.to_owned()))
            .or_insert_with(|| IpEntry {
                count: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start) >= WINDOW {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= self.max_per_window
    }

    /// Remove entries whose window has expired
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| now.duration_since(entry.window_start) < WINDOW);
    }
}

/// Extract client IP: X-Forwarded-For first, then peer address.
fn extract_ip(request: &Request) -> String {
    if let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

async fn limit(
    route: &'static str,
    state: &ServerState,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request);
    if !state.rate_limiter.check(route, &ip) {
        security_log!("rate_limited", route = route, ip = ip.as_str());
        return Err(AppError::with_message(
            ErrorCode::TooManyRequests,
            "Too many requests, try again later",
        ));
    }
    Ok(next.run(request).await)
}

pub async fn login_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    limit("login", &state, request, next).await
}

pub async fn register_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    limit("register", &state, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_per_route_and_ip() {
        let limiter = RateLimiter::new(2);
        assert!(limiter.check("login", "1.1.1.1"));
        assert!(limiter.check("login", "1.1.1.1"));
        assert!(!limiter.check("login", "1.1.1.1"));
        assert!(limiter.check("login", "2.2.2.2"));
        assert!(limiter.check("register", "1.1.1.1"));
    }

    #[test]
    fn test_zero_disables() {
        let limiter = RateLimiter::new(0);
        for _ in 0..100 {
            assert!(limiter.check("login", "1.1.1.1"));
        }
    }
}
