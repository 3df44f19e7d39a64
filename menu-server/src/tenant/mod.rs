//! 租户解析
//!
//! 把请求的 Host 头映射到餐厅 slug，并决定是否把请求改写到该餐厅的菜单页：
//!
//! ```text
//! asala.example.com/        → /menu/asala
//! asala.example.com/about   → /menu/asala/about
//! asala.localhost:3000/     → /menu/asala
//! example.com/menu/x (无租户) → 307 /
//! ```

pub mod middleware;

pub use middleware::{TenantSlug, resolve_tenant};

/// Subdomains that never denote a restaurant
pub const RESERVED_SUBDOMAINS: &[&str] = &["www", "api", "admin"];

/// Prefix of the per-restaurant menu page
pub const MENU_PREFIX: &str = "/menu";

/// Routing decision for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantRoute {
    /// Serve the request unchanged
    Passthrough,
    /// Serve the given path (and query) instead
    Rewrite(String),
    /// No tenant on a tenant-only path: temporary redirect to `/`, query kept
    RedirectRoot,
}

/// Extract the restaurant slug from a Host header value
///
/// Development hosts (`localhost`, `127.0.0.1`) need two labels
/// (`asala.localhost`); production hosts need more than two
/// (`asala.example.com`). Reserved and malformed labels yield `None`.
pub fn resolve_slug(host: &str) -> Option<String> {
    let host = host.trim().to_ascii_lowercase();
    let hostname = strip_port(&host);
    if hostname.is_empty() {
        return None;
    }

    let labels: Vec<&str> = hostname.split('.').collect();
    let is_dev = hostname.contains("localhost") || hostname.contains("127.0.0.1");

    let candidate = if is_dev {
        if labels.len() < 2 || labels[0] == "localhost" || is_ipv4(hostname) {
            return None;
        }
        labels[0]
    } else {
        if labels.len() <= 2 || is_ipv4(hostname) {
            return None;
        }
        labels[0]
    };

    if RESERVED_SUBDOMAINS.contains(&candidate) || !is_valid_label(candidate) {
        return None;
    }
    Some(candidate.to_string())
}

/// Decide how to serve `path` (which may carry a `?query`) for `host`
pub fn route(host: Option<&str>, path_and_query: &str) -> TenantRoute {
    let (path, query) = match path_and_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_and_query, None),
    };

    if is_skipped_path(path) {
        return TenantRoute::Passthrough;
    }

    let under_menu = path == MENU_PREFIX || path.starts_with("/menu/");
    match host.and_then(resolve_slug) {
        Some(slug) if !under_menu => {
            let mut target = format!("{MENU_PREFIX}/{slug}");
            if path != "/" && !path.is_empty() {
                target.push_str(path);
            }
            if let Some(q) = query {
                target.push('?');
                target.push_str(q);
            }
            TenantRoute::Rewrite(target)
        }
        None if under_menu => TenantRoute::RedirectRoot,
        _ => TenantRoute::Passthrough,
    }
}

/// Paths served as-is regardless of the host
fn is_skipped_path(path: &str) -> bool {
    const PREFIXES: &[&str] = &["/api", "/_next", "/static", "/dashboard", "/super-admin"];

    if path == "/health" || path.starts_with("/health/") || path == "/favicon.ico" {
        return true;
    }
    if PREFIXES
        .iter()
        .any(|p| path == *p || path.starts_with(&format!("{p}/")))
    {
        return true;
    }
    // static files
    path.rsplit('/').next().is_some_and(|last| last.contains('.'))
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

fn is_ipv4(hostname: &str) -> bool {
    hostname.parse::<std::net::Ipv4Addr>().is_ok()
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
