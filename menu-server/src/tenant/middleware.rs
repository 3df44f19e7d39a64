//! 租户中间件
//!
//! 必须包裹整个 Router (而不是 `Router::layer`)，这样路径改写发生在路由匹配之前。

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::Uri;
use http::uri::PathAndQuery;

use super::{TenantRoute, resolve_slug, route};

/// Slug resolved from the Host header, present on rewritten requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantSlug(pub String);

/// Host 头 → 租户改写
pub async fn resolve_tenant(mut req: Request, next: Next) -> Response {
    let host = req
        .headers()
        .get(http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| req.uri().host())
        .map(str::to_owned);
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(PathAndQuery::as_str)
        .unwrap_or("/")
        .to_owned();

    match route(host.as_deref(), &path_and_query) {
        TenantRoute::Passthrough => next.run(req).await,
        TenantRoute::RedirectRoot => {
            tracing::debug!(path = %path_and_query, "No tenant for menu path, redirecting");
            Redirect::temporary(&root_with_query(req.uri())).into_response()
        }
        TenantRoute::Rewrite(target) => {
            match rewrite_uri(req.uri(), &target) {
                Ok(uri) => {
                    tracing::debug!(from = %path_and_query, to = %target, "Tenant rewrite");
                    *req.uri_mut() = uri;
                    if let Some(slug) = host.as_deref().and_then(resolve_slug) {
                        req.extensions_mut().insert(TenantSlug(slug));
                    }
                }
                Err(e) => {
                    tracing::warn!(rewrite = %target, error = %e, "Invalid tenant rewrite target");
                }
            }
            next.run(req).await
        }
    }
}

/// `/` carrying over the original query string
fn root_with_query(uri: &Uri) -> String {
    match uri.query() {
        Some(query) if !query.is_empty() => format!("/?{query}"),
        _ => "/".to_owned(),
    }
}

fn rewrite_uri(original: &Uri, target: &str) -> Result<Uri, http::Error> {
    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(target)?);
    Ok(Uri::from_parts(parts)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_uri_keeps_authority() {
        let original: Uri = "http://asala.example.com/about?x=1".parse().unwrap();
        let uri = rewrite_uri(&original, "/menu/asala/about?x=1").unwrap();
        assert_eq!(uri.to_string(), "http://asala.example.com/menu/asala/about?x=1");

        let original: Uri = "/".parse().unwrap();
        let uri = rewrite_uri(&original, "/menu/asala").unwrap();
        assert_eq!(uri.to_string(), "/menu/asala");
    }

    #[test]
    fn test_root_redirect_keeps_query() {
        let uri: Uri = "/menu/asala?table=4&lang=ar".parse().unwrap();
        assert_eq!(root_with_query(&uri), "/?table=4&lang=ar");
        assert_eq!(root_with_query(&"/menu".parse().unwrap()), "/");
        assert_eq!(root_with_query(&"/menu?".parse().unwrap()), "/");
    }
}
