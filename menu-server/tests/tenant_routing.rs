//! 子域名 → 菜单页改写

mod common;

use axum::body::Body;
use axum::extract::Request;
use common::*;
use http::StatusCode;

fn with_host(host: &str, uri: &str) -> Request {
    http::Request::builder()
        .uri(uri)
        .header("host", host)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_subdomain_serves_menu_page() {
    let state = test_state();
    let (restaurant, _) = seed_restaurant(&state, "Asala Grill").await;
    assert_eq!(restaurant.slug, "asala-grill");

    let res = send(&state, with_host("asala-grill.localhost:3000", "/")).await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["restaurant"]["slug"], "asala-grill");
    assert!(res.body["categories"].is_array());
    assert!(res.body["menuItems"].is_array());

    // production host, nested path and query survive the rewrite
    let res = send(&state, with_host("asala-grill.menus.example.com", "/cart?table=4")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["restaurant"]["id"], restaurant.id.as_str());
}

#[tokio::test]
async fn test_unknown_subdomain_is_not_found() {
    let state = test_state();
    let res = send(&state, with_host("ghost.localhost:3000", "/")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "Restaurant not found");
}

#[tokio::test]
async fn test_menu_path_without_tenant_redirects() {
    let state = test_state();
    seed_restaurant(&state, "Asala Grill").await;

    let res = send(&state, with_host("localhost:3000", "/menu/asala-grill")).await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers.get("location").unwrap(), "/");

    let res = send(&state, with_host("www.example.com", "/menu/asala-grill")).await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);

    let res = send(&state, with_host("localhost:3000", "/menu/asala-grill?table=4")).await;
    assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers.get("location").unwrap(), "/?table=4");
}

#[tokio::test]
async fn test_api_and_health_are_never_rewritten() {
    let state = test_state();
    seed_restaurant(&state, "Asala Grill").await;

    let res = send(&state, with_host("asala-grill.localhost:3000", "/health")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");

    let res = send(
        &state,
        with_host("asala-grill.localhost:3000", "/api/restaurants/asala-grill/categories"),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body["categories"].is_array());
}

#[tokio::test]
async fn test_reserved_and_ip_hosts_have_no_tenant() {
    let state = test_state();
    for host in ["www.example.com", "api.example.com", "127.0.0.1:3000", "example.com"] {
        let res = send(&state, with_host(host, "/menu")).await;
        assert_eq!(res.status, StatusCode::TEMPORARY_REDIRECT, "{host}");
    }
}
