//! 集成测试公共工具
//!
//! 内存存储 + 完整服务 (含租户改写与认证中间件)，通过 `oneshot` 驱动。

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use http::StatusCode;
use http_body_util::BodyExt;
use menu_server::db::MemoryStore;
use menu_server::services::onboarding::{self, NewOwner, NewRestaurant};
use menu_server::{Config, ServerState};
use serde_json::Value;
use shared::models::{ContactInfo, Restaurant, Role, User};
use shared::util::{new_id, now_millis};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-battery";

pub fn test_state() -> ServerState {
    ServerState::with_store(Config::for_tests(), Arc::new(MemoryStore::new()))
}

/// Response status, headers and JSON body (Null when empty or not JSON)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub body: Value,
}

pub async fn send(state: &ServerState, req: Request) -> TestResponse {
    let service = menu_server::routes::build_service(state.clone());
    let response = service.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request {
    let mut builder = http::Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "localhost:3000");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(state: &ServerState, uri: &str, token: Option<&str>) -> TestResponse {
    send(state, request("GET", uri, token, None)).await
}

pub async fn post(state: &ServerState, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
    send(state, request("POST", uri, token, Some(body))).await
}

pub async fn put(state: &ServerState, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
    send(state, request("PUT", uri, token, Some(body))).await
}

pub async fn delete(state: &ServerState, uri: &str, token: Option<&str>) -> TestResponse {
    send(state, request("DELETE", uri, token, None)).await
}

/// Active restaurant accepting orders, with an active owner account
pub async fn seed_restaurant(state: &ServerState, name: &str) -> (Restaurant, User) {
    let email = format!("{}@owner.test", name.to_lowercase().replace(' ', "-"));
    let (restaurant, owner) = onboarding::create_restaurant(
        &state.restaurants,
        &state.users,
        NewRestaurant {
            name: name.to_string(),
            name_ar: None,
            description: None,
            slug: None,
            contact: ContactInfo {
                email: email.clone(),
                phone: "+966500000000".into(),
                ..ContactInfo::default()
            },
            owner: Some(NewOwner {
                name: format!("{name} Owner"),
                email,
                password: PASSWORD.into(),
                phone: None,
            }),
            active: true,
        },
    )
    .await
    .unwrap();
    (restaurant, owner.unwrap())
}

pub async fn seed_user(state: &ServerState, role: Role, restaurant_id: Option<&str>) -> User {
    let now = now_millis();
    let id = new_id();
    state
        .users
        .create(User {
            email: format!("{}@staff.test", &id[..8]),
            id,
            password_hash: menu_server::auth::password::hash_password(PASSWORD).unwrap(),
            name: "Test User".into(),
            phone: None,
            role,
            restaurant_id: restaurant_id.map(str::to_string),
            permissions: role.default_permissions(),
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap()
}

pub fn token_for(state: &ServerState, user: &User) -> String {
    state.jwt_service.generate_token(user).unwrap()
}

/// Category plus one menu item at `price`
pub async fn seed_menu(state: &ServerState, token: &str, price: f64) -> (String, String) {
    let category = post(
        state,
        "/api/categories",
        Some(token),
        serde_json::json!({ "name": "Mains", "sortOrder": 1 }),
    )
    .await;
    assert_eq!(category.status, StatusCode::CREATED, "{:?}", category.body);
    let category_id = category.body["id"].as_str().unwrap().to_string();

    let item = post(
        state,
        "/api/menu-items",
        Some(token),
        serde_json::json!({
            "categoryId": category_id,
            "name": "Shawarma",
            "price": price,
            "options": [{
                "name": "Size",
                "type": "single",
                "required": false,
                "choices": [
                    { "name": "Regular", "price": 0 },
                    { "name": "Large", "price": 3.5 }
                ]
            }]
        }),
    )
    .await;
    assert_eq!(item.status, StatusCode::CREATED, "{:?}", item.body);
    let item_id = item.body["id"].as_str().unwrap().to_string();
    (category_id, item_id)
}
