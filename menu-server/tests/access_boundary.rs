//! 认证、角色与租户隔离

mod common;

use common::*;
use http::StatusCode;
use serde_json::json;
use shared::error::ErrorCode;
use shared::models::Role;

#[tokio::test]
async fn test_protected_routes_require_token() {
    let state = test_state();

    let res = get(&state, "/api/categories", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = get(&state, "/api/orders", Some("not-a-jwt")).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], json!(ErrorCode::TokenInvalid.code()));

    let res = get(&state, "/api/auth/me", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    // public reads stay open
    let res = get(&state, "/api/restaurants/unknown-place", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_gates() {
    let state = test_state();
    let (restaurant, owner) = seed_restaurant(&state, "Asala Grill").await;
    let staff = seed_user(&state, Role::RestaurantStaff, Some(&restaurant.id)).await;
    let staff_token = token_for(&state, &staff);
    let owner_token = token_for(&state, &owner);

    let res = post(
        &state,
        "/api/categories",
        Some(&staff_token),
        json!({ "name": "Drinks" }),
    )
    .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["code"], json!(ErrorCode::RoleRequired.code()));

    assert_eq!(
        get(&state, "/api/staff", Some(&staff_token)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        get(&state, "/api/super-admin/stats", Some(&owner_token)).await.status,
        StatusCode::FORBIDDEN
    );

    // staff may read the dashboard and orders
    assert_eq!(
        get(&state, "/api/dashboard/stats", Some(&staff_token)).await.status,
        StatusCode::OK
    );
    assert_eq!(
        get(&state, "/api/orders", Some(&staff_token)).await.status,
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_writes_use_identity_restaurant() {
    let state = test_state();
    let (mine, owner) = seed_restaurant(&state, "Asala Grill").await;
    let (theirs, _) = seed_restaurant(&state, "Other Place").await;
    let token = token_for(&state, &owner);

    let res = post(
        &state,
        "/api/categories",
        Some(&token),
        json!({ "name": "Drinks", "restaurantId": theirs.id }),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["restaurantId"], mine.id.as_str());

    let theirs_categories = state
        .categories
        .find_all_by_restaurant(&theirs.id)
        .await
        .unwrap();
    assert!(theirs_categories.is_empty());
}

#[tokio::test]
async fn test_cross_tenant_access_is_refused() {
    let state = test_state();
    let (_, owner_a) = seed_restaurant(&state, "Asala Grill").await;
    let (restaurant_b, owner_b) = seed_restaurant(&state, "Other Place").await;
    let token_a = token_for(&state, &owner_a);
    let token_b = token_for(&state, &owner_b);
    let (category_b, item_b) = seed_menu(&state, &token_b, 12.0).await;

    // menu management: other tenant's ids look missing
    let res = put(
        &state,
        &format!("/api/categories/{category_b}"),
        Some(&token_a),
        json!({ "name": "Mine now" }),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    let res = delete(&state, &format!("/api/menu-items/{item_b}"), Some(&token_a)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    // orders: other tenant's order is forbidden
    let order = post(
        &state,
        "/api/orders",
        None,
        json!({
            "restaurantId": restaurant_b.id,
            "customerInfo": { "name": "Omar", "phone": "+966522222222" },
            "items": [{ "menuItemId": item_b, "quantity": 1 }]
        }),
    )
    .await;
    assert_eq!(order.status, StatusCode::CREATED, "{:?}", order.body);
    let uri = format!("/api/orders/{}", order.body["id"].as_str().unwrap());

    let res = put(&state, &uri, Some(&token_a), json!({ "status": "confirmed" })).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["code"], json!(ErrorCode::TenantMismatch.code()));
    let res = get(&state, &uri, Some(&token_b)).await;
    assert_eq!(res.body["status"], "pending");

    // super admin can move any order
    let admin = seed_user(&state, Role::SuperAdmin, None).await;
    let admin_token = token_for(&state, &admin);
    let res = put(&state, &uri, Some(&admin_token), json!({ "status": "confirmed" })).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_registration_approval_and_login() {
    let state = test_state();

    let res = post(
        &state,
        "/api/restaurants/register",
        None,
        json!({
            "restaurantName": "Bait Al Mandi",
            "ownerName": "Khalid",
            "email": "Khalid@Mandi.test",
            "password": PASSWORD,
            "phone": "+966533333333"
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
    assert_eq!(res.body["restaurant"]["slug"], "bait-al-mandi");
    assert_eq!(res.body["restaurant"]["settings"]["isActive"], false);
    assert!(res.body["user"].get("passwordHash").is_none());
    let restaurant_id = res.body["restaurant"]["id"].as_str().unwrap().to_string();

    // same email again
    let res = post(
        &state,
        "/api/restaurants/register",
        None,
        json!({
            "restaurantName": "Another Mandi",
            "ownerName": "Khalid",
            "email": "khalid@mandi.test",
            "password": PASSWORD,
            "phone": "+966533333333"
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let login = json!({ "email": "khalid@mandi.test", "password": PASSWORD });
    let res = post(&state, "/api/auth/login", None, login.clone()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], json!(ErrorCode::AccountDisabled.code()));

    let admin = seed_user(&state, Role::SuperAdmin, None).await;
    let admin_token = token_for(&state, &admin);
    let res = put(
        &state,
        &format!("/api/super-admin/restaurants/{restaurant_id}/status"),
        Some(&admin_token),
        json!({ "isActive": true, "acceptOrders": true }),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["settings"]["acceptOrders"], true);

    let res = post(&state, "/api/auth/login", None, login).await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["user"]["restaurantSlug"], "bait-al-mandi");
    let token = res.body["token"].as_str().unwrap().to_string();

    let me = get(&state, "/api/auth/me", Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["role"], "restaurant_admin");
    assert!(me.body["lastLogin"].is_number());

    let res = post(
        &state,
        "/api/auth/login",
        None,
        json!({ "email": "khalid@mandi.test", "password": "wrong-password" }),
    )
    .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], json!(ErrorCode::InvalidCredentials.code()));
}

#[tokio::test]
async fn test_owner_cannot_change_slug_or_activation() {
    let state = test_state();
    let (restaurant, owner) = seed_restaurant(&state, "Asala Grill").await;
    let token = token_for(&state, &owner);

    let res = put(
        &state,
        "/api/restaurants/settings",
        Some(&token),
        json!({
            "name": "Asala Grill House",
            "slug": "stolen",
            "settings": { "isActive": false, "deliveryEnabled": true }
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["name"], "Asala Grill House");
    assert_eq!(res.body["slug"], restaurant.slug.as_str());
    assert_eq!(res.body["settings"]["isActive"], true);
    assert_eq!(res.body["settings"]["deliveryEnabled"], true);
}

#[tokio::test]
async fn test_staff_management() {
    let state = test_state();
    let (restaurant, owner) = seed_restaurant(&state, "Asala Grill").await;
    let token = token_for(&state, &owner);

    let res = post(
        &state,
        "/api/staff",
        Some(&token),
        json!({
            "name": "Sara",
            "email": "sara@asala.test",
            "password": PASSWORD,
            "role": "restaurant_staff"
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
    assert_eq!(res.body["restaurantId"], restaurant.id.as_str());
    assert_eq!(res.body["permissions"], json!(["orders"]));
    let staff_id = res.body["id"].as_str().unwrap().to_string();

    // duplicate email
    let res = post(
        &state,
        "/api/staff",
        Some(&token),
        json!({ "name": "Sara 2", "email": "SARA@asala.test", "password": PASSWORD }),
    )
    .await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    // super_admin cannot be created here
    let res = post(
        &state,
        "/api/staff",
        Some(&token),
        json!({
            "name": "Root",
            "email": "root@asala.test",
            "password": PASSWORD,
            "role": "super_admin"
        }),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = delete(&state, &format!("/api/staff/{}", owner.id), Some(&token)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["code"], json!(ErrorCode::CannotDeleteSelf.code()));

    let res = delete(&state, &format!("/api/staff/{staff_id}"), Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    let list = get(&state, "/api/staff", Some(&token)).await;
    assert_eq!(list.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_and_register_are_rate_limited() {
    let config = menu_server::Config {
        login_rate_limit: 1,
        ..menu_server::Config::for_tests()
    };
    let state = menu_server::ServerState::with_store(
        config,
        std::sync::Arc::new(menu_server::db::MemoryStore::new()),
    );

    let login = json!({ "email": "nobody@mandi.test", "password": "wrong-password" });
    let res = post(&state, "/api/auth/login", None, login.clone()).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = post(&state, "/api/auth/login", None, login).await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body["code"], json!(ErrorCode::TooManyRequests.code()));

    // separate budget per route
    let register = json!({
        "restaurantName": "Bait Al Mandi",
        "ownerName": "Khalid",
        "email": "khalid@mandi.test",
        "password": PASSWORD,
        "phone": "+966533333333"
    });
    let res = post(&state, "/api/restaurants/register", None, register.clone()).await;
    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);

    let res = post(&state, "/api/restaurants/register", None, register).await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body["code"], json!(ErrorCode::TooManyRequests.code()));
}
