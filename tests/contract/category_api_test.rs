// Contract tests for the /categories endpoints
//
// Drives the full application in-process over the in-memory store: authentication,
// ability checks, status codes and response shapes.

use std::sync::Arc;

use actix_web::{test, App};
use serde_json::{json, Value};

use stockroom::middleware::auth::{issue_api_key, Ability};
use stockroom::storage::MemoryStore;
use stockroom::AppServices;

/// Build the app over `services` with auth in front, like `main` does
macro_rules! init_app {
    ($services:expr) => {{
        let services: AppServices = $services.clone();
        test::init_service(
            App::new()
                .wrap(services.auth())
                .configure(|cfg| services.configure(cfg)),
        )
        .await
    }};
}

struct Harness {
    services: AppServices,
    store: Arc<MemoryStore>,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            services: AppServices::in_memory(store.clone()),
            store,
        }
    }

    async fn key(&self, abilities: &[Ability]) -> String {
        issue_api_key(self.store.as_ref(), "contract-test", abilities)
            .await
            .unwrap()
            .1
    }
}

fn category_body(code: &str, name: &str) -> Value {
    json!({ "category_code": code, "category_name": name })
}

#[actix_web::test]
async fn test_create_category_returns_201_with_body() {
    let harness = Harness::new();
    let key = harness.key(&Ability::ALL).await;
    let app = init_app!(harness.services);

    let req = test::TestRequest::post()
        .uri("/categories")
        .insert_header(("X-API-Key", key))
        .set_json(category_body("CAT001", "Electronics"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["category_code"], "CAT001");
    assert_eq!(body["category_name"], "Electronics");
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());
}

#[actix_web::test]
async fn test_duplicate_code_returns_409() {
    let harness = Harness::new();
    let key = harness.key(&Ability::ALL).await;
    let app = init_app!(harness.services);

    for (expected, name) in [(201, "Electronics"), (409, "Another Electronics")] {
        let req = test::TestRequest::post()
            .uri("/categories")
            .insert_header(("X-API-Key", key.clone()))
            .set_json(category_body("CAT001", name))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), expected);
    }

    let req = test::TestRequest::get()
        .uri("/categories")
        .insert_header(("X-API-Key", key))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["category_name"], "Electronics");
}

#[actix_web::test]
async fn test_missing_key_is_401_and_nothing_is_written() {
    let harness = Harness::new();
    let key = harness.key(&Ability::ALL).await;
    let app = init_app!(harness.services);

    let req = test::TestRequest::post()
        .uri("/categories")
        .set_json(category_body("CAT001", "Electronics"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/categories")
        .insert_header(("X-API-Key", "sk_not_a_real_key"))
        .set_json(category_body("CAT001", "Electronics"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::get()
        .uri("/categories")
        .insert_header(("X-API-Key", key))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_each_route_checks_its_ability() {
    let harness = Harness::new();
    let admin = harness.key(&Ability::ALL).await;
    let reader = harness.key(&[Ability::AccessCategories]).await;
    let app = init_app!(harness.services);

    let req = test::TestRequest::post()
        .uri("/categories")
        .insert_header(("X-API-Key", admin.clone()))
        .set_json(category_body("CAT001", "Electronics"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri("/categories")
        .insert_header(("X-API-Key", reader.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let denied = [
        test::TestRequest::post()
            .uri("/categories")
            .set_json(category_body("CAT002", "Books")),
        test::TestRequest::get().uri(&format!("/categories/{}", id)),
        test::TestRequest::put()
            .uri(&format!("/categories/{}", id))
            .set_json(json!({ "category_name": "Hijacked" })),
        test::TestRequest::delete().uri(&format!("/categories/{}", id)),
        test::TestRequest::get().uri(&format!("/categories/{}/products", id)),
    ];
    for req in denied {
        let req = req.insert_header(("X-API-Key", reader.clone())).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 403);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/categories/{}", id))
        .insert_header(("X-API-Key", admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["category_name"], "Electronics");
}

#[actix_web::test]
async fn test_update_changes_only_given_fields() {
    let harness = Harness::new();
    let key = harness.key(&Ability::ALL).await;
    let app = init_app!(harness.services);

    let req = test::TestRequest::post()
        .uri("/categories")
        .insert_header(("X-API-Key", key.clone()))
        .set_json(category_body("CAT001", "Electronics"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/categories/{}", id))
        .insert_header(("X-API-Key", key))
        .set_json(json!({ "category_name": "Consumer Electronics" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["category_code"], "CAT001");
    assert_eq!(body["category_name"], "Consumer Electronics");
}

#[actix_web::test]
async fn test_unknown_fields_are_rejected() {
    let harness = Harness::new();
    let key = harness.key(&Ability::ALL).await;
    let app = init_app!(harness.services);

    let req = test::TestRequest::post()
        .uri("/categories")
        .insert_header(("X-API-Key", key))
        .set_json(json!({
            "id": 999,
            "category_code": "CAT001",
            "category_name": "Electronics"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn test_delete_with_products_is_refused() {
    let harness = Harness::new();
    let key = harness.key(&Ability::ALL).await;
    let app = init_app!(harness.services);

    let req = test::TestRequest::post()
        .uri("/categories")
        .insert_header(("X-API-Key", key.clone()))
        .set_json(category_body("CAT001", "Electronics"))
        .to_request();
    let category: Value = test::call_and_read_body_json(&app, req).await;
    let id = category["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/products")
        .insert_header(("X-API-Key", key.clone()))
        .set_json(json!({
            "category_id": id,
            "product_name": "Laptop",
            "product_code": "LAP001",
            "product_quantity": 5,
            "product_cost": "500.00",
            "product_price": "750.00",
            "product_stock_alert": 1
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    let req = test::TestRequest::delete()
        .uri(&format!("/categories/{}", id))
        .insert_header(("X-API-Key", key.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 409);

    let req = test::TestRequest::get()
        .uri("/categories")
        .insert_header(("X-API-Key", key.clone()))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["products_count"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/categories/{}/products", id))
        .insert_header(("X-API-Key", key))
        .to_request();
    let products: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(products[0]["product_code"], "LAP001");
}

#[actix_web::test]
async fn test_empty_category_deletes_with_204() {
    let harness = Harness::new();
    let key = harness.key(&Ability::ALL).await;
    let app = init_app!(harness.services);

    let req = test::TestRequest::post()
        .uri("/categories")
        .insert_header(("X-API-Key", key.clone()))
        .set_json(category_body("CAT001", "Electronics"))
        .to_request();
    let category: Value = test::call_and_read_body_json(&app, req).await;
    let id = category["id"].as_i64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/categories/{}", id))
        .insert_header(("X-API-Key", key.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/categories/{}", id))
        .insert_header(("X-API-Key", key))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn test_probes_need_no_key() {
    let harness = Harness::new();
    let app = init_app!(harness.services);

    for uri in ["/health", "/ready"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 200, "{}", uri);
    }
}
