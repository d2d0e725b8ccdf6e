use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn shipped_catalog() -> Catalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("catalog.yaml");
    rendercalc_core::load_catalog(&path).expect("shipped catalog should load")
}

fn app(storefront: Option<StorefrontClient>) -> Router {
    let state = AppState {
        catalog: Arc::new(shipped_catalog()),
        storefront: storefront.map(Arc::new),
    };
    build_app(state, rate_limit_state(1_000))
}

fn mock_storefront(server: &MockServer) -> StorefrontClient {
    StorefrontClient::with_endpoint(
        format!("{}/graphql.json", server.uri()),
        "test-token",
        5,
        "rendercalc-test/0.1",
        0,
        0,
    )
    .expect("client")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, json)
}

fn mesh_product_json() -> Value {
    json!({
        "node": {
            "handle": "alkali-resistant-mesh",
            "title": "Alkali Resistant Mesh",
            "productType": "Accessory",
            "priceRange": {
                "minVariantPrice": { "amount": "48.0", "currencyCode": "GBP" },
                "maxVariantPrice": { "amount": "48.0", "currencyCode": "GBP" }
            },
            "variants": { "edges": [{ "node": {
                "id": "gid://shopify/ProductVariant/11",
                "title": "50m2 roll",
                "price": { "amount": "48.0", "currencyCode": "GBP" },
                "availableForSale": true,
                "selectedOptions": [{ "name": "Title", "value": "Default Title" }],
                "image": null
            }}]},
            "images": { "edges": [] }
        }
    })
}

#[test]
fn api_error_user_errors_map_to_bad_request() {
    let response = ApiError::new("user_errors", "rejected").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn api_error_unknown_code_maps_to_internal_error() {
    let response = ApiError::new("upstream_error", "boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn health_reports_unconfigured_storefront() {
    let (status, json) = send(app(None), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok", "storefront": "not_configured" }));
}

#[tokio::test]
async fn project_types_come_from_catalog() {
    let (status, json) = send(app(None), get("/catalog/project-types")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["currency"], "GBP");
    let ids: Vec<&str> = json["projectTypes"]
        .as_array()
        .expect("project types")
        .iter()
        .filter_map(|p| p["id"].as_str())
        .collect();
    assert!(ids.contains(&"retrofit"));
}

#[tokio::test]
async fn products_without_configuration_is_500() {
    let (status, json) = send(
        app(None),
        post_json("/products-by-handles", &json!({ "handles": ["bonding-adhesive"] })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"]
        .as_str()
        .expect("error message")
        .contains("SHOPIFY_STORE_DOMAIN"));
}

#[tokio::test]
async fn variants_without_configuration_is_500() {
    let (status, json) = send(app(None), get("/variants-by-handle/silicone-topcoat")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"]
        .as_str()
        .expect("error message")
        .starts_with("Shopify configuration missing"));
}

#[tokio::test]
async fn cart_without_configuration_is_500() {
    let (status, json) = send(
        app(None),
        post_json(
            "/cart/add",
            &json!({ "items": [{ "variantId": "gid://shopify/ProductVariant/1", "quantity": 1 }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"]
        .as_str()
        .expect("error message")
        .starts_with("Shopify configuration missing"));
}

#[tokio::test]
async fn products_rejects_non_array_handles() {
    let (status, json) = send(
        app(None),
        post_json("/products-by-handles", &json!({ "handles": "bonding-adhesive" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid handles array");
}

#[tokio::test]
async fn products_are_keyed_by_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "products": { "edges": [mesh_product_json()] } }
        })))
        .mount(&server)
        .await;

    let (status, json) = send(
        app(Some(mock_storefront(&server))),
        post_json(
            "/products-by-handles",
            &json!({ "handles": ["alkali-resistant-mesh"] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let mesh = &json["products"]["alkali-resistant-mesh"];
    assert_eq!(mesh["price"], 48.0);
    assert_eq!(mesh["hasColorVariants"], false);
    assert_eq!(mesh["variants"][0]["availableForSale"], true);
}

#[tokio::test]
async fn upstream_failure_is_500_with_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let (status, json) = send(
        app(Some(mock_storefront(&server))),
        post_json("/products-by-handles", &json!({ "handles": ["x"] })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to fetch product prices");
    assert!(json["details"].as_str().expect("details").contains("502"));
}

#[tokio::test]
async fn variants_for_unknown_handle_is_404() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "productByHandle": null } })),
        )
        .mount(&server)
        .await;

    let (status, json) = send(
        app(Some(mock_storefront(&server))),
        get("/variants-by-handle/no-such-topcoat"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Product not found");
}

#[tokio::test]
async fn cart_user_errors_are_400_with_details() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": { "input": { "lines": [
                { "merchandiseId": "gid://shopify/ProductVariant/999", "quantity": 2 }
            ]}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cartCreate": {
                "cart": null,
                "userErrors": [{ "field": ["input", "lines", "0"], "message": "Merchandise does not exist" }]
            }}
        })))
        .mount(&server)
        .await;

    let (status, json) = send(
        app(Some(mock_storefront(&server))),
        post_json(
            "/cart/add",
            &json!({ "items": [{ "variantId": "gid://shopify/ProductVariant/999", "quantity": 2 }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"][0]["message"], "Merchandise does not exist");
}

#[tokio::test]
async fn cart_rejects_empty_items() {
    let (status, _) = send(app(None), post_json("/cart/add", &json!({ "items": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recommendations_fall_back_to_static_prices() {
    let (status, json) = send(
        app(None),
        post_json(
            "/quote/recommendations",
            &json!({ "projectType": "retrofit", "substrate": "brick", "area": 50 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["priceSource"], "static");
    let offers = json["offers"].as_array().expect("offers");
    assert!(!offers.is_empty());
    assert_eq!(offers[0]["isRecommended"], true);
    assert!(offers.iter().skip(1).all(|o| o["isRecommended"] == false));
}

#[tokio::test]
async fn recommendations_use_live_prices_when_available() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "products": { "edges": [] } }
        })))
        .mount(&server)
        .await;

    let (status, json) = send(
        app(Some(mock_storefront(&server))),
        post_json(
            "/quote/recommendations",
            &json!({ "projectType": "retrofit", "substrate": "brick", "area": 50 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["priceSource"], "live");
}

#[tokio::test]
async fn recommendations_reject_substrate_outside_project_type() {
    let (status, json) = send(
        app(None),
        post_json(
            "/quote/recommendations",
            &json!({ "projectType": "ewi", "substrate": "brick", "area": 50 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().expect("error").contains("brick"));
}

#[tokio::test]
async fn recommendations_reject_non_positive_area() {
    let (status, _) = send(
        app(None),
        post_json(
            "/quote/recommendations",
            &json!({ "projectType": "retrofit", "substrate": "brick", "area": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
