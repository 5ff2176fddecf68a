//! Integration tests for `BigBuyClient` using wiremock HTTP mocks.

use greengoods_bigbuy::{BigBuyClient, BigBuyError, ProductFilter};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> BigBuyClient {
    BigBuyClient::with_base_url("test-key", 20, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn search_products_sends_bearer_and_parses_page() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "total": 2,
        "products": [
            {
                "id": "42",
                "name": "Eco Mug",
                "retailPrice": "9.5",
                "stock": "12",
                "category": {"id": 3, "name": "Kitchen"},
                "images": [{"url": "https://img.example/mug.jpg", "isCover": true}]
            },
            {
                "id": 43,
                "name": "Bamboo Straw Set",
                "retailPrice": 4.25,
                "stock": 0
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/catalog/products"))
        .and(header("authorization", "Bearer test-key"))
        .and(query_param("query", "eco"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .search_products(&ProductFilter {
            query: Some("eco".to_string()),
            category: None,
            limit: 50,
            offset: 0,
        })
        .await
        .expect("should parse search page");

    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].name.as_deref(), Some("Eco Mug"));
}

#[tokio::test]
async fn search_limit_is_clamped_to_upstream_ceiling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog/products"))
        .and(query_param("limit", "100"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"total": 0, "products": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .search_products(&ProductFilter {
            limit: 5000,
            ..ProductFilter::default()
        })
        .await
        .expect("clamped request should succeed");

    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn fetch_product_detail_parses_raw_product() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "id": "77",
        "sku": "BB-77",
        "name": "Organic Soap",
        "description": "Handmade olive oil soap.",
        "retailPrice": "3.90",
        "wholesalePrice": "2.10",
        "stock": 44,
        "brand": {"name": "Verdera"}
    });

    Mock::given(method("GET"))
        .and(path("/catalog/products/77"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let raw = client
        .fetch_product_detail("77")
        .await
        .expect("should parse product detail");

    assert_eq!(raw.sku.as_deref(), Some("BB-77"));
    assert_eq!(raw.name.as_deref(), Some("Organic Soap"));
    assert_eq!(raw.brand.and_then(|b| b.name).as_deref(), Some("Verdera"));
}

#[tokio::test]
async fn fetch_stock_parses_quantity() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog/products/42/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "quantity": 31
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stock = client.fetch_stock("42").await.expect("should parse stock");
    assert_eq!(stock.quantity, 31);
}

#[tokio::test]
async fn fetch_categories_parses_list() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {"id": 1, "name": "Kitchen", "url": "kitchen"},
        {"id": 2, "name": "Personal Care"}
    ]);

    Mock::given(method("GET"))
        .and(path("/catalog/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let categories = client
        .fetch_categories()
        .await
        .expect("should parse categories");

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].name.as_deref(), Some("Kitchen"));
}

#[tokio::test]
async fn not_found_maps_to_notfound_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog/products/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_product_detail("999").await;
    assert!(matches!(result, Err(BigBuyError::NotFound { .. })));
}

#[tokio::test]
async fn upstream_5xx_maps_to_unexpected_status_with_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog/products/42/stock"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    match client.fetch_stock("42").await {
        Err(BigBuyError::UnexpectedStatus { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog/products/42/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_stock("42").await;
    assert!(matches!(result, Err(BigBuyError::Deserialize { .. })));
}
