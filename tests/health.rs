use gazman_api::routes::health::{api_root, health_check};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
}

#[tokio::test]
async fn api_root_names_the_service() {
    let response = api_root().await;
    let data = response.0.data.expect("api info");
    assert_eq!(data.name, "gazman-api");
    assert!(!data.version.is_empty());
}
