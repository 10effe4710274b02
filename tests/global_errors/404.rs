//! tests/global_errors/404.rs
//! Ensures that hitting an unknown route returns HTTP 404.

use reqwest::StatusCode;
use sfmi_probe::api::token_validator::token_validator_routes;
use sfmi_probe::StaticEnv;

use crate::common;

#[tokio::test]
async fn returns_404_for_nonexistent_route() {
    let base_url: String = common::spawn_app(token_validator_routes(), StaticEnv::new());

    // Send a GET request to a route that does not exist.
    let resp: reqwest::Response = reqwest::Client::new()
        .get(format!("{}/does-not-exist", base_url))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().is_empty());
}
