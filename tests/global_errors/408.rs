//! tests/global_errors/408.rs
//! Ensures that a hanging identity endpoint is cut off by the request timeout.

use std::time::Duration;

use axum::{routing::get, Router};
use reqwest::StatusCode;
use sfmi_probe::api::token_validator::token_validator_routes;
use sfmi_probe::StaticEnv;
use tokio::time::timeout;

use crate::common;

#[tokio::test]
async fn returns_408_when_identity_endpoint_hangs() {
    // Upstream that answers long after the server gives up
    let slow: Router = Router::new().route(
        common::TOKEN_PATH,
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            "{}"
        }),
    );
    let endpoint: String = format!("{}{}", common::spawn_router(slow), common::TOKEN_PATH);

    let env: StaticEnv = StaticEnv::new()
        .with("IDENTITY_ENDPOINT", endpoint)
        .with("IDENTITY_HEADER", "sf-secret")
        .with("DEFAULT_TIMEOUT_SECONDS", "1");
    let base_url: String = common::spawn_app(token_validator_routes(), env);

    let resp_result: Result<Result<reqwest::Response, reqwest::Error>, tokio::time::error::Elapsed> = timeout(
        Duration::from_secs(5), // client-side timeout duration
        reqwest::get(format!("{}/", base_url)),
    )
    .await;

    // Ensure the client did not timeout waiting for a response.
    assert!(resp_result.is_ok(), "Client timed out waiting for server.");

    let resp: reqwest::Response = resp_result.unwrap().expect("Request failed unexpectedly.");
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
}
