//! tests/global_errors/405.rs
//! Every endpoint is GET only.

use reqwest::StatusCode;
use sfmi_probe::api::secret_lister::secret_lister_routes;
use sfmi_probe::StaticEnv;

use crate::common;

#[tokio::test]
async fn returns_405_for_post() {
    let base_url: String = common::spawn_app(secret_lister_routes(), StaticEnv::new());

    let resp: reqwest::Response = reqwest::Client::new()
        .post(format!("{}/identity_header", base_url))
        .body("ignored")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
