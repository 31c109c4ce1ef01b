// tests/common/mod.rs
pub use serde_json::json;

use httpmock::Method::POST;
use httpmock::{Mock, MockServer};

use crate::client::{Credentials, FeishuClient};
use crate::config::settings::ApiConfig;
use crate::utils::constants::{APP_ACCESS_TOKEN_ENDPOINT, TENANT_ACCESS_TOKEN_ENDPOINT};

pub const TEST_APP_ID: &str = "cli_test";
pub const TEST_APP_SECRET: &str = "secret_test";
pub const TEST_APP_TOKEN: &str = "t-app-token";

/// Client pointed at the mock server, 5s timeout.
pub fn client_for(server: &MockServer) -> FeishuClient {
    client_with(server.base_url(), 5)
}

pub fn client_with(base_url: String, timeout_secs: u64) -> FeishuClient {
    let mut config = ApiConfig::default().with_base_url(base_url);
    config.timeout_secs = timeout_secs;
    FeishuClient::with_config(
        Credentials::new(TEST_APP_ID, TEST_APP_SECRET).expect("credentials"),
        config,
    )
    .expect("client")
}

pub async fn mock_app_token<'a>(server: &'a MockServer, token: &str, expire: i64) -> Mock<'a> {
    let body = json!({"code": 0, "msg": "ok", "app_access_token": token, "expire": expire});
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(APP_ACCESS_TOKEN_ENDPOINT)
                .json_body(json!({"app_id": TEST_APP_ID, "app_secret": TEST_APP_SECRET}));
            then.status(200).json_body(body);
        })
        .await
}

pub async fn mock_tenant_token<'a>(server: &'a MockServer, body: serde_json::Value) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(POST).path(TENANT_ACCESS_TOKEN_ENDPOINT);
            then.status(200).json_body(body);
        })
        .await
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
