use http::Method;
use reqwest::RequestBuilder;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::FeishuClient;
use crate::error::{ApiError, ApiResult};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;

static TRANSPORT_MSG: &str = "transport";
static INVALID_JSON_MSG: &str = "invalid_json";

impl FeishuClient {
    /// Issue one request against `base_url + endpoint` and parse the JSON body.
    ///
    /// Single attempt. Transport failures, timeouts and non-2xx statuses map to
    /// `ApiError::Request("Request failed: ...")`, an unparsable body to
    /// `ApiError::Request("Invalid JSON response")`.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> ApiResult<Value> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let metrics = get_metrics().await;
        let start = get_instant();
        metrics.api_requests.with_label_values(&[method.as_str()]).inc();

        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, endpoint, "sending request");
        let result = send(request).await;
        metrics
            .api_request_duration
            .with_label_values(&[method.as_str()])
            .observe(start.elapsed().as_secs_f64());

        result
            .map(|value| {
                if let Some(code) = value.get("code").and_then(Value::as_i64).filter(|c| *c != 0) {
                    warn!(endpoint, code, msg = ?value.get("msg"), "api returned non-zero code");
                }
                value
            })
            .map_err(|(reason, err)| {
                metrics.api_request_failures.with_label_values(&[reason]).inc();
                debug!(%method, endpoint, error = %err, "request failed");
                err
            })
    }
}

async fn send(request: RequestBuilder) -> Result<Value, (&'static str, ApiError)> {
    let response = request
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| (TRANSPORT_MSG, ApiError::from(e)))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| (TRANSPORT_MSG, ApiError::from(e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|_| (INVALID_JSON_MSG, ApiError::request("Invalid JSON response")))
}
