use http::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::client::FeishuClient;
use crate::error::{ApiError, ApiResult};
use crate::utils::constants::USER_BATCH_GET_ID_ENDPOINT;

#[derive(Debug, Deserialize, Default)]
struct BatchGetIdResponse {
    #[serde(default)]
    data: Option<BatchGetIdData>,
}

#[derive(Debug, Deserialize, Default)]
struct BatchGetIdData {
    #[serde(default)]
    user_list: Option<Vec<UserIdEntry>>,
}

#[derive(Debug, Deserialize)]
struct UserIdEntry {
    user_id: Option<String>,
}

impl FeishuClient {
    /// Resolve a user id from an email address and/or a mobile number.
    ///
    /// An empty match list is reported as a request error; the API does not
    /// tell an unknown user apart from a missing contact permission.
    pub async fn get_user_id(&self, email: Option<&str>, phone: Option<&str>) -> ApiResult<String> {
        let email = email.filter(|e| !e.is_empty());
        let phone = phone.filter(|p| !p.is_empty());
        if email.is_none() && phone.is_none() {
            return Err(ApiError::validation("Either email or phone must be provided"));
        }

        let payload = json!({
            "emails": email.into_iter().collect::<Vec<_>>(),
            "mobiles": phone.into_iter().collect::<Vec<_>>(),
        });

        let token = self.app_access_token().await?;
        let response = self
            .request(Method::POST, USER_BATCH_GET_ID_ENDPOINT, Some(&payload), Some(&token))
            .await?;

        let parsed: BatchGetIdResponse = serde_json::from_value(response)
            .map_err(|_| ApiError::request("Invalid JSON response"))?;

        parsed
            .data
            .unwrap_or_default()
            .user_list
            .unwrap_or_default()
            .into_iter()
            .find_map(|entry| entry.user_id.filter(|id| !id.is_empty()))
            .inspect(|user_id| info!(user_id = %user_id, "user resolved"))
            .ok_or_else(|| ApiError::request("User not found or insufficient permissions"))
    }
}
