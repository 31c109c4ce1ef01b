use http::Method;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::cache::token::{Token, TokenKind};
use crate::client::FeishuClient;
use crate::error::{ApiError, ApiResult};
use crate::helpers::time::now_i64;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::DEFAULT_TOKEN_TTL_SECONDS;

impl FeishuClient {
    /// Bearer token for `kind`, refreshed when it expires within five minutes.
    pub async fn get_valid_token(&self, kind: TokenKind) -> ApiResult<String> {
        self.tokens
            .get_or_refresh(kind, || self.fetch_token(kind))
            .await
    }

    pub async fn app_access_token(&self) -> ApiResult<String> {
        self.get_valid_token(TokenKind::App).await
    }

    pub async fn tenant_access_token(&self) -> ApiResult<String> {
        self.get_valid_token(TokenKind::Tenant).await
    }

    /// Drop the cached token so the next call refreshes it.
    pub async fn invalidate_token(&self, kind: TokenKind) {
        self.tokens.invalidate(kind).await;
    }

    async fn fetch_token(&self, kind: TokenKind) -> ApiResult<Token> {
        let metrics = get_metrics().await;
        metrics.token_refreshes.with_label_values(&[kind.as_str()]).inc();
        info!("refreshing {}", kind);

        let payload = json!({
            "app_id": self.credentials.app_id(),
            "app_secret": self.credentials.app_secret(),
        });

        let result = self
            .request(Method::POST, kind.endpoint(), Some(&payload), None)
            .await
            .and_then(|response| token_from_response(kind, &response));

        if let Err(e) = &result {
            metrics.token_refresh_failures.with_label_values(&[kind.as_str()]).inc();
            error!("{} refresh failed: {}", kind, e);
        }
        result
    }
}

fn token_from_response(kind: TokenKind, response: &Value) -> ApiResult<Token> {
    let token = response
        .get(kind.response_field())
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Authentication(format!("Failed to get {}", kind)))?;

    // negative or non-integer expire falls back to the default lifetime
    let ttl = response
        .get("expire")
        .and_then(Value::as_u64)
        .map(|secs| i64::try_from(secs).unwrap_or(i64::MAX))
        .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);

    Ok(Token::new(token.to_owned(), now_i64().saturating_add(ttl)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_an_authentication_error() {
        let err = token_from_response(TokenKind::Tenant, &json!({"code": 10003, "msg": "invalid app_id"})).unwrap_err();
        assert_eq!(err, ApiError::Authentication("Failed to get tenant token".to_owned()));
    }

    #[test]
    fn expire_defaults_to_two_hours() {
        let before = now_i64();
        let token = token_from_response(TokenKind::App, &json!({"app_access_token": "t-1"})).unwrap();
        let after = now_i64();
        assert_eq!(token.value.as_deref(), Some("t-1"));
        assert!(token.expires_at >= before + 7200 && token.expires_at <= after + 7200);
    }

    #[test]
    fn huge_expire_saturates() {
        let token = token_from_response(TokenKind::App, &json!({"app_access_token": "t-1", "expire": i64::MAX})).unwrap();
        assert_eq!(token.expires_at, i64::MAX);
        assert!(token.is_valid());
    }

    #[test]
    fn negative_expire_uses_default_lifetime() {
        let before = now_i64();
        let token = token_from_response(TokenKind::App, &json!({"app_access_token": "t-1", "expire": -5})).unwrap();
        assert!(token.expires_at >= before + 7200);
        assert!(token.is_valid());
    }
}
