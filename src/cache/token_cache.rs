use std::future::Future;

use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::token::{Token, TokenKind};
use crate::error::ApiResult;

/// Two fixed slots, one per [`TokenKind`].
///
/// Each slot has its own lock, held for the whole check-and-refresh so that
/// concurrent callers of the same kind wait for one refresh instead of
/// issuing their own.
#[derive(Debug, Default)]
pub struct TokenCache {
    app: Mutex<Token>,
    tenant: Mutex<Token>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: TokenKind) -> &Mutex<Token> {
        match kind {
            TokenKind::App => &self.app,
            TokenKind::Tenant => &self.tenant,
        }
    }

    /// Cached token value if it is still valid
    pub async fn get(&self, kind: TokenKind) -> Option<String> {
        let token = self.slot(kind).lock().await;
        token.is_valid().then(|| token.value.clone()).flatten()
    }

    pub async fn set(&self, kind: TokenKind, token: Token) {
        *self.slot(kind).lock().await = token;
    }

    /// Raw entry, valid or not.
    pub async fn snapshot(&self, kind: TokenKind) -> Token {
        self.slot(kind).lock().await.clone()
    }

    pub async fn invalidate(&self, kind: TokenKind) {
        *self.slot(kind).lock().await = Token::default();
    }

    /// Return the cached token or run `refresh` and store its result.
    ///
    /// A failed refresh leaves the previous entry untouched.
    pub async fn get_or_refresh<F, Fut>(&self, kind: TokenKind, refresh: F) -> ApiResult<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<Token>>,
    {
        let mut slot = self.slot(kind).lock().await;
        if slot.is_valid() {
            if let Some(value) = slot.value.clone() {
                debug!("{} served from cache", kind);
                return Ok(value);
            }
        }

        let token = refresh().await?;
        let value = token.value.clone().unwrap_or_default();
        *slot = token;
        Ok(value)
    }
}
