use std::fmt;

use crate::helpers::time::now_i64;
use crate::utils::constants::{
    APP_ACCESS_TOKEN_ENDPOINT, TENANT_ACCESS_TOKEN_ENDPOINT, TOKEN_EXPIRY_BUFFER_SECONDS,
};

/// Which access token a cache slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    App,
    Tenant,
}

impl TokenKind {
    pub const ALL: [TokenKind; 2] = [TokenKind::App, TokenKind::Tenant];

    /// Issuance endpoint, relative to the API base url.
    pub fn endpoint(&self) -> &'static str {
        match self {
            TokenKind::App => APP_ACCESS_TOKEN_ENDPOINT,
            TokenKind::Tenant => TENANT_ACCESS_TOKEN_ENDPOINT,
        }
    }

    /// Name of the token field in the issuance response body.
    pub fn response_field(&self) -> &'static str {
        match self {
            TokenKind::App => "app_access_token",
            TokenKind::Tenant => "tenant_access_token",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::App => "app",
            TokenKind::Tenant => "tenant",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} token", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub value: Option<String>,
    pub expires_at: i64, // UNIX TIMESTAMP
}

impl Token {
    pub fn new(value: String, expires_at: i64) -> Self {
        Self { value: Some(value), expires_at }
    }

    /// Usable only while more than the expiry buffer remains before `expires_at`.
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
            && self.expires_at > now.saturating_add(TOKEN_EXPIRY_BUFFER_SECONDS)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_i64())
    }
}
