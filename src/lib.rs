//! # Feishu Bitable Client Library
//!
//! Talks to the Feishu/Lark open platform: obtains and caches access
//! tokens, resolves user ids and writes or deletes bitable records in
//! vendor-sized chunks.
//!
//! Modules:
//! - `client` — `FeishuClient`, request wrapper, auth, contact and bitable calls
//! - `cache` — per-kind access token cache
//! - `table` — column-typed input tables and their sanitization
//! - `config` — YAML configuration with env expansion
//! - `error` — `ApiError` (validation, authentication, request)

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod table;
pub mod tests;
pub mod utils;

pub use crate::cache::token::TokenKind;
pub use crate::client::bitable::{BatchOperation, RecordItem};
pub use crate::client::{Credentials, FeishuClient};
pub use crate::config::settings::ServiceConfig;
pub use crate::error::{ApiError, ApiResult};
pub use crate::table::{Cell, ColumnKind, Record, Table};
