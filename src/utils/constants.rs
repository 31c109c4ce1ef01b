//! Shared constants and invariants

pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn/open-apis";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// token lifetime handling
pub const TOKEN_EXPIRY_BUFFER_SECONDS: i64 = 300;
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 7200;

// vendor per-request record limit
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const LIST_RECORDS_PAGE_SIZE: usize = 500;

// endpoints
pub const APP_ACCESS_TOKEN_ENDPOINT: &str = "/auth/v3/app_access_token/internal";
pub const TENANT_ACCESS_TOKEN_ENDPOINT: &str = "/auth/v3/tenant_access_token/internal";
pub const USER_BATCH_GET_ID_ENDPOINT: &str = "/contact/v3/users/batch_get_id";

pub const RECORD_ID_FIELD: &str = "record_id";
