//! Bitable record operations.
//!
//! Every batch call sanitizes its table, cuts the rows into consecutive
//! chunks and sends one request per chunk in order. Chunks that succeeded
//! before a failing one stay applied on the server; nothing is rolled back.

use http::Method;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::client::FeishuClient;
use crate::error::{ApiError, ApiResult};
use crate::observability::metrics::get_metrics;
use crate::table::{Cell, Table};
use crate::utils::constants::{DEFAULT_CHUNK_SIZE, LIST_RECORDS_PAGE_SIZE, RECORD_ID_FIELD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOperation {
    Create,
    Delete,
}

impl BatchOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchOperation::Create => "batch_create",
            BatchOperation::Delete => "batch_delete",
        }
    }
}

/// A stored record as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RecordItem {
    pub record_id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Deserialize, Default)]
struct ListRecordsResponse {
    #[serde(default)]
    data: Option<ListRecordsData>,
}

#[derive(Debug, Deserialize, Default)]
struct ListRecordsData {
    #[serde(default)]
    items: Option<Vec<RecordItem>>,
}

fn records_endpoint(app_token: &str, table_id: &str) -> ApiResult<String> {
    if app_token.is_empty() || table_id.is_empty() {
        return Err(ApiError::validation("app_token and table_id must be provided"));
    }
    Ok(format!("/bitable/v1/apps/{}/tables/{}/records", app_token, table_id))
}

impl FeishuClient {
    /// Insert exactly one row.
    pub async fn insert_data_to_table(&self, app_token: &str, table_id: &str, data: &Table) -> ApiResult<Value> {
        if data.len() != 1 {
            return Err(ApiError::validation("Table must contain exactly one row"));
        }
        self.batch_operation(app_token, table_id, data, BatchOperation::Create, DEFAULT_CHUNK_SIZE)
            .await?
            .pop()
            .ok_or_else(|| ApiError::request("No response for inserted record"))
    }

    pub async fn insert_multi_data_to_table(
        &self,
        app_token: &str,
        table_id: &str,
        data: &Table,
        chunk_size: usize,
    ) -> ApiResult<Vec<Value>> {
        self.batch_operation(app_token, table_id, data, BatchOperation::Create, chunk_size)
            .await
    }

    pub async fn delete_records<S: AsRef<str>>(
        &self,
        app_token: &str,
        table_id: &str,
        record_ids: &[S],
    ) -> ApiResult<Vec<Value>> {
        let data = Table::from_record_ids(record_ids);
        self.batch_operation(app_token, table_id, &data, BatchOperation::Delete, self.config.chunk_size)
            .await
    }

    /// First page of records (up to 500). Further pages are not followed.
    pub async fn list_records(&self, app_token: &str, table_id: &str) -> ApiResult<Vec<RecordItem>> {
        let endpoint = format!(
            "{}?page_size={}",
            records_endpoint(app_token, table_id)?,
            LIST_RECORDS_PAGE_SIZE
        );
        let token = self.app_access_token().await?;
        let response = self.request(Method::GET, &endpoint, None, Some(&token)).await?;

        let parsed: ListRecordsResponse = serde_json::from_value(response)
            .map_err(|_| ApiError::request("Invalid JSON response"))?;
        Ok(parsed.data.unwrap_or_default().items.unwrap_or_default())
    }

    pub async fn get_record_ids(&self, app_token: &str, table_id: &str) -> ApiResult<Vec<String>> {
        Ok(self
            .list_records(app_token, table_id)
            .await?
            .into_iter()
            .map(|item| item.record_id)
            .collect())
    }

    pub async fn delete_all_records(&self, app_token: &str, table_id: &str) -> ApiResult<Vec<Value>> {
        let record_ids = self.get_record_ids(app_token, table_id).await?;
        if record_ids.is_empty() {
            info!(table_id, "table has no records to delete");
            return Ok(Vec::new());
        }
        self.delete_records(app_token, table_id, record_ids.as_slice()).await
    }

    /// Send `data` in chunks of at most `chunk_size` rows, one request each.
    ///
    /// Returns the per-chunk responses in chunk order.
    pub async fn batch_operation(
        &self,
        app_token: &str,
        table_id: &str,
        data: &Table,
        operation: BatchOperation,
        chunk_size: usize,
    ) -> ApiResult<Vec<Value>> {
        if chunk_size == 0 {
            return Err(ApiError::validation("chunk_size must be greater than zero"));
        }
        let endpoint = format!("{}/{}", records_endpoint(app_token, table_id)?, operation.as_str());

        let data = data.sanitize();
        let payloads = match operation {
            BatchOperation::Create => data
                .to_records()
                .into_iter()
                .map(|fields| json!({ "fields": fields }))
                .collect::<Vec<_>>(),
            BatchOperation::Delete => record_ids(&data)?,
        };

        let metrics = get_metrics().await;
        let total = payloads.len();
        let mut results = Vec::with_capacity(total.div_ceil(chunk_size));
        let mut processed = 0;

        for chunk in payloads.chunks(chunk_size) {
            let token = self.app_access_token().await?;
            let body = json!({ "records": chunk });
            let response = self
                .request(Method::POST, &endpoint, Some(&body), Some(&token))
                .await?;
            results.push(response);

            processed += chunk.len();
            metrics.batch_chunks.with_label_values(&[operation.as_str()]).inc();
            metrics
                .batch_records
                .with_label_values(&[operation.as_str()])
                .inc_by(chunk.len() as u64);
            info!("Processed {}/{} records", processed, total);
        }

        Ok(results)
    }
}

fn record_ids(data: &Table) -> ApiResult<Vec<Value>> {
    let column = data.column(RECORD_ID_FIELD).ok_or_else(|| {
        ApiError::validation(format!("delete requires a '{}' column", RECORD_ID_FIELD))
    })?;

    column
        .values
        .iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            Cell::Text(id) if !id.is_empty() => Ok(Value::String(id.to_owned())),
            _ => Err(ApiError::validation(format!("row {} has no record id", row))),
        })
        .collect()
}
