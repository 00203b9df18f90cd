//! 数据仓库SQL查询工具

use std::collections::HashMap;

use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::{WarehouseConfig, WriteMode};

/// 在 BigQuery 上执行模型生成的SQL
#[derive(Debug, Clone)]
pub struct WarehouseSqlTool {
    config: WarehouseConfig,
    http: reqwest::Client,
}

/// 工具参数
#[derive(Debug, Deserialize)]
pub struct SqlArgs {
    pub query: String,
}

/// 查询结果，行以列名为键
#[derive(Debug, Serialize, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub total_rows: u64,
    pub truncated: bool,
    pub job_complete: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum WarehouseToolError {
    #[error("query rejected: {0}")]
    Rejected(String),
    #[error("warehouse request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("warehouse returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    schema: Option<TableSchema>,
    #[serde(default)]
    rows: Vec<TableRow>,
    total_rows: Option<String>,
    #[serde(default)]
    job_complete: bool,
}

#[derive(Debug, Deserialize)]
struct TableSchema {
    #[serde(default)]
    fields: Vec<TableField>,
}

#[derive(Debug, Deserialize)]
struct TableField {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(default)]
    f: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
struct TableCell {
    #[serde(default)]
    v: Value,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl WarehouseSqlTool {
    pub fn new(config: WarehouseConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn description(&self) -> String {
        format!(
            "Tool used exclusively for deep quantitative analysis on Google Ads performance data in BigQuery. \
            The model must generate a SQL query on a single line that leverages analytical functions (e.g., joins, window functions) to test causality. \
            IMPORTANT: Always use the fully qualified dataset and table name: {} to ensure execution succeeds.",
            self.config.fully_qualified_table()
        )
    }

    async fn run_query(&self, query: &str) -> Result<QueryResult, WarehouseToolError> {
        ensure_query_allowed(query, self.config.write_mode)?;

        let url = format!(
            "{}/projects/{}/queries",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.project_id
        );
        let body = serde_json::json!({
            "query": query,
            "useLegacySql": false,
            "maxResults": self.config.max_rows,
            "timeoutMs": self.config.query_timeout_ms,
            "labels": HashMap::from([("application", self.config.application_name.as_str())]),
        });

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(WarehouseToolError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: QueryResponse = response.json().await?;
        Ok(QueryResult::from_response(parsed, self.config.max_rows as usize))
    }
}

impl QueryResult {
    fn from_response(response: QueryResponse, max_rows: usize) -> Self {
        let columns: Vec<String> = response
            .schema
            .map(|schema| schema.fields.into_iter().map(|f| f.name).collect())
            .unwrap_or_default();

        let total_rows = response
            .total_rows
            .and_then(|t| t.parse::<u64>().ok())
            .unwrap_or(response.rows.len() as u64);

        let rows: Vec<Map<String, Value>> = response
            .rows
            .into_iter()
            .take(max_rows)
            .map(|row| {
                columns
                    .iter()
                    .cloned()
                    .zip(row.f.into_iter().map(|cell| cell.v))
                    .collect()
            })
            .collect();

        Self {
            truncated: (rows.len() as u64) < total_rows,
            columns,
            rows,
            total_rows,
            job_complete: response.job_complete,
        }
    }
}

/// 写入模式为 Blocked 时只放行只读查询
pub fn ensure_query_allowed(query: &str, mode: WriteMode) -> Result<(), WarehouseToolError> {
    let normalized = query.trim_start().to_lowercase();
    if normalized.is_empty() {
        return Err(WarehouseToolError::Rejected("empty query".to_string()));
    }
    if mode == WriteMode::Blocked {
        if !(normalized.starts_with("select") || normalized.starts_with("with")) {
            return Err(WarehouseToolError::Rejected(
                "only SELECT / WITH queries are allowed in blocked write mode".to_string(),
            ));
        }
        if has_multiple_statements(query) {
            return Err(WarehouseToolError::Rejected(
                "multi-statement scripts are not allowed in blocked write mode".to_string(),
            ));
        }
    }
    Ok(())
}

/// 字符串字面量和反引号标识符之外出现 `;` 且其后仍有内容，即视为脚本
fn has_multiple_statements(query: &str) -> bool {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in query.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            ';' if !query[idx + 1..].trim().is_empty() => return true,
            _ => {}
        }
    }
    false
}

impl Tool for WarehouseSqlTool {
    const NAME: &'static str = "execute_bigquery_sql";

    type Error = WarehouseToolError;
    type Args = SqlArgs;
    type Output = QueryResult;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: self.description(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The complete, single-line SQL query to execute against BigQuery."
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        tracing::info!(query = %args.query, "🔧 tool called...{}", Self::NAME);

        let result = self.run_query(&args.query).await;
        if let Err(e) = &result {
            tracing::warn!("warehouse query failed: {}", e);
        }
        result
    }
}
