//! 阶段定义、阶段输出与统一的校验入口

use std::sync::LazyLock;

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Contract, StageRecord};

/// 流水线的三个固定阶段，按执行顺序排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Insights,
    Research,
    Planning,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Insights, Stage::Research, Stage::Planning];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Insights => "insights",
            Stage::Research => "research",
            Stage::Planning => "planning",
        }
    }

    /// 阶段序号，从1开始
    pub fn ordinal(&self) -> usize {
        match self {
            Stage::Insights => 1,
            Stage::Research => 2,
            Stage::Planning => 3,
        }
    }

    /// 下一个阶段，Planning之后没有
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Insights => Some(Stage::Research),
            Stage::Research => Some(Stage::Planning),
            Stage::Planning => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 阶段调用返回的结果
///
/// 由编排器显式归一化，不做运行时能力探测。
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    /// 已通过结构化抽取得到的强类型记录
    Record(StageRecord),
    /// 原始的键值映射
    Mapping(Map<String, Value>),
    /// 期望能解析为 JSON 对象的原始文本
    Text(String),
}

/// 阶段失败的分类
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("stage invocation failed: {0}")]
    Invocation(String),
    #[error("stage result could not be normalized: {0}")]
    Normalization(String),
    #[error("stage payload is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("{contract} contract violated: {reason}")]
    Contract {
        contract: &'static str,
        reason: String,
    },
}

impl StageError {
    /// 写入运行轨迹的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            StageError::Invocation(_) => "invocation",
            StageError::Normalization(_) => "normalization",
            StageError::Parse(_) => "parse",
            StageError::Contract { .. } => "contract",
        }
    }
}

/// 阶段调用能力，编排器只依赖这一接口
///
/// 实现可以是真实的模型调用，也可以是模拟或测试替身。
#[async_trait]
pub trait StageInvoker: Send + Sync {
    async fn invoke(&self, stage: Stage, prompt: &str) -> Result<StageOutput>;
}

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n(.*?)\n?\s*```$").expect("valid code fence regex")
});

/// 严格解析文本载荷，允许外层包裹一个 markdown 代码块
pub fn parse_payload(text: &str) -> Result<Value, StageError> {
    let trimmed = text.trim();
    let body = CODE_FENCE
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);
    serde_json::from_str(body).map_err(StageError::Parse)
}

/// 把阶段输出归一化为契约 `T`，并校验必填字段
pub fn normalize<T: Contract>(output: StageOutput) -> Result<T, StageError> {
    let value = match output {
        StageOutput::Record(record) => {
            if record.contract_name() != T::CONTRACT_NAME {
                return Err(StageError::Normalization(format!(
                    "expected a {} record, got {}",
                    T::CONTRACT_NAME,
                    record.contract_name()
                )));
            }
            record
                .to_value()
                .map_err(|e| StageError::Normalization(e.to_string()))?
        }
        StageOutput::Mapping(map) => Value::Object(map),
        StageOutput::Text(text) => parse_payload(&text)?,
    };

    if !value.is_object() {
        return Err(StageError::Normalization(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    let typed: T = serde_json::from_value(value).map_err(|e| StageError::Contract {
        contract: T::CONTRACT_NAME,
        reason: e.to_string(),
    })?;

    let missing = typed.missing_fields();
    if !missing.is_empty() {
        return Err(StageError::Contract {
            contract: T::CONTRACT_NAME,
            reason: format!("empty required fields: {}", missing.join(", ")),
        });
    }

    Ok(typed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
