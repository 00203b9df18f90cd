use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::i18n::TargetLanguage;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    #[default]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 数据仓库写入模式
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// 只允许 SELECT / WITH 查询
    #[default]
    Blocked,
    Allowed,
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 报告语言
    pub target_language: TargetLanguage,

    /// 运行轨迹与报告的输出目录
    pub output_path: PathBuf,

    /// 是否把运行轨迹与报告写入磁盘
    pub save_outputs: bool,

    /// 使用内置的模拟阶段而不调用模型服务
    pub simulate: bool,

    /// 是否启用详细日志
    pub verbose: bool,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 数据仓库配置
    pub warehouse: WarehouseConfig,

    /// 流水线分析参数
    pub pipeline: PipelineConfig,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址，为空时使用各provider自带的默认地址
    pub api_base_url: String,

    /// 高能效模型，用于Insights与Planning阶段
    pub model_efficient: String,

    /// 高质量模型，用于Research阶段的因果分析
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 单次模型调用的超时时间（秒）
    pub timeout_seconds: u64,

    /// 工具调用的最大轮数
    pub max_tool_turns: usize,
}

/// 数据仓库（BigQuery）配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct WarehouseConfig {
    /// GCP项目ID
    pub project_id: String,

    pub dataset_id: String,

    pub table_name: String,

    /// OAuth访问令牌，为空时不向模型提供SQL工具
    pub access_token: String,

    pub api_base_url: String,

    /// 上报给数据仓库的应用名
    pub application_name: String,

    /// 单次查询返回的最大行数
    pub max_rows: u32,

    /// 查询超时（毫秒）
    pub query_timeout_ms: u64,

    pub write_mode: WriteMode,
}

/// 流水线分析参数
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// KPI目标
    pub goal: String,

    /// 目标指标
    pub target_metric: String,

    /// 目标指标的目标值
    pub target_value: f64,

    /// 分析时间窗口（天）
    pub timeframe_days: u32,

    /// 单个阶段的超时时间（秒），为空表示一直等待
    pub stage_timeout_seconds: Option<u64>,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 是否需要回退到模拟阶段
    pub fn should_simulate(&self) -> bool {
        self.simulate || (self.llm.provider != LLMProvider::Ollama && self.llm.api_key.is_empty())
    }
}

impl LLMConfig {
    /// 显式配置的API基地址
    pub fn api_base_url_override(&self) -> Option<&str> {
        let url = self.api_base_url.trim();
        (!url.is_empty()).then_some(url)
    }
}

impl WarehouseConfig {
    /// 完整限定的表名，形如 `project.dataset.table`
    pub fn fully_qualified_table(&self) -> String {
        format!(
            "`{}.{}.{}`",
            self.project_id, self.dataset_id, self.table_name
        )
    }

    /// 是否可以向模型提供SQL工具
    pub fn is_enabled(&self) -> bool {
        !self.access_token.trim().is_empty() && !self.project_id.trim().is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: TargetLanguage::default(),
            output_path: PathBuf::from("./kpi-engine.out"),
            save_outputs: true,
            simulate: false,
            verbose: false,
            llm: LLMConfig::default(),
            warehouse: WarehouseConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("KPI_ENGINE_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::new(),
            model_efficient: String::from("gemini-2.5-flash"),
            model_powerful: String::from("gemini-2.5-pro"),
            max_tokens: 8192,
            temperature: 0.1,
            timeout_seconds: 300,
            max_tool_turns: 8,
        }
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            project_id: std::env::var("GCP_PROJECT_ID")
                .unwrap_or_else(|_| String::from("your-gcp-project-id")),
            dataset_id: String::from("google_ads_data"),
            table_name: String::from("ads_performance"),
            access_token: std::env::var("KPI_ENGINE_WAREHOUSE_TOKEN").unwrap_or_default(),
            api_base_url: String::from("https://bigquery.googleapis.com/bigquery/v2"),
            application_name: String::from("kpi-ads-research-engine"),
            max_rows: 100,
            query_timeout_ms: 30_000,
            write_mode: WriteMode::default(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            goal: String::from(
                "I need to increase our quarter-over-quarter ROAS by 20% in the next 30 days for our US campaigns.",
            ),
            target_metric: String::from("ROAS"),
            target_value: 4.5,
            timeframe_days: 30,
            stage_timeout_seconds: None,
        }
    }
}
