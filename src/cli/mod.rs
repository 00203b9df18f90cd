use crate::config::{Config, LLMProvider};
use crate::i18n::TargetLanguage;
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILENAME: &str = "kpi-engine.toml";

/// KPI Achievement Engine - 由Rust与AI驱动的广告KPI诊断与策略生成引擎
#[derive(Parser, Debug)]
#[command(name = "kpi-engine")]
#[command(
    about = "Runs a three-stage AI pipeline (insights, deep research, planning) that diagnoses why an advertising KPI misses its target and produces a tiered action plan."
)]
#[command(version)]
pub struct Args {
    /// KPI目标描述
    pub goal: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 使用内置模拟阶段，不调用模型服务
    #[arg(long)]
    pub simulate: bool,

    /// LLM Provider (openai, deepseek, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 高能效模型，用于洞察与计划阶段
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，用于深度调研阶段
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// 目标指标，例如 ROAS
    #[arg(long)]
    pub target_metric: Option<String>,

    /// 目标指标的期望值
    #[arg(long)]
    pub target_value: Option<f64>,

    /// 分析时间窗口（天）
    #[arg(long)]
    pub timeframe_days: Option<u32>,

    /// 数据仓库项目ID
    #[arg(long)]
    pub project_id: Option<String>,

    /// 数据集ID
    #[arg(long)]
    pub dataset_id: Option<String>,

    /// 广告表名
    #[arg(long)]
    pub table_name: Option<String>,

    /// 目标语言 (zh, en)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 不将运行结果写入磁盘
    #[arg(long)]
    pub no_save: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = if let Some(config_path) = &self.config {
            // 显式指定的配置文件必须可读
            Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?
        } else {
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(DEFAULT_CONFIG_FILENAME);

            if default_config_path.exists() {
                Config::from_file(&default_config_path).with_context(|| {
                    format!("无法读取默认配置文件 {:?}", default_config_path)
                })?
            } else {
                Config::default()
            }
        };

        if let Some(goal) = self.goal {
            if goal.trim().is_empty() {
                return Err(anyhow!("KPI goal must not be empty"));
            }
            config.pipeline.goal = goal;
        }
        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            config.llm.provider = provider_str
                .parse::<LLMProvider>()
                .map_err(|e| anyhow!(e))?;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }

        // 分析参数
        if let Some(target_metric) = self.target_metric {
            config.pipeline.target_metric = target_metric;
        }
        if let Some(target_value) = self.target_value {
            config.pipeline.target_value = target_value;
        }
        if let Some(timeframe_days) = self.timeframe_days {
            config.pipeline.timeframe_days = timeframe_days;
        }

        // 数据仓库
        if let Some(project_id) = self.project_id {
            config.warehouse.project_id = project_id;
        }
        if let Some(dataset_id) = self.dataset_id {
            config.warehouse.dataset_id = dataset_id;
        }
        if let Some(table_name) = self.table_name {
            config.warehouse.table_name = table_name;
        }

        // 目标语言配置
        if let Some(target_language_str) = self.target_language {
            if let Ok(target_language) = target_language_str.parse::<TargetLanguage>() {
                config.target_language = target_language;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的目标语言: {}，使用默认语言 (English)",
                    target_language_str
                );
            }
        }

        config.simulate = config.simulate || self.simulate;
        config.verbose = config.verbose || self.verbose;
        if self.no_save {
            config.save_outputs = false;
        }

        Ok(config)
    }
}

// Include tests
#[cfg(test)]
mod tests;
