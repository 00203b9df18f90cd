//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::{Result, anyhow};
use rig::completion::PromptError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::llm::tools::warehouse::WarehouseSqlTool;

mod providers;

use providers::ProviderClient;

/// 模型档位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// 高能效模型
    Efficient,
    /// 高质量模型
    Powerful,
}

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(config)?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// 按档位选择模型名
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Efficient => &self.config.model_efficient,
            ModelTier::Powerful => &self.config.model_powerful,
        }
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 正在检查模型连接...");
        match self
            .prompt(
                ModelTier::Efficient,
                "System: You are a helpful assistant.",
                "Hello",
            )
            .await
        {
            Ok(_) => {
                println!("✅ 模型连接正常");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }

    /// 为单次模型调用加上超时
    async fn with_timeout<T, Fut>(&self, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let limit = Duration::from_secs(self.config.timeout_seconds);
        tokio::time::timeout(limit, operation)
            .await
            .map_err(|_| anyhow!("模型调用超时（{}秒）", self.config.timeout_seconds))?
    }

    /// 数据提取方法，返回符合 `T` 结构的对象
    pub async fn extract<T>(
        &self,
        tier: ModelTier,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let extractor =
            self.client
                .create_extractor::<T>(self.model_for(tier), system_prompt, &self.config)?;

        self.with_timeout(extractor.extract(user_prompt)).await
    }

    /// 简化的单轮对话方法（不使用工具）
    pub async fn prompt(
        &self,
        tier: ModelTier,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String> {
        let agent = self
            .client
            .create_agent(self.model_for(tier), system_prompt, &self.config)?;

        self.with_timeout(agent.prompt(user_prompt)).await
    }

    /// 挂载数据仓库SQL工具的多轮对话，返回模型的最终文本
    pub async fn prompt_with_warehouse(
        &self,
        tier: ModelTier,
        system_prompt: &str,
        user_prompt: &str,
        warehouse: &WarehouseSqlTool,
    ) -> Result<String> {
        let agent = self.client.create_agent_with_warehouse(
            self.model_for(tier),
            system_prompt,
            &self.config,
            warehouse,
        )?;
        let max_turns = self.config.max_tool_turns;

        self.with_timeout(async {
            match agent.multi_turn(user_prompt, max_turns).await {
                Ok(response) => Ok(response),
                Err(PromptError::MaxDepthError { max_depth, .. }) => Err(anyhow!(
                    "Agent因达到最大工具调用轮数({})而未完成任务",
                    max_depth
                )),
                Err(e) => Err(anyhow!("Agent任务执行失败: {}", e)),
            }
        })
        .await
    }
}
