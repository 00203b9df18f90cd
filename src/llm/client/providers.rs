//! LLM Provider支持模块

use anyhow::Result;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::{Prompt, PromptError},
    extractor::Extractor,
    providers::gemini::completion::gemini_api_types::{AdditionalParameters, GenerationConfig},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    config::{LLMConfig, LLMProvider},
    llm::tools::warehouse::WarehouseSqlTool,
};

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    DeepSeek(rig::providers::deepseek::Client),
    Anthropic(rig::providers::anthropic::Client),
    Gemini(rig::providers::gemini::Client),
    Ollama(rig::providers::ollama::Client),
}

fn gemini_params() -> Result<serde_json::Value> {
    let gen_cfg = GenerationConfig::default();
    let cfg = AdditionalParameters::default().with_config(gen_cfg);
    Ok(serde_json::to_value(cfg)?)
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let base_url = config.api_base_url_override();
        match config.provider {
            LLMProvider::OpenAI => {
                let mut builder = rig::providers::openai::Client::builder(&config.api_key);
                if let Some(url) = base_url {
                    builder = builder.base_url(url);
                }
                Ok(ProviderClient::OpenAI(builder.build()))
            }
            LLMProvider::DeepSeek => {
                let mut builder = rig::providers::deepseek::Client::builder(&config.api_key);
                if let Some(url) = base_url {
                    builder = builder.base_url(url);
                }
                Ok(ProviderClient::DeepSeek(builder.build()))
            }
            LLMProvider::Anthropic => {
                let mut builder = rig::providers::anthropic::ClientBuilder::new(&config.api_key);
                if let Some(url) = base_url {
                    builder = builder.base_url(url);
                }
                Ok(ProviderClient::Anthropic(builder.build()?))
            }
            LLMProvider::Gemini => {
                let mut builder = rig::providers::gemini::Client::builder(&config.api_key);
                if let Some(url) = base_url {
                    builder = builder.base_url(url);
                }
                Ok(ProviderClient::Gemini(builder.build()?))
            }
            LLMProvider::Ollama => {
                let mut builder = rig::providers::ollama::Client::builder();
                if let Some(url) = base_url {
                    builder = builder.base_url(url);
                }
                Ok(ProviderClient::Ollama(builder.build()))
            }
        }
    }

    /// 创建不带工具的Agent
    pub fn create_agent(
        &self,
        model: &str,
        system_prompt: &str,
        config: &LLMConfig,
    ) -> Result<ProviderAgent> {
        let agent = match self {
            ProviderClient::OpenAI(client) => ProviderAgent::OpenAI(
                client
                    .completion_model(model)
                    .completions_api()
                    .into_agent_builder()
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .build(),
            ),
            ProviderClient::DeepSeek(client) => ProviderAgent::DeepSeek(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .build(),
            ),
            ProviderClient::Anthropic(client) => ProviderAgent::Anthropic(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .build(),
            ),
            ProviderClient::Gemini(client) => ProviderAgent::Gemini(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .additional_params(gemini_params()?)
                    .build(),
            ),
            ProviderClient::Ollama(client) => ProviderAgent::Ollama(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .build(),
            ),
        };
        Ok(agent)
    }

    /// 创建挂载数据仓库SQL工具的Agent
    pub fn create_agent_with_warehouse(
        &self,
        model: &str,
        system_prompt: &str,
        config: &LLMConfig,
        warehouse: &WarehouseSqlTool,
    ) -> Result<ProviderAgent> {
        let agent = match self {
            ProviderClient::OpenAI(client) => ProviderAgent::OpenAI(
                client
                    .completion_model(model)
                    .completions_api()
                    .into_agent_builder()
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .tool(warehouse.clone())
                    .build(),
            ),
            ProviderClient::DeepSeek(client) => ProviderAgent::DeepSeek(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .tool(warehouse.clone())
                    .build(),
            ),
            ProviderClient::Anthropic(client) => ProviderAgent::Anthropic(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .tool(warehouse.clone())
                    .build(),
            ),
            ProviderClient::Gemini(client) => ProviderAgent::Gemini(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .tool(warehouse.clone())
                    .additional_params(gemini_params()?)
                    .build(),
            ),
            ProviderClient::Ollama(client) => ProviderAgent::Ollama(
                client
                    .agent(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .temperature(config.temperature)
                    .tool(warehouse.clone())
                    .build(),
            ),
        };
        Ok(agent)
    }

    /// 创建Extractor
    pub fn create_extractor<T>(
        &self,
        model: &str,
        system_prompt: &str,
        config: &LLMConfig,
    ) -> Result<ProviderExtractor<T>>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let extractor = match self {
            ProviderClient::OpenAI(client) => ProviderExtractor::OpenAI(
                client
                    .extractor_completions_api::<T>(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .build(),
            ),
            ProviderClient::DeepSeek(client) => ProviderExtractor::DeepSeek(
                client
                    .extractor::<T>(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .build(),
            ),
            ProviderClient::Anthropic(client) => ProviderExtractor::Anthropic(
                client
                    .extractor::<T>(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .build(),
            ),
            ProviderClient::Gemini(client) => ProviderExtractor::Gemini(
                client
                    .extractor::<T>(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .additional_params(gemini_params()?)
                    .build(),
            ),
            ProviderClient::Ollama(client) => ProviderExtractor::Ollama(
                client
                    .extractor::<T>(model)
                    .preamble(system_prompt)
                    .max_tokens(config.max_tokens.into())
                    .build(),
            ),
        };
        Ok(extractor)
    }
}

/// 统一的Agent枚举
pub enum ProviderAgent {
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    DeepSeek(Agent<rig::providers::deepseek::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    Gemini(Agent<rig::providers::gemini::completion::CompletionModel>),
    Ollama(Agent<rig::providers::ollama::CompletionModel<reqwest::Client>>),
}

impl ProviderAgent {
    /// 执行单轮prompt
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        match self {
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::DeepSeek(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Anthropic(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Gemini(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Ollama(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
        }
    }

    /// 执行多轮对话，允许模型在给出最终答案前调用工具
    pub async fn multi_turn(
        &self,
        prompt: &str,
        max_turns: usize,
    ) -> Result<String, PromptError> {
        match self {
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).multi_turn(max_turns).await,
            ProviderAgent::DeepSeek(agent) => agent.prompt(prompt).multi_turn(max_turns).await,
            ProviderAgent::Anthropic(agent) => agent.prompt(prompt).multi_turn(max_turns).await,
            ProviderAgent::Gemini(agent) => agent.prompt(prompt).multi_turn(max_turns).await,
            ProviderAgent::Ollama(agent) => agent.prompt(prompt).multi_turn(max_turns).await,
        }
    }
}

/// 统一的Extractor枚举
pub enum ProviderExtractor<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    OpenAI(Extractor<rig::providers::openai::CompletionModel, T>),
    DeepSeek(Extractor<rig::providers::deepseek::CompletionModel, T>),
    Anthropic(Extractor<rig::providers::anthropic::completion::CompletionModel, T>),
    Gemini(Extractor<rig::providers::gemini::completion::CompletionModel, T>),
    Ollama(Extractor<rig::providers::ollama::CompletionModel<reqwest::Client>, T>),
}

impl<T> ProviderExtractor<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    /// 执行提取
    pub async fn extract(&self, prompt: &str) -> Result<T> {
        match self {
            ProviderExtractor::OpenAI(extractor) => {
                extractor.extract(prompt).await.map_err(|e| e.into())
            }
            ProviderExtractor::DeepSeek(extractor) => {
                extractor.extract(prompt).await.map_err(|e| e.into())
            }
            ProviderExtractor::Anthropic(extractor) => {
                extractor.extract(prompt).await.map_err(|e| e.into())
            }
            ProviderExtractor::Gemini(extractor) => {
                extractor.extract(prompt).await.map_err(|e| e.into())
            }
            ProviderExtractor::Ollama(extractor) => {
                extractor.extract(prompt).await.map_err(|e| e.into())
            }
        }
    }
}
