use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::pipeline::agents::{
    InsightsAgent, LLMCallMode, PlanningAgent, ResearchAgent, StageAgent,
};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::stage::{Stage, StageInvoker, StageOutput};

/// 由真实模型服务驱动的阶段调用器
pub struct AgentStageInvoker {
    context: PipelineContext,
}

impl AgentStageInvoker {
    pub fn new(context: PipelineContext) -> Self {
        Self { context }
    }

    /// 组装系统提示词：角色 + 输出契约 + 语言要求
    fn build_system_prompt<A: StageAgent>(&self, agent: &A, with_schema: bool) -> Result<String> {
        let template = agent.prompt_template(&self.context.config.warehouse);
        let mut prompt = template.system_prompt;

        if with_schema {
            let schema = schemars::schema_for!(A::Output);
            prompt.push_str(&format!(
                "\n\nThe output must validate against this JSON schema:\n{}",
                serde_json::to_string_pretty(&schema)?
            ));
        }

        prompt.push_str("\n\n");
        prompt.push_str(&template.closing_instruction);
        prompt.push_str("\n\n");
        prompt.push_str(self.context.config.target_language.prompt_instruction());
        Ok(prompt)
    }

    async fn execute_agent<A: StageAgent>(
        &self,
        agent: &A,
        stage: Stage,
        prompt: &str,
    ) -> Result<StageOutput> {
        if agent.stage() != stage {
            bail!(
                "{} serves stage {}, not {}",
                agent.agent_name(),
                agent.stage(),
                stage
            );
        }

        let template = agent.prompt_template(&self.context.config.warehouse);
        let client = &self.context.llm_client;

        let warehouse = match template.llm_call_mode {
            LLMCallMode::PromptWithTools => self.context.warehouse_tool.as_ref(),
            LLMCallMode::Extract => None,
        };

        match warehouse {
            Some(tool) => {
                tracing::info!(
                    agent = agent.agent_name(),
                    "prompting with warehouse tool on {}",
                    client.model_for(template.model_tier)
                );
                let system_prompt = self.build_system_prompt(agent, true)?;
                let text = client
                    .prompt_with_warehouse(template.model_tier, &system_prompt, prompt, tool)
                    .await?;
                Ok(StageOutput::Text(text))
            }
            None => {
                if template.llm_call_mode == LLMCallMode::PromptWithTools {
                    tracing::warn!(
                        agent = agent.agent_name(),
                        "warehouse access token not configured, extracting without SQL tool"
                    );
                }
                let system_prompt = self.build_system_prompt(agent, false)?;
                let record: A::Output = client
                    .extract(template.model_tier, &system_prompt, prompt)
                    .await?;
                Ok(StageOutput::Record(record.into()))
            }
        }
    }
}

#[async_trait]
impl StageInvoker for AgentStageInvoker {
    async fn invoke(&self, stage: Stage, prompt: &str) -> Result<StageOutput> {
        match stage {
            Stage::Insights => self.execute_agent(&InsightsAgent, stage, prompt).await,
            Stage::Research => self.execute_agent(&ResearchAgent, stage, prompt).await,
            Stage::Planning => self.execute_agent(&PlanningAgent, stage, prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LLMProvider};
    use crate::i18n::TargetLanguage;

    fn invoker(language: TargetLanguage) -> AgentStageInvoker {
        let mut config = Config::default();
        config.llm.provider = LLMProvider::Ollama;
        config.target_language = language;
        config.warehouse.project_id = "acme-ads".to_string();
        config.warehouse.access_token = String::new();
        AgentStageInvoker::new(PipelineContext::new(config).unwrap())
    }

    #[test]
    fn test_system_prompt_includes_schema_when_requested() {
        let invoker = invoker(TargetLanguage::English);

        let prompt = invoker.build_system_prompt(&InsightsAgent, true).unwrap();

        assert!(prompt.contains("KPI Monitoring Specialist"));
        assert!(prompt.contains("\"campaign_id\""));
        assert!(prompt.contains("\"hypotheses\""));
        assert!(prompt.ends_with(TargetLanguage::English.prompt_instruction()));
    }

    #[test]
    fn test_system_prompt_without_schema() {
        let invoker = invoker(TargetLanguage::Chinese);

        let prompt = invoker.build_system_prompt(&PlanningAgent, false).unwrap();

        assert!(!prompt.contains("JSON schema"));
        assert!(prompt.contains("estimated_timeline"));
        assert!(prompt.ends_with(TargetLanguage::Chinese.prompt_instruction()));
    }

    #[tokio::test]
    async fn test_agent_must_match_stage() {
        let invoker = invoker(TargetLanguage::English);

        let err = invoker
            .execute_agent(&PlanningAgent, Stage::Insights, "{}")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Planning_Agent serves stage planning"));
    }

    #[test]
    fn test_context_without_token_has_no_warehouse_tool() {
        let invoker = invoker(TargetLanguage::English);
        assert!(invoker.context.warehouse_tool.is_none());
    }
}
