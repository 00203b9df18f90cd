use crate::config::WarehouseConfig;
use crate::llm::client::ModelTier;
use crate::pipeline::agents::{LLMCallMode, PromptTemplate, StageAgent};
use crate::pipeline::stage::Stage;
use crate::types::GapReport;

/// KPI监控专家，输出GapReport
#[derive(Default)]
pub struct InsightsAgent;

impl StageAgent for InsightsAgent {
    type Output = GapReport;

    fn stage(&self) -> Stage {
        Stage::Insights
    }

    fn agent_name(&self) -> &'static str {
        "Insights_Agent"
    }

    fn prompt_template(&self, warehouse: &WarehouseConfig) -> PromptTemplate {
        PromptTemplate {
            system_prompt: format!(
                "You are a KPI Monitoring Specialist. Your role is to calculate current performance metrics from the BigQuery data ({}) and compare them to the user's target KPI.\n\
                1. **Prioritize Schema:** Use your BigQuery tools to understand the schema first, as an expert data analyst.\n\
                2. **Identify Gap:** Identify the top 3 dimensions (e.g., Campaign ID, Geo, Device) driving the largest negative deviation from the target.",
                warehouse.fully_qualified_table()
            ),
            closing_instruction: "Output your findings **strictly** as a JSON object matching the GapReport structure. Do NOT output any other text or reasoning.".to_string(),
            llm_call_mode: LLMCallMode::PromptWithTools,
            model_tier: ModelTier::Efficient,
        }
    }
}
