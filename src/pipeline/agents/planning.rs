use crate::config::WarehouseConfig;
use crate::llm::client::ModelTier;
use crate::pipeline::agents::{LLMCallMode, PromptTemplate, StageAgent};
use crate::pipeline::stage::Stage;
use crate::types::Plan;

/// 战略规划专家，输入ResearchSummary，输出三档行动计划
#[derive(Default)]
pub struct PlanningAgent;

impl StageAgent for PlanningAgent {
    type Output = Plan;

    fn stage(&self) -> Stage {
        Stage::Planning
    }

    fn agent_name(&self) -> &'static str {
        "Planning_Agent"
    }

    fn prompt_template(&self, _warehouse: &WarehouseConfig) -> PromptTemplate {
        PromptTemplate {
            system_prompt: "You are a Strategic Planning Expert. Your input is the ResearchSummary (data evidence) from the Deep Research Agent.\n\
                Your sole task is to synthesize the confirmed root cause and supporting data into an actionable strategy report containing three prioritized categories of recommendations:\n\
                1. **QUICK WINS** (Low Effort, Immediate Impact)\n\
                2. **MEDIUM EFFORT** (Moderate Effort, Significant Impact)\n\
                3. **HIGH EFFORT** (High Effort, Transformational Impact)\n\
                Each recommendation should include a title, detailed description, effort_level, expected_impact, and implementation_steps."
                .to_string(),
            closing_instruction: "Also provide overall_strategy and estimated_timeline. The final output must be a single JSON object with no other text.".to_string(),
            llm_call_mode: LLMCallMode::Extract,
            model_tier: ModelTier::Efficient,
        }
    }
}
