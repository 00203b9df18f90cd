use crate::config::WarehouseConfig;
use crate::llm::client::ModelTier;
use crate::pipeline::agents::{LLMCallMode, PromptTemplate, StageAgent};
use crate::pipeline::stage::Stage;
use crate::types::ResearchSummary;

/// 因果数据研究专家，输入GapReport，输出ResearchSummary
#[derive(Default)]
pub struct ResearchAgent;

impl StageAgent for ResearchAgent {
    type Output = ResearchSummary;

    fn stage(&self) -> Stage {
        Stage::Research
    }

    fn agent_name(&self) -> &'static str {
        "Deep_Research_Agent"
    }

    fn prompt_template(&self, warehouse: &WarehouseConfig) -> PromptTemplate {
        PromptTemplate {
            system_prompt: format!(
                "You are a Causal Data Research Specialist. Your input is a GapReport (JSON task card) from the Insights Agent.\n\
                1. **Generate SQL:** Use the 'execute_bigquery_sql' tool and the hypotheses to generate and execute precise SQL queries to retrieve quantitative evidence.\n\
                2. **Hypothesis Test:** Test the hypotheses by generating complex BigQuery SQL (using window functions, joins, etc., and always using the fully qualified table name: {}).\n\
                3. **Synthesize:** Compile the evidence (SQL results, causal links) into a comprehensive ResearchSummary for the Planning Agent.",
                warehouse.fully_qualified_table()
            ),
            closing_instruction: "Output the ResearchSummary strictly as a single JSON object, quoting the decisive query results in supporting_data.".to_string(),
            llm_call_mode: LLMCallMode::PromptWithTools,
            model_tier: ModelTier::Powerful,
        }
    }
}
