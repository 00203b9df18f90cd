//! 三个阶段智能体的角色定义
//!
//! L1 InsightsAgent  计算当前指标并定位差距最大的广告系列 = 初始提示词 + 数据仓库
//! L2 ResearchAgent  用SQL验证假设，找到根因 = GapReport + 数据仓库
//! L3 PlanningAgent  把根因转成三档行动计划 = ResearchSummary

use crate::config::WarehouseConfig;
use crate::llm::client::ModelTier;
use crate::pipeline::stage::Stage;
use crate::types::Contract;

pub mod insights;
pub mod planning;
pub mod research;

pub use insights::InsightsAgent;
pub use planning::PlanningAgent;
pub use research::ResearchAgent;

/// LLM调用方式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LLMCallMode {
    /// 使用extract方法，返回特定要求的结构化数据
    Extract,
    /// 挂载数据仓库工具多轮对话，最终返回JSON文本
    PromptWithTools,
}

/// Prompt模板配置
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// 角色与任务说明
    pub system_prompt: String,
    /// 结尾的强调性指令
    pub closing_instruction: String,
    /// LLM调用方式
    pub llm_call_mode: LLMCallMode,
    pub model_tier: ModelTier,
}

/// 阶段智能体：声明角色、输出契约和调用方式
pub trait StageAgent: Send + Sync {
    /// 输出契约
    type Output: Contract;

    fn stage(&self) -> Stage;

    /// 智能体名称，用于日志
    fn agent_name(&self) -> &'static str;

    fn prompt_template(&self, warehouse: &WarehouseConfig) -> PromptTemplate;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warehouse() -> WarehouseConfig {
        WarehouseConfig {
            project_id: "acme-ads".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_agents_cover_stages_in_order() {
        assert_eq!(InsightsAgent.stage(), Stage::Insights);
        assert_eq!(ResearchAgent.stage(), Stage::Research);
        assert_eq!(PlanningAgent.stage(), Stage::Planning);
    }

    #[test]
    fn test_warehouse_agents_reference_qualified_table() {
        let table = "`acme-ads.google_ads_data.ads_performance`";
        assert!(InsightsAgent.prompt_template(&warehouse()).system_prompt.contains(table));
        assert!(ResearchAgent.prompt_template(&warehouse()).system_prompt.contains(table));
    }

    #[test]
    fn test_call_modes_and_model_tiers() {
        let insights = InsightsAgent.prompt_template(&warehouse());
        let research = ResearchAgent.prompt_template(&warehouse());
        let planning = PlanningAgent.prompt_template(&warehouse());

        assert_eq!(insights.llm_call_mode, LLMCallMode::PromptWithTools);
        assert_eq!(research.llm_call_mode, LLMCallMode::PromptWithTools);
        assert_eq!(planning.llm_call_mode, LLMCallMode::Extract);
        assert_eq!(research.model_tier, ModelTier::Powerful);
        assert_eq!(planning.model_tier, ModelTier::Efficient);
    }

    #[test]
    fn test_planning_prompt_names_all_tiers() {
        let planning = PlanningAgent.prompt_template(&warehouse());
        for tier in ["QUICK WINS", "MEDIUM EFFORT", "HIGH EFFORT"] {
            assert!(planning.system_prompt.contains(tier));
        }
    }
}
