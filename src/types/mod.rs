//! 阶段之间交换的结构化契约

use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};

pub mod anomaly;
pub mod plan;
pub mod research;

pub use anomaly::GapReport;
pub use plan::{Plan, Recommendation, RecommendationTier};
pub use research::ResearchSummary;

/// 任一阶段产出的强类型记录
#[derive(Debug, Clone, PartialEq)]
pub enum StageRecord {
    Gap(GapReport),
    Research(ResearchSummary),
    Plan(Plan),
}

impl StageRecord {
    /// 记录对应的契约名称
    pub fn contract_name(&self) -> &'static str {
        match self {
            StageRecord::Gap(_) => GapReport::CONTRACT_NAME,
            StageRecord::Research(_) => ResearchSummary::CONTRACT_NAME,
            StageRecord::Plan(_) => Plan::CONTRACT_NAME,
        }
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            StageRecord::Gap(r) => serde_json::to_value(r),
            StageRecord::Research(r) => serde_json::to_value(r),
            StageRecord::Plan(r) => serde_json::to_value(r),
        }
    }
}

impl From<GapReport> for StageRecord {
    fn from(value: GapReport) -> Self {
        StageRecord::Gap(value)
    }
}

impl From<ResearchSummary> for StageRecord {
    fn from(value: ResearchSummary) -> Self {
        StageRecord::Research(value)
    }
}

impl From<Plan> for StageRecord {
    fn from(value: Plan) -> Self {
        StageRecord::Plan(value)
    }
}

/// 阶段输出契约：可被抽取、可序列化，并能报告缺失的必填字段
pub trait Contract:
    JsonSchema + DeserializeOwned + Serialize + Into<StageRecord> + Send + Sync + 'static
{
    const CONTRACT_NAME: &'static str;

    /// 返回为空或缺失的必填字段名，空列表表示契约成立
    fn missing_fields(&self) -> Vec<&'static str>;
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests;
