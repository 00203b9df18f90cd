use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Contract, is_blank};

/// Research阶段的产出：经数据验证的根因
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ResearchSummary {
    /// The confirmed primary causal factor for the performance gap.
    pub root_cause: String,
    /// The raw data or SQL results that verify the root cause.
    pub supporting_data: String,
    /// A summary of the technical findings ready for strategic planning.
    pub actionable_summary: String,
}

impl Contract for ResearchSummary {
    const CONTRACT_NAME: &'static str = "ResearchSummary";

    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("root_cause", &self.root_cause),
            ("supporting_data", &self.supporting_data),
            ("actionable_summary", &self.actionable_summary),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| name)
        .collect()
    }
}
