use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Contract, is_blank};

/// Insights阶段的产出：一个表现不佳的广告系列及其指标差距
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct GapReport {
    /// The ID of the underperforming Google Ads campaign.
    pub campaign_id: String,
    /// The KPI metric (e.g. ROAS, Conversion Rate) showing the gap.
    pub metric_name: String,
    /// The magnitude and direction of the deviation (e.g. '-1.2% lower').
    pub deviation_value: String,
    /// Initial high-level guesses (e.g. device split, geo bias) for the research stage.
    pub hypotheses: Vec<String>,
}

impl Contract for GapReport {
    const CONTRACT_NAME: &'static str = "GapReport";

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.campaign_id) {
            missing.push("campaign_id");
        }
        if is_blank(&self.metric_name) {
            missing.push("metric_name");
        }
        if is_blank(&self.deviation_value) {
            missing.push("deviation_value");
        }
        if self.hypotheses.iter().all(|h| is_blank(h)) {
            missing.push("hypotheses");
        }
        missing
    }
}
