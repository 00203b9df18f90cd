//! 离线演示用的模拟阶段，在没有模型服务时跑通整条流水线

use anyhow::Result;
use async_trait::async_trait;

use crate::pipeline::stage::{Stage, StageInvoker, StageOutput};
use crate::types::{GapReport, ResearchSummary};

/// 返回固定演示数据的阶段调用器
///
/// Insights与Research返回强类型记录，Planning返回原始JSON文本。
#[derive(Debug, Default, Clone)]
pub struct SimulatedStageInvoker;

impl SimulatedStageInvoker {
    pub fn gap_report() -> GapReport {
        GapReport {
            campaign_id: "CAM_1234".to_string(),
            metric_name: "ROAS".to_string(),
            deviation_value: "-25% lower than target 4.5".to_string(),
            hypotheses: vec![
                "Device type (Mobile/Desktop) bias.".to_string(),
                "Geographic region underperformance (e.g., California/New York).".to_string(),
                "Budget allocation imbalance.".to_string(),
            ],
        }
    }

    pub fn research_summary() -> ResearchSummary {
        ResearchSummary {
            root_cause: "Mobile bidding strategy is set too low for high-value regions (US East Coast) leading to suppressed high-value conversions.".to_string(),
            supporting_data: "SELECT AVG(ROAS) FROM ads_performance WHERE device='mobile' AND region IN ('NY', 'MA') -- shows 3.1 ROAS vs 5.5 for Desktop.".to_string(),
            actionable_summary: "Confirmed root cause related to mobile bid strategy and geographic segmentation of conversion value.".to_string(),
        }
    }

    pub fn plan_text() -> String {
        serde_json::json!({
            "overall_strategy": "Immediate tactical shift to re-allocate mobile bids in underperforming high-value US regions, followed by a strategic ad copy and landing page refinement.",
            "estimated_timeline": "3 weeks",
            "quick_wins": [
                {
                    "title": "Increase Mobile Bid Multiplier",
                    "description": "Raise the mobile bid multiplier by 25% in high-gap regions (NY, MA, FL). Effort: 1 day.",
                    "effort_level": "low",
                    "expected_impact": "high",
                    "implementation_steps": ["Apply bid adjustment in Google Ads UI.", "Monitor for 7 days."]
                }
            ],
            "medium_effort": [
                {
                    "title": "A/B Test New Mobile Ad Copy",
                    "description": "Test new ad copy emphasizing mobile-specific value propositions. Effort: 1 week.",
                    "effort_level": "medium",
                    "expected_impact": "medium",
                    "implementation_steps": ["Create 3 new responsive search ads.", "Set up 14-day A/B test."]
                }
            ],
            "high_effort": [
                {
                    "title": "Automate Smart Bidding Migration",
                    "description": "Transition the campaign to 'Maximize Conversion Value with target ROAS' to better capture regional value differences. Effort: 2 weeks.",
                    "effort_level": "high",
                    "expected_impact": "transformational",
                    "implementation_steps": ["Review conversion actions quality.", "Migrate bidding strategy and set ROAS target to 4.2."]
                }
            ]
        })
        .to_string()
    }
}

#[async_trait]
impl StageInvoker for SimulatedStageInvoker {
    async fn invoke(&self, stage: Stage, _prompt: &str) -> Result<StageOutput> {
        let output = match stage {
            Stage::Insights => StageOutput::Record(Self::gap_report().into()),
            Stage::Research => StageOutput::Record(Self::research_summary().into()),
            Stage::Planning => StageOutput::Text(Self::plan_text()),
        };
        Ok(output)
    }
}
