use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::Contract;

/// 模型常把缺失的字段写成 `null`，按缺失处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 单条整改建议
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct Recommendation {
    /// Short name of the recommendation.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(with = "String")]
    pub title: String,
    /// Detailed description, including the expected effort.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(with = "String")]
    pub description: String,
    /// One of: low, medium, high.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(with = "String")]
    pub effort_level: String,
    /// Expected impact, e.g. medium, high, transformational.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(with = "String")]
    pub expected_impact: String,
    /// Ordered implementation steps.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(with = "Vec<String>")]
    pub implementation_steps: Vec<String>,
}

/// Planning阶段的产出：三档优先级的行动计划
///
/// 所有字段都允许缺失，展示层会以占位符替代。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct Plan {
    /// The overall strategy in one or two sentences.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(with = "String")]
    pub overall_strategy: String,
    /// Estimated timeline for the whole plan, e.g. '3 weeks'.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(with = "String")]
    pub estimated_timeline: String,
    /// Low effort, immediate impact recommendations.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(with = "Vec<Recommendation>")]
    pub quick_wins: Vec<Recommendation>,
    /// Moderate effort, significant impact recommendations.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(with = "Vec<Recommendation>")]
    pub medium_effort: Vec<Recommendation>,
    /// High effort, transformational impact recommendations.
    #[serde(deserialize_with = "null_as_default")]
    #[schemars(with = "Vec<Recommendation>")]
    pub high_effort: Vec<Recommendation>,
}

/// 建议的优先级档位，按展示顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationTier {
    QuickWins,
    MediumEffort,
    HighEffort,
}

impl RecommendationTier {
    pub const ALL: [RecommendationTier; 3] = [
        RecommendationTier::QuickWins,
        RecommendationTier::MediumEffort,
        RecommendationTier::HighEffort,
    ];

    /// JSON中的字段名
    pub fn key(&self) -> &'static str {
        match self {
            RecommendationTier::QuickWins => "quick_wins",
            RecommendationTier::MediumEffort => "medium_effort",
            RecommendationTier::HighEffort => "high_effort",
        }
    }
}

impl Plan {
    pub fn tier(&self, tier: RecommendationTier) -> &[Recommendation] {
        match tier {
            RecommendationTier::QuickWins => &self.quick_wins,
            RecommendationTier::MediumEffort => &self.medium_effort,
            RecommendationTier::HighEffort => &self.high_effort,
        }
    }

    pub fn recommendation_count(&self) -> usize {
        RecommendationTier::ALL
            .iter()
            .map(|tier| self.tier(*tier).len())
            .sum()
    }
}

impl Contract for Plan {
    const CONTRACT_NAME: &'static str = "Plan";

    fn missing_fields(&self) -> Vec<&'static str> {
        Vec::new()
    }
}
