use serde::{Deserialize, Serialize};

/// 目标语言类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "en")]
    #[default]
    English,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Chinese => write!(f, "zh"),
            TargetLanguage::English => write!(f, "en"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" | "chinese" | "中文" => Ok(TargetLanguage::Chinese),
            "en" | "english" | "英文" => Ok(TargetLanguage::English),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "中文",
            TargetLanguage::English => "English",
        }
    }

    /// 获取语言的提示词指令
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => {
                "请使用中文撰写所有面向业务人员的文字字段，JSON字段名保持英文不变。"
            }
            TargetLanguage::English => {
                "Write every human-readable field in English. Keep JSON keys exactly as specified."
            }
        }
    }

    /// 获取报告中的固定文案
    pub fn report_label(&self, key: &str) -> String {
        match self {
            TargetLanguage::Chinese => match key {
                "title" => "最终分析与策略报告".to_string(),
                "overall_strategy" => "总体策略".to_string(),
                "estimated_timeline" => "预计周期".to_string(),
                "quick_wins" => "⚡ 快速见效".to_string(),
                "medium_effort" => "📈 中等投入".to_string(),
                "high_effort" => "🚀 高投入".to_string(),
                "recommendations" => "条建议".to_string(),
                "failed" => "智能体编排失败，失败阶段".to_string(),
                "check_logs" => "请查看上方日志了解详情。".to_string(),
                _ => key.to_string(),
            },
            TargetLanguage::English => match key {
                "title" => "FINAL ANALYSIS AND STRATEGY REPORT".to_string(),
                "overall_strategy" => "OVERALL STRATEGY".to_string(),
                "estimated_timeline" => "ESTIMATED TIMELINE".to_string(),
                "quick_wins" => "⚡ Quick Wins".to_string(),
                "medium_effort" => "📈 Medium Effort".to_string(),
                "high_effort" => "🚀 High Effort".to_string(),
                "recommendations" => "Recommendations".to_string(),
                "failed" => "Agent orchestration failed during stage".to_string(),
                "check_logs" => "Check logs above for details.".to_string(),
                _ => key.to_string(),
            },
        }
    }
}
