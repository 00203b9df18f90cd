use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::pipeline::stage::{Stage, StageError};
use crate::types::Plan;

/// 单个阶段的执行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
}

/// 整次运行的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    FailedInsights,
    FailedResearch,
    FailedPlanning,
}

impl RunStatus {
    /// 指定阶段失败时的终态
    pub fn failed_at(stage: Stage) -> Self {
        match stage {
            Stage::Insights => RunStatus::FailedInsights,
            Stage::Research => RunStatus::FailedResearch,
            Stage::Planning => RunStatus::FailedPlanning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::FailedInsights => "failed_insights",
            RunStatus::FailedResearch => "failed_research",
            RunStatus::FailedPlanning => "failed_planning",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEntry {
    /// 归一化后的阶段输出
    pub data: Value,
    pub status: StageStatus,
    /// 交给下一阶段的序列化文本
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_input: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub kind: String,
    pub message: String,
}

/// 单次运行的轨迹，由编排器独占并在结束时交还调用方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationTrace {
    pub run_id: Uuid,
    pub goal: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: BTreeMap<Stage, StageEntry>,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<StageFailure>,
}

impl OrchestrationTrace {
    pub fn new(goal: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            goal: goal.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            steps: BTreeMap::new(),
            status: RunStatus::Success,
            failure: None,
        }
    }

    pub fn record_completed(&mut self, stage: Stage, data: Value, next_input: Option<String>) {
        self.steps.insert(
            stage,
            StageEntry {
                data,
                status: StageStatus::Completed,
                next_input,
            },
        );
    }

    pub fn record_failure(&mut self, stage: Stage, error: &StageError) {
        self.status = RunStatus::failed_at(stage);
        self.failure = Some(StageFailure {
            stage,
            kind: error.kind().to_string(),
            message: error.to_string(),
        });
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }

    pub fn step(&self, stage: Stage) -> Option<&StageEntry> {
        self.steps.get(&stage)
    }

    /// 最终计划；运行失败或Planning阶段缺失时为 None
    pub fn plan(&self) -> Option<Plan> {
        if !self.is_success() {
            return None;
        }
        self.step(Stage::Planning)
            .and_then(|entry| serde_json::from_value(entry.data.clone()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_serializes_steps_in_stage_order() {
        let mut trace = OrchestrationTrace::new("goal");
        trace.record_completed(Stage::Research, json!({"b": 2}), Some("{}".to_string()));
        trace.record_completed(Stage::Insights, json!({"a": 1}), Some("{}".to_string()));

        let value = serde_json::to_value(&trace).unwrap();
        let keys: Vec<_> = value["steps"].as_object().unwrap().keys().cloned().collect();

        assert_eq!(keys, vec!["insights", "research"]);
        assert_eq!(value["status"], json!("success"));
        assert_eq!(value["steps"]["insights"]["status"], json!("completed"));
        assert!(value.get("failure").is_none());
    }

    #[test]
    fn test_record_failure_sets_stage_marker() {
        let mut trace = OrchestrationTrace::new("goal");
        trace.record_failure(
            Stage::Research,
            &StageError::Invocation("warehouse unavailable".to_string()),
        );

        assert_eq!(trace.status, RunStatus::FailedResearch);
        assert_eq!(trace.status.to_string(), "failed_research");
        let failure = trace.failure.as_ref().unwrap();
        assert_eq!(failure.stage, Stage::Research);
        assert_eq!(failure.kind, "invocation");
        assert!(failure.message.contains("warehouse unavailable"));
        assert!(trace.plan().is_none());
    }

    #[test]
    fn test_planning_entry_omits_next_input() {
        let mut trace = OrchestrationTrace::new("goal");
        trace.record_completed(Stage::Planning, json!({"overall_strategy": "s"}), None);

        let value = serde_json::to_value(&trace).unwrap();
        assert!(value["steps"]["planning"].get("next_input").is_none());
        assert_eq!(trace.plan().unwrap().overall_strategy, "s");
    }

    #[test]
    fn test_trace_round_trips_through_json() {
        let mut trace = OrchestrationTrace::new("goal");
        trace.record_completed(Stage::Insights, json!({"a": 1}), Some("{\"a\":1}".to_string()));
        let trace = trace.finish();

        let text = serde_json::to_string(&trace).unwrap();
        let restored: OrchestrationTrace = serde_json::from_str(&text).unwrap();

        assert_eq!(restored, trace);
    }
}
